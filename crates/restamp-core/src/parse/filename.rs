//! Invoice number and date extraction from the upload filename.
//!
//! Expected convention: `WG_Invoice<NUMBER>_<REF>_<DAY>_<MONTH>_<YEAR>_<TIME>.pdf`,
//! e.g. `WG_Invoice23432_DENLOU1-15_9_Dec_2025_1116_am.pdf`.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::INVOICE_NUMBER;
use crate::error::ParseError;

/// Invoice details recovered from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Digit-only invoice number string.
    pub invoice_number: String,

    /// Invoice date. Serialized as `YYYY-MM-DD` at the API boundary.
    pub invoice_date: NaiveDate,
}

/// Parse invoice number and date out of a filename.
///
/// The invoice number is located independently of the date triple: the
/// number comes from the `Invoice<digits>` substring, while the date is the
/// first underscore-delimited `(day, month, year)` triple whose day is
/// numeric with at most two digits and whose year is numeric with exactly
/// four. The month token is only resolved against month names after a
/// triple has been shape-matched, so a triple like `9_Xyz_2025` reports an
/// invalid month rather than a missing date pattern.
pub fn parse_invoice_filename(filename: &str) -> Result<ParsedFilename, ParseError> {
    let name = filename.strip_suffix(".pdf").unwrap_or(filename);

    let invoice_number = INVOICE_NUMBER
        .captures(name)
        .map(|caps| caps[1].to_string())
        .ok_or(ParseError::MissingInvoiceNumber)?;

    let parts: Vec<&str> = name.split('_').collect();

    let mut triple = None;
    for window in parts.windows(3) {
        let [day, month, year] = window else { continue };
        if is_digits(day) && day.len() <= 2 && is_digits(year) && year.len() == 4 {
            triple = Some((*day, *month, *year));
            break;
        }
    }
    let (day, month, year) = triple.ok_or(ParseError::MissingDatePattern)?;

    let month_num = month_to_number(month)
        .ok_or_else(|| ParseError::InvalidMonth(month.to_string()))?;

    // Digit-checked above, so these cannot fail to parse.
    let day_num: u32 = day.parse().unwrap_or(0);
    let year_num: i32 = year.parse().unwrap_or(0);

    let invoice_date = NaiveDate::from_ymd_opt(year_num, month_num, day_num).ok_or_else(|| {
        ParseError::InvalidDate(format!(
            "day {day_num} is out of range for {year_num}-{month_num:02}"
        ))
    })?;

    debug!(%invoice_number, %invoice_date, "parsed invoice filename");
    Ok(ParsedFilename {
        invoice_number,
        invoice_date,
    })
}

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn month_to_number(month: &str) -> Option<u32> {
    match month.to_ascii_lowercase().as_str() {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_canonical_filename() {
        let parsed =
            parse_invoice_filename("WG_Invoice23432_DENLOU1-15_9_Dec_2025_1116_am.pdf").unwrap();

        assert_eq!(parsed.invoice_number, "23432");
        assert_eq!(parsed.invoice_date, NaiveDate::from_ymd_opt(2025, 12, 9).unwrap());
        assert_eq!(parsed.invoice_date.format("%Y-%m-%d").to_string(), "2025-12-09");
    }

    #[test]
    fn accepts_full_month_names_case_insensitively() {
        let parsed =
            parse_invoice_filename("WG_Invoice7_ABC1_21_DECEMBER_2024_0900_am.pdf").unwrap();

        assert_eq!(parsed.invoice_date, NaiveDate::from_ymd_opt(2024, 12, 21).unwrap());
    }

    #[test]
    fn missing_invoice_number_is_reported() {
        let err = parse_invoice_filename("WG_Order1_REF_9_Dec_2025_1116_am.pdf").unwrap_err();

        assert_eq!(err, ParseError::MissingInvoiceNumber);
        assert_eq!(err.to_string(), "Could not find invoice number in filename");
    }

    #[test]
    fn missing_date_triple_is_reported() {
        let err = parse_invoice_filename("WG_Invoice23432_DENLOU1-15.pdf").unwrap_err();

        assert_eq!(err, ParseError::MissingDatePattern);
        assert_eq!(err.to_string(), "Could not find date pattern in filename");
    }

    #[test]
    fn unknown_month_token_is_reported_with_value() {
        let err =
            parse_invoice_filename("WG_Invoice1_REF1_9_Xyz_2025_1116_am.pdf").unwrap_err();

        assert_eq!(err, ParseError::InvalidMonth("Xyz".to_string()));
        assert_eq!(err.to_string(), "Invalid month: Xyz");
    }

    #[test]
    fn impossible_calendar_date_is_reported() {
        let err =
            parse_invoice_filename("WG_Invoice1_REF1_31_Feb_2025_1116_am.pdf").unwrap_err();

        assert!(matches!(err, ParseError::InvalidDate(_)));
        assert!(err.to_string().starts_with("Invalid date:"));
    }

    #[test]
    fn day_longer_than_two_digits_does_not_match() {
        // "123" cannot be a day, and no other triple exists.
        let err = parse_invoice_filename("WG_Invoice1_REF1_123_Dec_2025.pdf").unwrap_err();

        assert_eq!(err, ParseError::MissingDatePattern);
    }

    #[test]
    fn two_digit_year_does_not_match() {
        let err = parse_invoice_filename("WG_Invoice1_REF1_9_Dec_25_1116_am.pdf").unwrap_err();

        assert_eq!(err, ParseError::MissingDatePattern);
    }

    #[test]
    fn first_shape_matching_triple_wins() {
        // The "1116_am" tail never matches because "am" is not a 4-digit
        // year; the real date triple earlier in the name is used.
        let parsed = parse_invoice_filename("WG_Invoice5_X9Y_1_Jan_2026_1116_am.pdf").unwrap();

        assert_eq!(parsed.invoice_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
