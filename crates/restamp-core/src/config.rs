//! Configuration structures for the restamp pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the restamp service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestampConfig {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Storage directory configuration.
    pub storage: StorageConfig,

    /// Invoice-number ledger configuration.
    pub ledger: LedgerConfig,

    /// Page geometry for stamping and redaction.
    pub stamp: StampLayout,
}

impl Default for RestampConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            ledger: LedgerConfig::default(),
            stamp: StampLayout::default(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Storage directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for uploaded source PDFs.
    pub upload_dir: PathBuf,

    /// Directory for stamped output PDFs.
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Invoice-number ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path of the ledger JSON file.
    pub file: PathBuf,

    /// First invoice number ever issued. The ledger seeds itself to
    /// `starting_number - 1` when the file does not exist yet.
    pub starting_number: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("invoice_tracker.json"),
            starting_number: 380_812_351,
        }
    }
}

/// A rectangular page region in top-left-origin page coordinates,
/// measured in PDF points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Region {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// A text anchor in top-left-origin page coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Page geometry for stamping and redaction.
///
/// Coordinates use a top-left origin (y grows downward) and are converted
/// against the page MediaBox when written into the document. Defaults are
/// calibrated for the A4 source invoices this service processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StampLayout {
    /// Height of the redacted band at the top of every page (print
    /// timestamp area).
    pub header_band_height: f32,

    /// Height of the redacted band at the bottom of every page (print
    /// URL area).
    pub footer_band_height: f32,

    /// Amount-paid line on page 2, hidden when discounts are excluded.
    pub discount_region: Region,

    /// `Customer PO No` label on page 1, always covered before stamping.
    pub po_label_region: Region,

    /// Anchor for the stamped invoice number on page 1.
    pub invoice_number_anchor: Anchor,

    /// Anchor for the stamped invoice date on page 1.
    pub invoice_date_anchor: Anchor,

    /// Anchor for the stamped customer ABN on page 1.
    pub customer_abn_anchor: Anchor,

    /// Vertical distance between a stamped value and its bold label.
    pub label_offset: f32,

    /// Font size for stamped labels and values.
    pub font_size: f32,
}

impl Default for StampLayout {
    fn default() -> Self {
        Self {
            header_band_height: 15.0,
            footer_band_height: 30.0,
            discount_region: Region {
                x0: 403.0,
                y0: 325.0,
                x1: 568.0,
                y1: 335.0,
            },
            po_label_region: Region {
                x0: 250.0,
                y0: 70.0,
                x1: 380.0,
                y1: 95.0,
            },
            invoice_number_anchor: Anchor { x: 300.0, y: 104.0 },
            invoice_date_anchor: Anchor { x: 372.0, y: 104.0 },
            customer_abn_anchor: Anchor { x: 445.0, y: 104.0 },
            label_offset: 10.0,
            font_size: 9.0,
        }
    }
}

impl RestampConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_round_trips_through_json() {
        let config = RestampConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RestampConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.ledger.starting_number, 380_812_351);
        assert_eq!(back.server.port, 5000);
        assert_eq!(back.stamp.font_size, config.stamp.font_size);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: RestampConfig =
            serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.output_dir, PathBuf::from("output"));
    }
}
