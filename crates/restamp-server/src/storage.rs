//! Upload/output file storage.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use tracing::debug;

use restamp_core::config::StorageConfig;

/// Filesystem storage for uploaded and stamped PDFs.
pub struct Storage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Create the storage directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.upload_dir)?;
        fs::create_dir_all(&self.output_dir)
    }

    /// Persist an uploaded source PDF; returns its path.
    pub fn save_upload(&self, name: &str, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.upload_dir.join(name);
        fs::write(&path, data)?;
        debug!(path = %path.display(), bytes = data.len(), "stored upload");
        Ok(path)
    }

    /// Persist a stamped output PDF; returns its path.
    pub fn save_output(&self, name: &str, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.output_dir.join(name);
        fs::write(&path, data)?;
        debug!(path = %path.display(), bytes = data.len(), "stored output");
        Ok(path)
    }

    /// Read a previously produced output file.
    pub fn read_output(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.output_dir.join(name))
    }
}

/// Reduce an uploaded filename to a single safe path component: any
/// directory prefix is dropped and unexpected characters squashed to `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Whether a client-supplied output filename is a plain file name rather
/// than a path.
pub fn is_safe_component(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Timestamp used in stored filenames, `YYYYMMDD_HHMMSS` at upload time.
pub fn upload_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(r"C:\evil\in voice.pdf"), "in_voice.pdf");
        assert_eq!(
            sanitize_filename("WG_Invoice23432_DENLOU1-15_9_Dec_2025_1116_am.pdf"),
            "WG_Invoice23432_DENLOU1-15_9_Dec_2025_1116_am.pdf"
        );
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("..."), "file");
        assert_eq!(sanitize_filename("///"), "file");
    }

    #[test]
    fn safe_component_rejects_paths() {
        assert!(is_safe_component("invoice_1_20250101_010101.pdf"));
        assert!(!is_safe_component("../ledger.json"));
        assert!(!is_safe_component("a/b.pdf"));
        assert!(!is_safe_component(""));
    }

    #[test]
    fn upload_timestamp_has_expected_shape() {
        let ts = upload_timestamp();

        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn output_round_trips() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(&StorageConfig {
            upload_dir: dir.path().join("up"),
            output_dir: dir.path().join("out"),
        });
        storage.ensure_dirs().unwrap();

        storage.save_output("invoice_1_x.pdf", b"%PDF").unwrap();
        assert_eq!(storage.read_output("invoice_1_x.pdf").unwrap(), b"%PDF");
        assert!(storage.read_output("missing.pdf").is_err());
    }
}
