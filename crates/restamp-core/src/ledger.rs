//! Persistent invoice-number ledger.
//!
//! A single JSON file records the last invoice number handed out. The file
//! is the source of truth: every operation re-reads it, and the commit
//! operation rewrites it through a temp-file rename so a crash mid-write
//! cannot leave a torn ledger behind. Serializing concurrent commits is the
//! caller's job; the HTTP layer funnels all mutation through one lock.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LedgerError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Persisted ledger state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerState {
    /// Last invoice number committed. Monotonically non-decreasing.
    pub last_invoice_number: u64,

    /// ISO-8601 timestamp of the last write.
    pub last_updated: String,
}

/// File-backed sequential invoice-number ledger.
pub struct InvoiceLedger {
    path: PathBuf,
    starting_number: u64,
}

impl InvoiceLedger {
    /// Create a ledger over the given file. The file is not touched until
    /// the first commit; reads of an absent file yield the seeded state.
    pub fn new(path: impl Into<PathBuf>, starting_number: u64) -> Self {
        Self {
            path: path.into(),
            starting_number,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next invoice number that a commit would produce. Does not mutate
    /// any state: calling this any number of times yields the same value.
    pub fn peek_next(&self) -> Result<u64> {
        Ok(self.load()?.last_invoice_number + 1)
    }

    /// Advance the ledger by exactly one and persist the new state with a
    /// fresh timestamp. Returns the newly committed invoice number.
    pub fn commit_next(&self) -> Result<u64> {
        let mut state = self.load()?;
        state.last_invoice_number += 1;
        state.last_updated = Local::now().to_rfc3339();
        self.save(&state)?;

        info!(invoice_number = state.last_invoice_number, "committed invoice number");
        Ok(state.last_invoice_number)
    }

    fn load(&self) -> Result<LedgerState> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "ledger file absent, seeding");
            return Ok(LedgerState {
                last_invoice_number: self.starting_number - 1,
                last_updated: Local::now().to_rfc3339(),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(LedgerError::Read)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;

        // Write-then-rename keeps the ledger readable at every instant.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(LedgerError::Write)?;
        fs::rename(&tmp, &self.path).map_err(LedgerError::Write)?;
        Ok(())
    }
}
