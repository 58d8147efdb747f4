//! Encrypted append-only assessment log.
//!
//! One record per line: the JSON form of an [`AssessmentResponse`], encrypted
//! with AES-256-GCM and Base64 encoded. The file is opened per write and per
//! read; nothing is cached between calls.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::encryption::{decrypt, encrypt, EncryptionKey};
use crate::error::AppError;
use crate::models::AssessmentResponse;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

pub struct LocalStorage {
    path: PathBuf,
    key: EncryptionKey,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>, key: EncryptionKey) -> Self {
        Self {
            path: path.into(),
            key,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encrypts the response and appends it as a new line.
    pub fn save(&self, response: &AssessmentResponse) -> Result<(), AppError> {
        let json = serde_json::to_vec(response)
            .map_err(|e| AppError::Storage(format!("Failed to serialize assessment: {}", e)))?;
        let record = encrypt(&self.key, &json)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("Failed to create storage directory {:?}: {}", parent, e))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::Storage(format!("Failed to open {:?}: {}", self.path, e)))?;
        writeln!(file, "{}", record)
            .map_err(|e| AppError::Storage(format!("Failed to append to {:?}: {}", self.path, e)))?;

        debug!(assessment_id = %response.assessment_id, "Assessment persisted");
        Ok(())
    }

    /// Returns up to `limit` records, newest first.
    ///
    /// Lines that are not UTF-8, or that fail to decrypt or decode, are skipped. A missing file yields
    /// an empty list.
    pub fn load_recent(&self, limit: usize) -> Result<Vec<AssessmentResponse>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read(&self.path)
            .map_err(|e| AppError::Storage(format!("Failed to read {:?}: {}", self.path, e)))?;

        let records = content
            .split(|byte| *byte == b'\n')
            .rev()
            .filter(|line| !line.trim_ascii().is_empty())
            .filter_map(|line| match self.decode(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable assessment record: {}", e);
                    None
                }
            })
            .take(limit)
            .collect();

        Ok(records)
    }

    fn decode(&self, line: &[u8]) -> Result<AssessmentResponse, AppError> {
        let line = std::str::from_utf8(line)
            .map_err(|e| AppError::Storage(format!("Record is not valid UTF-8: {}", e)))?;
        let bytes = decrypt(&self.key, line.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
