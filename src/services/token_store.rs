// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed persistence for the current OAuth token.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Token;

/// A single JSON document on disk holding the most recent token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. Fails if the file is absent or malformed.
    pub fn load(&self) -> Result<Token> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            AppError::TokenStore(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let token = serde_json::from_str(&contents).map_err(|e| {
            AppError::Decode(format!("token file {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), "Token loaded");
        Ok(token)
    }

    /// Overwrite the stored token in full.
    pub fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::TokenStore(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut contents = serde_json::to_string_pretty(token)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode token: {}", e)))?;
        contents.push('\n');

        fs::write(&self.path, contents).map_err(|e| {
            AppError::TokenStore(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }
}
