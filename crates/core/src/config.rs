// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parser configuration.
//!
//! Limits bound the work a single parse may do. They can be set in code or
//! read from a TOML file:
//!
//! ```toml
//! max_input_len = 4096
//! max_depth = 8
//! max_clauses = 64
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ast::Query;
use crate::error::{Error, MalformedQuery, Result};

const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024;
const DEFAULT_MAX_DEPTH: usize = 32;
const DEFAULT_MAX_CLAUSES: usize = 256;

/// Resource limits for a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Longest accepted input in bytes (default: 65536).
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
    /// Deepest accepted parenthesis nesting (default: 32).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Most clauses accepted across the whole expression, groups included
    /// (default: 256). Connectors fold left, so this also bounds how tall
    /// the resulting [`Query`] can grow.
    #[serde(default = "default_max_clauses")]
    pub max_clauses: usize,
}

fn default_max_input_len() -> usize {
    DEFAULT_MAX_INPUT_LEN
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_clauses() -> usize {
    DEFAULT_MAX_CLAUSES
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_clauses: DEFAULT_MAX_CLAUSES,
        }
    }
}

impl ParserConfig {
    /// Creates a config with the given limits and the default clause limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if either limit is zero.
    pub fn new(max_input_len: usize, max_depth: usize) -> Result<Self> {
        let config = ParserConfig {
            max_input_len,
            max_depth,
            max_clauses: DEFAULT_MAX_CLAUSES,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the clause limit.
    pub fn with_max_clauses(mut self, max_clauses: usize) -> Result<Self> {
        self.max_clauses = max_clauses;
        self.validate()?;
        Ok(self)
    }

    /// Parses a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ParserConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("loaded parser config from {}", path.display());
        Ok(config)
    }

    /// Serializes this config as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }

    /// Checks that every limit allows at least some input.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_len == 0 {
            return Err(Error::InvalidConfig("max_input_len is 0".to_string()));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth is 0".to_string()));
        }
        if self.max_clauses == 0 {
            return Err(Error::InvalidConfig("max_clauses is 0".to_string()));
        }
        Ok(())
    }

    /// Parses `input` under these limits.
    pub fn parse<'a>(&self, input: &'a [u8]) -> std::result::Result<Query<'a>, MalformedQuery> {
        crate::parser::parse_with(input, self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
