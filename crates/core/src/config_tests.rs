// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::error::ErrorKind;
use tempfile::TempDir;

#[test]
fn default_limits() {
    let config = ParserConfig::default();
    assert_eq!(config.max_input_len, 65536);
    assert_eq!(config.max_depth, 32);
    assert_eq!(config.max_clauses, 256);
    assert!(config.validate().is_ok());
}

#[test]
fn new_rejects_zero_limits() {
    assert!(matches!(
        ParserConfig::new(0, 4),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        ParserConfig::new(16, 0),
        Err(Error::InvalidConfig(_))
    ));
    assert!(ParserConfig::new(16, 4).is_ok());
    assert!(matches!(
        ParserConfig::default().with_max_clauses(0),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn from_toml_fills_missing_keys_with_defaults() {
    let config = ParserConfig::from_toml_str("max_depth = 4\n").unwrap();
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.max_input_len, 65536);

    let config = ParserConfig::from_toml_str("").unwrap();
    assert_eq!(config, ParserConfig::default());
}

#[test]
fn from_toml_rejects_unknown_keys() {
    let err = ParserConfig::from_toml_str("max_dept = 4\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn from_toml_rejects_zero_limit() {
    let err = ParserConfig::from_toml_str("max_input_len = 0\n").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn save_and_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("filterq.toml");
    let config = ParserConfig::new(128, 3)
        .unwrap()
        .with_max_clauses(12)
        .unwrap();
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = ParserConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn load_missing_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    let err = ParserConfig::load(&temp.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("failed to read config"));
}

#[test]
fn parse_applies_input_limit() {
    let config = ParserConfig::new(8, 4).unwrap();
    assert!(config.parse(b"a == 1").is_ok());

    let err = config.parse(b"abc == 12345").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LimitExceeded);
    assert_eq!(err.offset, 8);
}

#[test]
fn parse_applies_depth_limit() {
    let config = ParserConfig::new(1024, 2).unwrap();
    assert!(config.parse(b"((a == 1))").is_ok());

    let err = config.parse(b"(((a == 1)))").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LimitExceeded);
    assert_eq!(err.offset, 2);
}
