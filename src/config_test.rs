use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use crate::config::{Config, DEFAULT_MAX_STRING_LENGTH};
use crate::error::Error;
use crate::memory::{Addressing, DEFAULT_MEMORY_SIZE};

#[test]
fn can_parse_empty_config() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(Config::default(), config);
    assert_eq!(Addressing::Banked, config.addressing);
    assert_eq!(DEFAULT_MEMORY_SIZE, config.memory_size);
    assert_eq!(DEFAULT_MAX_STRING_LENGTH, config.max_string_length);
}

#[test]
fn can_parse_full_config() {
    let config = Config::from_toml(r#"
        addressing = "real"
        memory_size = 131072
        max_string_length = 80
        instruction_limit = 1000
        trace = true
    "#).unwrap();

    assert_eq!(Config {
        addressing: Addressing::Real,
        memory_size: 0x2_0000,
        max_string_length: 80,
        instruction_limit: Some(1000),
        trace: true,
    }, config);
}

#[test]
fn rejects_unknown_addressing_mode() {
    match Config::from_toml("addressing = \"flat\"") {
        Err(Error::Config(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn rejects_too_small_memory() {
    match Config::from_toml("memory_size = 4096") {
        Err(Error::InvalidConfig(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn can_read_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "trace = true").unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(true, config.trace);
    assert_eq!(None, config.instruction_limit);
}
