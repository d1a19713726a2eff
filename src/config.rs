use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::memory::{Addressing, DEFAULT_MEMORY_SIZE, SEGMENT_SIZE};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// default bound when scanning for the '$' terminator of a DOS string
pub const DEFAULT_MAX_STRING_LENGTH: usize = SEGMENT_SIZE;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// how segment:offset pairs map to physical addresses
    pub addressing: Addressing,

    /// size of the emulated memory in bytes
    pub memory_size: usize,

    /// longest '$'-terminated string INT 21h/AH=09h will print
    pub max_string_length: usize,

    /// stops `Machine::run` after this many instructions
    pub instruction_limit: Option<usize>,

    /// logs every executed instruction at trace level
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addressing: Addressing::default(),
            memory_size: DEFAULT_MEMORY_SIZE,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            instruction_limit: None,
            trace: false,
        }
    }
}

impl Config {
    pub fn from_toml(data: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = fs::read_to_string(path)?;
        Self::from_toml(&data)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.memory_size < SEGMENT_SIZE {
            return Err(Error::InvalidConfig(format!(
                "memory_size must be at least {} bytes, got {}", SEGMENT_SIZE, self.memory_size)));
        }
        if self.max_string_length == 0 {
            return Err(Error::InvalidConfig("max_string_length must be positive".to_string()));
        }
        Ok(())
    }
}
