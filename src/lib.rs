#![allow(clippy::verbose_bit_mask)]
#![allow(clippy::new_without_default)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::module_inception)]

#[macro_use]
extern crate log;

#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod cpu;
pub mod dos;
pub mod error;
pub mod hex;
pub mod machine;
pub mod memory;
pub mod tools;
