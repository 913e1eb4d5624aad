//! Output formats backed by external crates.

pub mod cbor;
pub mod toml;
pub mod yaml;
