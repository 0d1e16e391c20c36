// src/config/mod.rs
pub mod digest;
pub mod secrets;

pub use digest::{DigestConfig, GateConfig, SourcesConfig};
pub use secrets::Secrets;
