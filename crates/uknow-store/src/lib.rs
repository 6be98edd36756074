//! uknow-store — Persistence and configuration for uknow.
//!
//! Implements the card and record store traits from `uknow-core` over memory
//! and JSON files, and loads `uknow.toml` into the settings the CLI wires
//! together.

pub mod config;
pub mod json;
pub mod memory;

pub use config::{
    load_config, load_config_from, open_store, probe_annotator, AnnotatorConfig, SharedStore,
    StoreConfig, UknowConfig,
};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
