//! Infrastructure layer for DivineGPT.
//!
//! Contains implementations of the ports defined in `divinegpt-core`:
//! SQLite storage for conversations and the emotional journal, the HTTP
//! transport to the advisory gateway, and the `config.toml` loader.

pub mod advisor;
pub mod config;
pub mod sqlite;
