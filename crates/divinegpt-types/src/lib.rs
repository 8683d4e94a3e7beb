//! Shared domain types for DivineGPT.
//!
//! This crate contains the types exchanged between the conversation pipeline,
//! the remote advisor boundary, and storage: sessions, turns, advisory
//! requests/results, journal entries, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod advisory;
pub mod chat;
pub mod config;
pub mod error;
pub mod journal;
