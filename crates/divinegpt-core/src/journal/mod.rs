//! Emotional journal: an append-only side log written after each resolved turn.

pub mod recorder;
pub mod repository;
