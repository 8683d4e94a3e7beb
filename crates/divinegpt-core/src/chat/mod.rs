//! Conversation turn pipeline for DivineGPT.
//!
//! `ChatService` is the entry point: it claims the active session through the
//! `TurnGate`, runs the `TurnProcessor`, persists through
//! `ConversationPersistence` and records the `EmotionalJournal` entry.

pub mod epoch;
pub mod gate;
pub mod meta;
pub mod persistence;
pub mod processor;
pub mod repository;
pub mod service;
pub mod session;
pub mod window;
