//! Conversation turn pipeline and repository trait definitions for DivineGPT.
//!
//! This crate defines the "ports" (advisor and repository traits) that the
//! infrastructure layer implements, and the orchestration that drives a user
//! turn through them. It depends only on `divinegpt-types` -- never on
//! `divinegpt-infra` or any database/HTTP crate.

pub mod advisor;
pub mod chat;
pub mod journal;

#[cfg(test)]
pub(crate) mod test_support;
