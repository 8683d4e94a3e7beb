//! HTTP transport to the advisory gateway (`POST /ask`).

pub mod client;
pub mod types;
