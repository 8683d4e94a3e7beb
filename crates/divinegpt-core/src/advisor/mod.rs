//! Remote advisor boundary.
//!
//! `RemoteAdvisorPort` is the transport seam; `AdvisorClient` wraps it with a
//! bounded timeout and turns every failure into the fixed fallback advisory.

pub mod client;
pub mod fallback;
pub mod port;
