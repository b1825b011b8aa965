//! Utility modules: retry and cancellation.

pub mod cancel;
pub mod retry;
