//! Frame-level tests against the recording device

mod errors;
pub(crate) mod support;
