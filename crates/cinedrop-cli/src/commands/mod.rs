//! Command handlers grouped by concern.

pub(crate) mod movies;
pub(crate) mod resolve;
