//! # dpp (library target)
//!
//! Exposes the API and CLI modules so integration tests can drive the
//! router without starting a real server (`dpp::api::*`).

pub mod api;
pub mod cli;
