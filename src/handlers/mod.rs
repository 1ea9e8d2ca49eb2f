//! HTTP handlers for the data API.

pub mod data;
pub use data::*;
