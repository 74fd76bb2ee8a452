//! Domain logic for the Last Mile commitment tracker.
//!
//! This crate has zero internal dependencies so its types and functions can
//! be used by the repository layer, the API, and the delay-sweep worker.

pub mod audit;
pub mod error;
pub mod export;
pub mod progress;
pub mod roles;
pub mod slug;
pub mod status;
pub mod types;
