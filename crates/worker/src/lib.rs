//! Background worker for scheduled maintenance tasks.
//!
//! Currently one job: the weekly delay sweep that stamps DELAY updates onto
//! active actions past their expected completion date.

pub mod sweep;
