//! HTTP handlers, one module per resource.

pub mod actions;
pub mod actors;
pub mod agreements;
pub mod attachments;
pub mod auth;
pub mod categories;
pub mod commitments;
pub mod dashboard;
pub mod documents;
pub mod exports;
pub mod microsite;
pub mod overviews;
pub mod updates;
pub mod users;
