pub mod action;
pub mod actor;
pub mod agreement;
pub mod attachment;
pub mod category;
pub mod commitment;
pub mod document;
pub mod overview;
pub mod update;
pub mod user;
