//! Gallery services. Each module owns one admin operation family and its
//! error enum; route handlers stay thin.

pub mod layout;
pub mod metadata;
pub mod order;
pub mod revision;
pub mod tile;
pub mod upload;
