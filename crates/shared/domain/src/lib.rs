//! # Domain Models
//!
//! Pure registry types with minimal dependencies (`serde`, `bitflags`, `chrono`).
//! Keep it lean: no I/O, networking, or policy logic; data and simple helpers only.

pub mod command;
pub mod config;
pub mod epp;
pub mod money;
pub mod registrar;
pub mod reservation;
pub mod resources;
pub mod tld;

pub use chrono::{DateTime, Utc};
