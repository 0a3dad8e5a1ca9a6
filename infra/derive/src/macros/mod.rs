pub mod epp;
pub mod error;
