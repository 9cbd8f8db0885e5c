//! Pure domain logic for obstetric risk intake.
//!
//! Nothing in this crate performs I/O: the validation engine, variant rule
//! tables, and risk interpretation can run identically on a client and on
//! the server.

pub mod error;
pub mod intake;
pub mod risk;
pub mod types;
