//! Data access layer. Each repository is a zero-sized struct whose
//! methods take `&PgPool` as the first argument.

pub mod intake_repo;

pub use intake_repo::IntakeRepo;
