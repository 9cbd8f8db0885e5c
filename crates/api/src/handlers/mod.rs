pub mod intake;
pub mod predict;
