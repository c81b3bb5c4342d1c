pub mod infra;
pub mod scheduling;
pub mod utils;
