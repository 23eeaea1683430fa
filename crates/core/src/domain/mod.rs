pub mod signal;
pub mod snapshot;
