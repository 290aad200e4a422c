pub mod snapshot;
pub mod symbol;
