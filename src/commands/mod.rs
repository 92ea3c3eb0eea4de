pub mod snapshot;
pub mod sync;
