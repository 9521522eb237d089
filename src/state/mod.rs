pub mod history;
pub mod snapshot;
