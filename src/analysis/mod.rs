pub mod alerts;
pub mod score;
pub mod summary;
pub mod trend;
