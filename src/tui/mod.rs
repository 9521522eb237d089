pub mod app;
pub mod draw;
pub mod report;
pub mod style;
