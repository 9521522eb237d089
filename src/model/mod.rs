pub mod floor;
pub mod server;
