pub mod fixture;
pub mod random;
pub mod source;
