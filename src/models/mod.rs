#[cfg(feature = "server")]
pub mod config;
pub mod price;
