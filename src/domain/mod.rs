pub mod price;
pub mod types;
