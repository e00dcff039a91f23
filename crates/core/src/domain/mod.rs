pub mod analysis;
pub mod date_range;
pub mod message;
pub mod persona;
pub mod stock;
