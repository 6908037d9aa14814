pub mod receiver;
pub mod stock;
pub mod trigger;
