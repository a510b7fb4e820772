pub mod grid;
pub mod ports;
pub mod services;
