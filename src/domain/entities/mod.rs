pub mod column;
pub mod config;
pub mod page;
pub mod row;
