pub mod import;
pub mod memory;
pub mod seed;
pub mod sqlite;
