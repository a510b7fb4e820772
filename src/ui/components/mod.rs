pub mod data_grid;

pub use data_grid::DataGrid;
