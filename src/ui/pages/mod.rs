pub mod directory;
pub mod employees;

pub use directory::DirectoryPage;
pub use employees::EmployeesPage;
