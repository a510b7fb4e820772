pub mod employee_service;
