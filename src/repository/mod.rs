pub mod employee_repository;
pub mod user_repository;

pub use employee_repository::{EmployeeRepository, MySqlEmployeeRepository, UniqueField};
pub use user_repository::{MySqlUserRepository, UserRepository};
