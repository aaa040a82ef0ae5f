pub mod auth_service;
pub mod duplicate_checker;
pub mod employee_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use employee_service::EmployeeService;
pub use user_service::UserService;
