mod support;

mod auth_service_tests;
mod repository_tests;
