pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod tests;
