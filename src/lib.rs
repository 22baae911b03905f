pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;
