//! User registration, password login and bearer-token protected user CRUD
//! over HTTP.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod state;
pub mod users;
