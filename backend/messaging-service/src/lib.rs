//! Messaging backend for Field Hockey Connect: a player/club directory,
//! recruiting, and one-to-one conversations between participants.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
