pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod state;
pub mod stream;
