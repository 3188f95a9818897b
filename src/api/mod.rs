// HTTP API for the lego inventory table.

pub mod error;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
