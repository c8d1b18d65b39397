pub mod app;
pub mod error;
pub mod pagination;
mod routes;
