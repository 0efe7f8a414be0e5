///! Trout stocking map server
///!
///! Serves a Leaflet map and a Plotly chart of Washington lake stocking
///! events, backed by Postgres or an in-memory SQLite store.

pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod routes;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_support;
