//! Consumer side of the proxied SalesQuest API.
//!
//! Mirrors what the browser dashboard does with the API: plain JSON GETs,
//! "no data" on any failure, and a 30 second refresh loop.

pub mod client;
pub mod models;

pub use client::{DashboardClient, POLL_INTERVAL, summarize_vendedores};
pub use models::{CoachKind, Endpoint, Periodo, parse_vendor_id};
