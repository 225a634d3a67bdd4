//! confgate - HTTP/JSON gateway for a router configuration-session engine
//!
//! Clients submit configuration commands, retrieval queries, file and image
//! operations over a REST-like JSON API; the gateway authenticates each
//! request, normalizes JSON and form-encoded bodies into one canonical
//! command shape, and drives the shared configuration session, serializing
//! configure transactions behind a single process-wide lock.

pub mod api;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod session;
