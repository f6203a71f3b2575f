//! Verification and credential lifecycle for requests signed by a
//! multi-tenant host platform (`Authorization: JWT <token>`, HS256 with a
//! per-tenant shared secret, QSH request binding).

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
