//! Reading Coach API Library Crate
//!
//! This library contains the HTTP surface of the reading coach: configuration,
//! application state, request models, handlers and routing. The binaries in
//! `bin/` are thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
