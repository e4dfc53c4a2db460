//! Pandan Stand counter library.
//!
//! This crate provides the counter service as a library, allowing the order
//! store, lifecycle controller and routes to be tested and reused by the
//! CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod state;
pub mod store;
