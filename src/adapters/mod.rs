//! Infrastructure adapters. Implement outbound ports and expose the HTTP surface.
//!
//! OMDb, SQLite, filesystem, axum. Map errors to DomainError.

pub mod http;
pub mod omdb;
pub mod persistence;
pub mod storage;
pub mod ui;
