//! OMDb adapter module. Implements MetadataPort.

pub mod client;

pub use client::{OmdbAdapter, DEFAULT_OMDB_URL};
