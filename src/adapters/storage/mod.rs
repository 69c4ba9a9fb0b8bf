//! Poster storage adapters.

pub mod fs_poster_store;

pub use fs_poster_store::FsPosterStore;
