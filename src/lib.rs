//! asimovies: movie catalogue service with an OMDb relay, built with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
