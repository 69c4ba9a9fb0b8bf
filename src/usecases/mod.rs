//! Application use cases. Orchestrate domain logic via ports.

pub mod account_service;
pub mod catalog_service;
pub mod lookup_service;

pub use account_service::{AccountService, Registration};
pub use catalog_service::CatalogService;
pub use lookup_service::LookupService;
