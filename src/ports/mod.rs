//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by the application into infrastructure
//! - Inbound traffic arrives through the HTTP adapter, which calls use cases directly

pub mod outbound;

pub use outbound::{IdentityPort, MetadataPort, MovieRepoPort, PosterStorePort, UserRepoPort};
