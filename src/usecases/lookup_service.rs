//! Relay use case: forward a title lookup to the metadata source.

use crate::domain::{DomainError, MovieMetadata};
use crate::ports::MetadataPort;
use std::sync::Arc;

/// Title lookup relay. Stateless; one outbound call per request.
pub struct LookupService {
    metadata: Arc<dyn MetadataPort>,
}

impl LookupService {
    pub fn new(metadata: Arc<dyn MetadataPort>) -> Self {
        Self { metadata }
    }

    /// Look up `title`. Absent or empty → `MissingParameter`.
    /// Upstream failures are returned as-is; the HTTP layer logs them.
    pub async fn lookup(&self, title: Option<&str>) -> Result<MovieMetadata, DomainError> {
        let title = match title {
            Some(t) if !t.is_empty() => t,
            _ => return Err(DomainError::MissingParameter("title")),
        };

        self.metadata.lookup_title(title).await
    }
}
