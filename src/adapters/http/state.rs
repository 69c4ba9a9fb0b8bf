use std::path::PathBuf;
use std::sync::Arc;

use crate::usecases::{AccountService, CatalogService, LookupService};

/// Shared request state. Built once in `main` and cloned per request as an `Arc`.
pub struct AppState {
    pub lookup: LookupService,
    pub catalog: CatalogService,
    pub accounts: AccountService,
    /// Directory served under `/media` (uploaded posters).
    pub media_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        lookup: LookupService,
        catalog: CatalogService,
        accounts: AccountService,
        media_dir: PathBuf,
        max_upload_bytes: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            lookup,
            catalog,
            accounts,
            media_dir,
            max_upload_bytes,
        })
    }
}
