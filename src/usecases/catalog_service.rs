//! Catalogue use cases: add, list, fetch and delete movies.
//!
//! Adding a movie runs strictly in sequence: metadata lookup → poster upload → document write.
//! A failed lookup is not fatal; the movie is saved with the form data only.

use crate::domain::catalog::{
    attach_upload, compose_movie, filter_by_title, paginate, poster_storage_path, validate_draft,
};
use crate::domain::{DomainError, Movie, MovieCard, MovieDraft, MoviePage, StoredPoster};
use crate::ports::{MetadataPort, MovieRepoPort, PosterStorePort};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Catalogue service.
pub struct CatalogService {
    metadata: Arc<dyn MetadataPort>,
    movies: Arc<dyn MovieRepoPort>,
    posters: Arc<dyn PosterStorePort>,
    default_poster: String,
    page_size: usize,
}

impl CatalogService {
    /// Create a new catalogue service.
    ///
    /// # Arguments
    /// * `metadata` - Metadata source used to enrich new movies
    /// * `movies` - Movie document store
    /// * `posters` - Poster file store
    /// * `default_poster` - Poster shown for movies without one
    /// * `page_size` - Default number of movies per page
    pub fn new(
        metadata: Arc<dyn MetadataPort>,
        movies: Arc<dyn MovieRepoPort>,
        posters: Arc<dyn PosterStorePort>,
        default_poster: String,
        page_size: usize,
    ) -> Self {
        Self {
            metadata,
            movies,
            posters,
            default_poster,
            page_size,
        }
    }

    /// Validate, enrich, upload the poster (if any) and save.
    pub async fn add_movie(&self, mut draft: MovieDraft) -> Result<Movie, DomainError> {
        validate_draft(&draft)?;
        draft.name = draft.name.trim().to_string();

        let metadata = match self.metadata.lookup_title(&draft.name).await {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(title = %draft.name, error = %e, "metadata lookup failed, saving form data only");
                None
            }
        };

        let now = Utc::now();
        let mut movie = compose_movie(
            uuid::Uuid::new_v4().to_string(),
            now.timestamp(),
            &draft,
            metadata,
        );

        if let Some(poster) = draft.poster.take() {
            let path = poster_storage_path(&poster.file_name, now.timestamp_millis());
            let url = self.posters.upload(&path, &poster.bytes).await?;
            attach_upload(&mut movie, StoredPoster { path, url });
        }

        if let Err(e) = self.movies.add_movie(&movie).await {
            if let Some(path) = movie.photo_path.as_deref() {
                self.discard_poster(&movie.id, path).await;
            }
            return Err(e);
        }
        info!(id = %movie.id, title = %movie.title, enriched = movie.omdb.is_some(), "movie added");
        Ok(movie)
    }

    /// Filter by title, then page. `limit` falls back to the configured page size.
    pub async fn list_movies(
        &self,
        query: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<MoviePage, DomainError> {
        let movies = self.movies.list_movies().await?;
        let cards: Vec<MovieCard> = filter_by_title(movies, query)
            .iter()
            .map(|m| MovieCard::from_movie(m, &self.default_poster))
            .collect();
        Ok(paginate(cards, offset, limit.unwrap_or(self.page_size)))
    }

    pub async fn get_movie(&self, id: &str) -> Result<Movie, DomainError> {
        self.movies
            .get_movie(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Movie {} not found.", id)))
    }

    /// Delete the record, then its uploaded poster. Poster removal failures are only logged.
    pub async fn delete_movie(&self, id: &str) -> Result<(), DomainError> {
        let movie = self.get_movie(id).await?;
        if !self.movies.delete_movie(id).await? {
            return Err(DomainError::NotFound(format!("Movie {} not found.", id)));
        }
        if let Some(path) = movie.photo_path.as_deref() {
            self.discard_poster(id, path).await;
        }
        info!(id, "movie deleted");
        Ok(())
    }

    async fn discard_poster(&self, id: &str, path: &str) {
        if let Err(e) = self.posters.remove(path).await {
            warn!(id, path, error = %e, "failed to remove poster");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovieMetadata, PosterUpload};
    use tokio::sync::Mutex;

    struct StubMetadata {
        result: Result<MovieMetadata, String>,
    }

    #[async_trait::async_trait]
    impl MetadataPort for StubMetadata {
        async fn lookup_title(&self, _title: &str) -> Result<MovieMetadata, DomainError> {
            self.result.clone().map_err(DomainError::Upstream)
        }
    }

    #[derive(Default)]
    struct MemoryMovies {
        items: Mutex<Vec<Movie>>,
    }

    #[async_trait::async_trait]
    impl MovieRepoPort for MemoryMovies {
        async fn add_movie(&self, movie: &Movie) -> Result<(), DomainError> {
            self.items.lock().await.insert(0, movie.clone());
            Ok(())
        }

        async fn list_movies(&self) -> Result<Vec<Movie>, DomainError> {
            Ok(self.items.lock().await.clone())
        }

        async fn get_movie(&self, id: &str) -> Result<Option<Movie>, DomainError> {
            Ok(self.items.lock().await.iter().find(|m| m.id == id).cloned())
        }

        async fn delete_movie(&self, id: &str) -> Result<bool, DomainError> {
            let mut items = self.items.lock().await;
            let before = items.len();
            items.retain(|m| m.id != id);
            Ok(items.len() != before)
        }
    }

    struct UnwritableMovies;

    #[async_trait::async_trait]
    impl MovieRepoPort for UnwritableMovies {
        async fn add_movie(&self, _movie: &Movie) -> Result<(), DomainError> {
            Err(DomainError::Repo("disk full".into()))
        }

        async fn list_movies(&self) -> Result<Vec<Movie>, DomainError> {
            Ok(Vec::new())
        }

        async fn get_movie(&self, _id: &str) -> Result<Option<Movie>, DomainError> {
            Ok(None)
        }

        async fn delete_movie(&self, _id: &str) -> Result<bool, DomainError> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct MemoryPosters {
        uploaded: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl PosterStorePort for MemoryPosters {
        async fn upload(&self, path: &str, _bytes: &[u8]) -> Result<String, DomainError> {
            self.uploaded.lock().await.push(path.to_string());
            Ok(format!("http://cdn/{}", path))
        }

        async fn remove(&self, path: &str) -> Result<(), DomainError> {
            self.removed.lock().await.push(path.to_string());
            Ok(())
        }
    }

    fn alien() -> MovieMetadata {
        MovieMetadata {
            title: "Alien".into(),
            rating: "8.5".into(),
            plot: "Crew meets alien.".into(),
            poster: "http://img/alien.jpg".into(),
        }
    }

    fn service(
        result: Result<MovieMetadata, String>,
    ) -> (CatalogService, Arc<MemoryMovies>, Arc<MemoryPosters>) {
        let movies = Arc::new(MemoryMovies::default());
        let posters = Arc::new(MemoryPosters::default());
        let svc = CatalogService::new(
            Arc::new(StubMetadata { result }),
            movies.clone(),
            posters.clone(),
            "/default.jpg".into(),
            4,
        );
        (svc, movies, posters)
    }

    fn draft(name: &str) -> MovieDraft {
        MovieDraft {
            name: name.into(),
            rating: 5,
            analysis: "Classic.".into(),
            poster: None,
        }
    }

    #[tokio::test]
    async fn test_add_movie_enriched_from_metadata() {
        let (svc, movies, posters) = service(Ok(alien()));
        let movie = svc.add_movie(draft("  alien ")).await.unwrap();

        assert_eq!(movie.title, "Alien");
        assert_eq!(movie.analysis, "Classic.");
        assert_eq!(movie.photo_url.as_deref(), Some("http://img/alien.jpg"));
        assert_eq!(movie.omdb, Some(alien()));
        assert_eq!(movies.items.lock().await.len(), 1);
        assert!(posters.uploaded.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_movie_survives_lookup_failure() {
        let (svc, movies, _) = service(Err("timeout".into()));
        let movie = svc.add_movie(draft("Home Video")).await.unwrap();

        assert_eq!(movie.title, "Home Video");
        assert!(movie.omdb.is_none());
        assert_eq!(movies.items.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_movie_uploads_poster() {
        let (svc, _, posters) = service(Ok(alien()));
        let mut d = draft("Alien");
        d.poster = Some(PosterUpload {
            file_name: "my poster.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        });
        let movie = svc.add_movie(d).await.unwrap();

        let path = movie.photo_path.clone().unwrap();
        assert!(path.starts_with("asimovies/"));
        assert!(path.ends_with("_my_poster.png"));
        assert_eq!(movie.photo_url, Some(format!("http://cdn/{}", path)));
        assert_eq!(*posters.uploaded.lock().await, vec![path]);
    }

    #[tokio::test]
    async fn test_failed_save_removes_uploaded_poster() {
        let dir = tempfile::tempdir().unwrap();
        let posters = Arc::new(crate::adapters::storage::FsPosterStore::new(
            dir.path(),
            "http://test/media",
        ));
        let svc = CatalogService::new(
            Arc::new(StubMetadata {
                result: Err("offline".into()),
            }),
            Arc::new(UnwritableMovies),
            posters,
            "/default.jpg".into(),
            4,
        );
        let mut d = draft("Home Video");
        d.poster = Some(PosterUpload {
            file_name: "p.jpg".into(),
            content_type: None,
            bytes: vec![0xff, 0xd8],
        });

        let err = svc.add_movie(d).await.unwrap_err();
        assert!(matches!(err, DomainError::Repo(ref m) if m == "disk full"));

        let folder = dir.path().join(crate::domain::catalog::POSTER_FOLDER);
        let left = std::fs::read_dir(&folder)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn test_add_movie_rejects_invalid_form() {
        let (svc, movies, _) = service(Ok(alien()));
        let mut d = draft("");
        assert!(matches!(
            svc.add_movie(d.clone()).await,
            Err(DomainError::Validation(_))
        ));
        d.name = "Alien".into();
        d.analysis = String::new();
        assert!(svc.add_movie(d).await.is_err());
        assert!(movies.items.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let (svc, _, _) = service(Err("offline".into()));
        for name in ["Alien", "Aliens", "Heat", "Alien 3", "Alien: Resurrection", "Ran"] {
            svc.add_movie(draft(name)).await.unwrap();
        }

        let page = svc.list_movies("alien", 0, None).await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 4);
        assert!(!page.has_next);
        assert_eq!(page.items[0].poster, "/default.jpg");

        let all = svc.list_movies("", 4, None).await.unwrap();
        assert_eq!(all.total, 6);
        assert_eq!(all.items.len(), 2);
        assert!(all.has_previous);

        let small = svc.list_movies("", 0, Some(2)).await.unwrap();
        assert_eq!(small.items.len(), 2);
        assert!(small.has_next);
    }

    #[tokio::test]
    async fn test_delete_removes_poster() {
        let (svc, movies, posters) = service(Ok(alien()));
        let mut d = draft("Alien");
        d.poster = Some(PosterUpload {
            file_name: "a.jpg".into(),
            content_type: None,
            bytes: vec![0],
        });
        let movie = svc.add_movie(d).await.unwrap();

        svc.delete_movie(&movie.id).await.unwrap();
        assert!(movies.items.lock().await.is_empty());
        assert_eq!(posters.removed.lock().await.len(), 1);

        assert!(matches!(
            svc.delete_movie(&movie.id).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            svc.get_movie("missing").await,
            Err(DomainError::NotFound(_))
        ));
    }
}
