//! SQLite-backed store via libsql. Implements MovieRepoPort, UserRepoPort and IdentityPort.
//!
//! One database file (data/asimovies.db) holds movies, user profiles and credentials.
//! Upstream metadata mirrored on a movie is stored as a JSON column.
//! Passwords are stored as argon2id PHC strings.

use crate::domain::account::looks_like_email;
use crate::domain::{
    DomainError, Identity, IdentityError, Movie, MovieMetadata, User, UserRole,
};
use crate::ports::{IdentityPort, MovieRepoPort, UserRepoPort};
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use libsql::{params, Connection, Database, Row};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const MOVIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    analysis TEXT NOT NULL DEFAULT '',
    rating INTEGER NOT NULL DEFAULT 0,
    photo_path TEXT,
    photo_url TEXT,
    omdb_json TEXT,
    created_at INTEGER NOT NULL
)"#;
const MOVIES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_movies_created ON movies (created_at DESC)";

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL DEFAULT 'user'
)"#;

/// Credentials. Emails are stored lowercased. `verification_token` is cleared once used.
const ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    uid TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    email_verified INTEGER NOT NULL DEFAULT 0,
    verification_token TEXT UNIQUE,
    created_at INTEGER NOT NULL
)"#;

/// Verification e-mails waiting to be sent.
const EMAIL_VERIFICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS email_verifications (
    email TEXT NOT NULL,
    token TEXT NOT NULL,
    requested_at INTEGER NOT NULL
)"#;

/// Password reset requests, picked up by whatever delivers the e-mails.
const PASSWORD_RESETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS password_resets (
    email TEXT NOT NULL,
    requested_at INTEGER NOT NULL
)"#;

const MOVIE_COLUMNS: &str =
    "id, title, analysis, rating, photo_path, photo_url, omdb_json, created_at";

fn repo_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Repo(e.to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Repo(format!("password hashing failed: {}", e)))
}

/// Constant-time check against a stored PHC string.
fn password_matches(password: &str, stored: &str) -> Result<bool, IdentityError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| IdentityError::Other(format!("stored hash unreadable: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// SQLite repository. Safe to share via Arc; a connection is opened per operation.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
}

impl SqliteRepo {
    /// Connect to (or create) the database in `base_dir` and ensure the schema exists.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(repo_err)?;
        let db_path = base.join("asimovies.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(repo_err)?;
        let conn = db.connect().map_err(repo_err)?;

        // PRAGMA returns a row (new value); consume it since execute fails on rows.
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Repo(format!("WAL pragma failed: {}", e)))?;
        while wal_rows.next().await.map_err(repo_err)?.is_some() {}

        for ddl in [
            MOVIES_TABLE,
            MOVIES_INDEX,
            USERS_TABLE,
            ACCOUNTS_TABLE,
            EMAIL_VERIFICATIONS_TABLE,
            PASSWORD_RESETS_TABLE,
        ] {
            conn.execute(ddl, ()).await.map_err(repo_err)?;
        }

        info!(path = %db_path.display(), "SQLite connected with WAL mode");

        Ok(Self { db, db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Latest verification token queued for `email`.
    #[cfg(test)]
    pub(crate) async fn queued_verification_token(&self, email: &str) -> Option<String> {
        let conn = self.conn().ok()?;
        let mut rows = conn
            .query(
                "SELECT token FROM email_verifications WHERE email = ?1 ORDER BY rowid DESC LIMIT 1",
                params![email],
            )
            .await
            .ok()?;
        let row = rows.next().await.ok()??;
        row.get(0).ok()
    }

    fn conn(&self) -> Result<Connection, DomainError> {
        self.db.connect().map_err(repo_err)
    }

    fn row_to_movie(row: &Row) -> Result<Movie, DomainError> {
        let rating: i64 = row.get(3).map_err(repo_err)?;
        let id: String = row.get(0).map_err(repo_err)?;
        let omdb = match row.get::<Option<String>>(6).map_err(repo_err)? {
            Some(raw) => match serde_json::from_str::<MovieMetadata>(&raw) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!(id = %id, error = %e, "unreadable omdb_json, dropping metadata");
                    None
                }
            },
            None => None,
        };
        Ok(Movie {
            id,
            title: row.get::<String>(1).unwrap_or_default(),
            analysis: row.get::<String>(2).unwrap_or_default(),
            rating: rating.clamp(0, u8::MAX as i64) as u8,
            photo_path: row.get(4).ok(),
            photo_url: row.get(5).ok(),
            omdb,
            created_at: row.get(7).map_err(repo_err)?,
        })
    }

    fn row_to_identity(row: &Row) -> Result<Identity, DomainError> {
        let verified: i64 = row.get(2).map_err(repo_err)?;
        Ok(Identity {
            uid: row.get(0).map_err(repo_err)?,
            email: row.get(1).map_err(repo_err)?,
            email_verified: verified != 0,
        })
    }
}

#[async_trait::async_trait]
impl MovieRepoPort for SqliteRepo {
    async fn add_movie(&self, movie: &Movie) -> Result<(), DomainError> {
        let omdb_json = match &movie.omdb {
            Some(m) => Some(serde_json::to_string(m).map_err(repo_err)?),
            None => None,
        };
        self.conn()?
            .execute(
                r#"
                INSERT INTO movies (id, title, analysis, rating, photo_path, photo_url, omdb_json, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    movie.id.as_str(),
                    movie.title.as_str(),
                    movie.analysis.as_str(),
                    movie.rating as i64,
                    movie.photo_path.clone(),
                    movie.photo_url.clone(),
                    omdb_json,
                    movie.created_at
                ],
            )
            .await
            .map_err(repo_err)?;
        info!(id = %movie.id, title = %movie.title, "movie saved");
        Ok(())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM movies ORDER BY created_at DESC, rowid DESC",
                    MOVIE_COLUMNS
                ),
                (),
            )
            .await
            .map_err(repo_err)?;
        let mut movies = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            movies.push(Self::row_to_movie(&row)?);
        }
        Ok(movies)
    }

    async fn get_movie(&self, id: &str) -> Result<Option<Movie>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM movies WHERE id = ?1", MOVIE_COLUMNS),
                params![id],
            )
            .await
            .map_err(repo_err)?;
        match rows.next().await.map_err(repo_err)? {
            Some(row) => Ok(Some(Self::row_to_movie(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_movie(&self, id: &str) -> Result<bool, DomainError> {
        let affected = self
            .conn()?
            .execute("DELETE FROM movies WHERE id = ?1", params![id])
            .await
            .map_err(repo_err)?;
        Ok(affected > 0)
    }
}

#[async_trait::async_trait]
impl UserRepoPort for SqliteRepo {
    async fn save_user(&self, user: &User) -> Result<(), DomainError> {
        self.conn()?
            .execute(
                r#"
                INSERT INTO users (id, name, email, role)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email,
                    role = excluded.role
                "#,
                params![
                    user.id.as_str(),
                    user.name.as_str(),
                    user.email.as_str(),
                    user.role.as_str()
                ],
            )
            .await
            .map_err(repo_err)?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT id, name, email, role FROM users WHERE id = ?1",
                params![id],
            )
            .await
            .map_err(repo_err)?;
        let Some(row) = rows.next().await.map_err(repo_err)? else {
            return Ok(None);
        };
        let role: String = row.get::<String>(3).unwrap_or_default();
        Ok(Some(User {
            id: row.get(0).map_err(repo_err)?,
            name: row.get::<String>(1).unwrap_or_default(),
            email: row.get::<String>(2).unwrap_or_default(),
            role: UserRole::parse(&role),
        }))
    }
}

#[async_trait::async_trait]
impl IdentityPort for SqliteRepo {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let email = normalize_email(email);
        if !looks_like_email(&email) {
            return Err(IdentityError::InvalidEmail.into());
        }
        let conn = self.conn()?;
        let mut rows = conn
            .query("SELECT uid FROM accounts WHERE email = ?1", params![email.as_str()])
            .await
            .map_err(repo_err)?;
        if rows.next().await.map_err(repo_err)?.is_some() {
            return Err(IdentityError::EmailInUse.into());
        }

        let uid = uuid::Uuid::new_v4().to_string();
        let token = uuid::Uuid::new_v4().simple().to_string();
        let hash = hash_password(password)?;
        let now = now_secs();
        conn.execute(
            r#"
            INSERT INTO accounts (uid, email, password_hash, email_verified, verification_token, created_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?5)
            "#,
            params![uid.as_str(), email.as_str(), hash, token.as_str(), now],
        )
        .await
        .map_err(repo_err)?;
        conn.execute(
            "INSERT INTO email_verifications (email, token, requested_at) VALUES (?1, ?2, ?3)",
            params![email.as_str(), token.as_str(), now],
        )
        .await
        .map_err(repo_err)?;

        info!(uid = %uid, "account created");
        Ok(Identity {
            uid,
            email,
            email_verified: false,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = normalize_email(email);
        if !looks_like_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }
        let other = |e: libsql::Error| IdentityError::Other(e.to_string());
        let conn = self
            .db
            .connect()
            .map_err(other)?;
        let mut rows = conn
            .query(
                "SELECT uid, email, email_verified, password_hash FROM accounts WHERE email = ?1",
                params![email.as_str()],
            )
            .await
            .map_err(other)?;
        let Some(row) = rows.next().await.map_err(other)? else {
            return Err(IdentityError::UserNotFound);
        };
        let stored_hash: String = row.get(3).map_err(other)?;
        if !password_matches(password, &stored_hash)? {
            return Err(IdentityError::WrongPassword);
        }
        Self::row_to_identity(&row).map_err(|e| IdentityError::Other(e.to_string()))
    }

    async fn get_identity(&self, uid: &str) -> Result<Option<Identity>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT uid, email, email_verified FROM accounts WHERE uid = ?1",
                params![uid],
            )
            .await
            .map_err(repo_err)?;
        match rows.next().await.map_err(repo_err)? {
            Some(row) => Ok(Some(Self::row_to_identity(&row)?)),
            None => Ok(None),
        }
    }

    async fn confirm_email(&self, token: &str) -> Result<Option<Identity>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT uid, email FROM accounts WHERE verification_token = ?1",
                params![token],
            )
            .await
            .map_err(repo_err)?;
        let Some(row) = rows.next().await.map_err(repo_err)? else {
            return Ok(None);
        };
        let uid: String = row.get(0).map_err(repo_err)?;
        let email: String = row.get(1).map_err(repo_err)?;
        drop(rows);

        conn.execute(
            "UPDATE accounts SET email_verified = 1, verification_token = NULL WHERE uid = ?1",
            params![uid.as_str()],
        )
        .await
        .map_err(repo_err)?;
        info!(uid = %uid, "e-mail verified");
        Ok(Some(Identity {
            uid,
            email,
            email_verified: true,
        }))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let email = normalize_email(email);
        let conn = self.conn()?;
        let mut rows = conn
            .query("SELECT uid FROM accounts WHERE email = ?1", params![email.as_str()])
            .await
            .map_err(repo_err)?;
        if rows.next().await.map_err(repo_err)?.is_none() {
            return Err(IdentityError::UserNotFound.into());
        }
        conn.execute(
            "INSERT INTO password_resets (email, requested_at) VALUES (?1, ?2)",
            params![email.as_str(), now_secs()],
        )
        .await
        .map_err(repo_err)?;
        info!(email = %email, "password reset requested");
        Ok(())
    }
}
