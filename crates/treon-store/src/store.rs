//! JSON file access for ratings, sessions, and daily session counts.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use treon_core::{load_catalog, AppConfig, Catalog, DailySessionRecord, RawScore, Rating, Session};
use treon_ratings::validate_rating;
use uuid::Uuid;

use crate::records::{
    parse_record, DailyRecord, NewRating, RatingRecord, SessionRecord, StoredRecord,
};
use crate::StoreError;

/// Read-mostly view over the kiosk's data files.
///
/// Every read goes back to disk, so callers always see the latest file
/// contents. Writers must serialize [`FileStore::submit_rating`] calls
/// themselves.
#[derive(Debug, Clone)]
pub struct FileStore {
    ratings_path: PathBuf,
    sessions_path: PathBuf,
    daily_sessions_path: Option<PathBuf>,
    catalog: Option<Arc<Catalog>>,
}

impl FileStore {
    pub fn new(ratings_path: impl Into<PathBuf>, sessions_path: impl Into<PathBuf>) -> Self {
        Self {
            ratings_path: ratings_path.into(),
            sessions_path: sessions_path.into(),
            daily_sessions_path: None,
            catalog: None,
        }
    }

    #[must_use]
    pub fn with_daily_sessions(mut self, path: impl Into<PathBuf>) -> Self {
        self.daily_sessions_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Build a store from application config, loading the catalog if one is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Catalog`] if the catalog file cannot be loaded.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, StoreError> {
        let mut store = Self::new(&config.ratings_path, &config.sessions_path);

        if let Some(path) = &config.daily_sessions_path {
            store = store.with_daily_sessions(path);
        }

        if let Some(path) = &config.catalog_path {
            let catalog = load_catalog(path)?;
            tracing::info!(
                path = %path.display(),
                products = catalog.products.len(),
                listable = catalog.valid_product_count(),
                "catalog loaded"
            );
            store = store.with_catalog(catalog);
        }

        Ok(store)
    }

    #[must_use]
    pub fn ratings_path(&self) -> &Path {
        &self.ratings_path
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_deref()
    }

    /// All ratings, normalized. Shade names missing from a record are filled
    /// in from the catalog when possible.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the ratings file exists but cannot be read
    /// or is not a JSON array.
    pub fn ratings(&self) -> Result<Vec<Rating>, StoreError> {
        let records: Vec<RatingRecord> = read_records(&self.ratings_path, "ratings")?;
        let catalog = self.catalog();
        Ok(records
            .into_iter()
            .map(|record| record.into_rating(catalog))
            .collect())
    }

    /// All sessions, normalized.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the sessions file exists but cannot be read
    /// or is not a JSON array.
    pub fn sessions(&self) -> Result<Vec<Session>, StoreError> {
        let records: Vec<SessionRecord> = read_records(&self.sessions_path, "sessions")?;
        Ok(records.into_iter().map(SessionRecord::into_session).collect())
    }

    /// Hand-entered daily session counts; empty when none are configured.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn daily_records(&self) -> Result<Vec<DailySessionRecord>, StoreError> {
        let Some(path) = &self.daily_sessions_path else {
            return Ok(Vec::new());
        };
        let records: Vec<DailyRecord> = read_records(path, "daily_sessions")?;
        Ok(records.into_iter().map(DailySessionRecord::from).collect())
    }

    /// Validate a new rating, stamp it, and append it to the ratings file.
    ///
    /// The stored record uses canonical field names and the coerced integer
    /// score.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRating`] if the rating would be rejected
    /// by aggregation, or an I/O or serialization error if the file cannot
    /// be rewritten.
    pub fn submit_rating(&self, new: NewRating) -> Result<Rating, StoreError> {
        let mut rating = RatingRecord::from(new).into_rating(self.catalog());
        rating.submitted_at = Some(Utc::now());
        append_rating(&self.ratings_path, rating)
    }

    /// Remove every stored rating, leaving an empty array behind.
    ///
    /// Returns how many elements the file held, counting ones that do not
    /// parse as ratings. Sessions are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the existing file cannot be read or the
    /// empty array cannot be written.
    pub fn clear_ratings(&self) -> Result<usize, StoreError> {
        let removed = read_array(&self.ratings_path)?.map_or(0, |values| values.len());
        write_atomic(&self.ratings_path, b"[]")?;
        tracing::warn!(path = %self.ratings_path.display(), removed, "ratings cleared");
        Ok(removed)
    }
}

/// Validate `rating` and append it to the JSON array at `path`.
///
/// Labels are stored trimmed and the score as its coerced integer. Existing
/// records are kept exactly as they were, including ones this crate cannot
/// parse. The file is replaced atomically.
///
/// # Errors
///
/// Returns [`StoreError::InvalidRating`] if the rating has no usable brand,
/// shade name, or score; otherwise an I/O or JSON error.
pub fn append_rating(path: &Path, mut rating: Rating) -> Result<Rating, StoreError> {
    let valid = validate_rating(&rating).map_err(|reason| StoreError::InvalidRating(reason.to_string()))?;
    let (brand, shade_name, score) = (
        valid.brand.to_string(),
        valid.shade_name.to_string(),
        valid.score,
    );
    rating.brand = brand;
    rating.shade_name = shade_name;
    rating.score = Some(RawScore::Integer(i64::from(score)));

    let mut existing: Vec<serde_json::Value> = read_array(path)?.unwrap_or_default();
    existing.push(serde_json::to_value(&rating)?);
    let bytes = serde_json::to_vec_pretty(&existing)?;
    write_atomic(path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        brand = %rating.brand,
        shade = %rating.shade_name,
        score,
        "rating appended"
    );

    Ok(rating)
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Raw JSON array at `path`, or `None` if the file does not exist or is blank.
fn read_array(path: &Path) -> Result<Option<Vec<serde_json::Value>>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })
}

/// Parse every element of the array at `path` into `T`.
///
/// A missing file is an empty collection. Elements that do not match `T`
/// are logged and skipped so one corrupt record cannot hide the rest.
fn read_records<T: StoredRecord>(path: &Path, kind: &str) -> Result<Vec<T>, StoreError> {
    let Some(values) = read_array(path)? else {
        tracing::info!(path = %path.display(), kind, "data file missing or empty");
        return Ok(Vec::new());
    };

    let total = values.len();
    let mut records = Vec::with_capacity(total);
    for (index, value) in values.into_iter().enumerate() {
        match parse_record::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), kind, index, error = %e, "skipping malformed record");
            }
        }
    }

    tracing::debug!(path = %path.display(), kind, total, loaded = records.len(), "records loaded");
    Ok(records)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    fs::write(&tmp, bytes).map_err(|e| io_error(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(path, e));
    }

    Ok(())
}
