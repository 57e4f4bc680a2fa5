//! Named filter storage.
//!
//! [`FilterStore`] keeps a collection of named filters plus the active filter
//! of each [`ContextKind`], and writes the whole collection through a
//! [`StorageMedium`] after every change. The default medium is a JSON file at
//! an XDG data path (`~/.local/share/gf/filters.json` on Linux).
//!
//! Entries are stored as config strings. An entry that no longer parses (for
//! example, written by a newer version with an incompatible leaf) is kept
//! untouched and reported by [`FilterStore::invalid_entries`] instead of
//! being dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use thiserror::Error;
use tracing::{debug, warn};

use crate::filter::{to_config_opt, ConfigParser, FilterError};
use crate::named::NamedFilter;

/// Default store filename.
const STORE_FILENAME: &str = "filters.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "gf";

/// Current version of the persisted document.
pub const DOCUMENT_VERSION: u32 = 1;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read filter store '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write filter store '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document was written by a newer version.
    #[error("filter store version {found} is newer than supported version {}", DOCUMENT_VERSION)]
    UnsupportedVersion {
        /// The version found on disk.
        found: u32,
    },

    /// A filter must have a non-blank name to be stored.
    #[error("cannot store a filter without a name")]
    BlankName,

    /// No filter with this name.
    #[error("filter '{name}' not found.{}", suggestion_suffix(.suggestion))]
    NotFound {
        /// The requested name.
        name: String,
        /// The closest stored name, if any is close enough.
        suggestion: Option<String>,
    },

    /// A stored filter whose config does not parse.
    #[error("stored filter '{name}' is unreadable: {source}")]
    InvalidFilter {
        /// The entry name.
        name: String,
        /// Why parsing failed.
        #[source]
        source: FilterError,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" Did you mean '{s}'?"),
        None => String::new(),
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Where an active filter applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// The live map.
    Live,
    /// Offline (stored) caches.
    Offline,
    /// A one-off list, e.g. search results.
    Transient,
}

impl ContextKind {
    pub const ALL: [ContextKind; 3] = [ContextKind::Live, ContextKind::Offline, ContextKind::Transient];

    pub fn tag(self) -> &'static str {
        match self {
            ContextKind::Live => "live",
            ContextKind::Offline => "offline",
            ContextKind::Transient => "transient",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A persisted filter: its name and tree config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFilter {
    pub name: String,
    pub config: String,
}

impl StoredFilter {
    /// Parses the stored config.
    fn parse(&self) -> Result<NamedFilter, FilterError> {
        ConfigParser::parse(&self.config).map(|outcome| NamedFilter::new(self.name.clone(), outcome.tree))
    }

    /// Config used for overwrite comparison.
    ///
    /// Normalized only when parsing keeps every node; otherwise the raw
    /// text, so unknown kinds still count as a difference.
    fn comparable_config(&self) -> String {
        match ConfigParser::parse(&self.config) {
            Ok(outcome) if outcome.is_lossless() => to_config_opt(outcome.tree.as_ref()),
            _ => self.config.clone(),
        }
    }
}

/// The whole persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDocument {
    pub version: u32,
    /// Named filters in insertion order, unique by name.
    #[serde(default)]
    pub filters: Vec<StoredFilter>,
    /// Transport config of the active filter per context.
    #[serde(default)]
    pub active: BTreeMap<ContextKind, String>,
}

impl Default for FilterDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            filters: Vec::new(),
            active: BTreeMap::new(),
        }
    }
}

/// Durable storage for a [`FilterDocument`].
pub trait StorageMedium {
    /// Loads the persisted document; `Ok(None)` if nothing was persisted yet.
    fn load(&self) -> StoreResult<Option<FilterDocument>>;

    /// Replaces the persisted document.
    fn persist(&mut self, document: &FilterDocument) -> StoreResult<()>;
}

/// A JSON file written atomically (temp file + rename).
#[derive(Debug, Clone)]
pub struct JsonFileMedium {
    /// Path to the store file.
    path: PathBuf,
}

impl JsonFileMedium {
    /// Creates a medium at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> StoreResult<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Creates a medium with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG data path for the store file.
    ///
    /// On Unix: `~/.local/share/gf/filters.json`
    /// On macOS: `~/Library/Application Support/gf/filters.json`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> StoreResult<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(STORE_FILENAME))
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageMedium for JsonFileMedium {
    fn load(&self) -> StoreResult<Option<FilterDocument>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn persist(&mut self, document: &FilterDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(document)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| StoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), filters = document.filters.len(), "persisted filter store");
        Ok(())
    }
}

/// An in-memory medium.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    document: Option<FilterDocument>,
    writes: usize,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing document.
    pub fn with_document(document: FilterDocument) -> Self {
        Self {
            document: Some(document),
            writes: 0,
        }
    }

    /// The last persisted document.
    pub fn document(&self) -> Option<&FilterDocument> {
        self.document.as_ref()
    }

    /// Number of persist calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StorageMedium for MemoryMedium {
    fn load(&self) -> StoreResult<Option<FilterDocument>> {
        Ok(self.document.clone())
    }

    fn persist(&mut self, document: &FilterDocument) -> StoreResult<()> {
        self.document = Some(document.clone());
        self.writes += 1;
        Ok(())
    }
}

/// A stored entry whose config does not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidEntry {
    pub name: String,
    pub config: String,
    pub error: FilterError,
}

/// Named filter collection over a storage medium.
///
/// Reads go through `&self`; every mutation persists the whole document
/// before returning. Wrap the store in a lock to share it across threads.
///
/// # Example
///
/// ```
/// use geofilter::filter::FilterNode;
/// use geofilter::store::{FilterStore, MemoryMedium};
/// use geofilter::NamedFilter;
///
/// let mut store = FilterStore::open(MemoryMedium::new())?;
/// let tree = FilterNode::from_config("AND(TYPE(multi))").unwrap();
/// store.save(&NamedFilter::new("multis", tree))?;
///
/// assert_eq!(store.list().len(), 1);
/// assert!(store.load("multis")?.is_some());
/// # Ok::<(), geofilter::store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct FilterStore<M: StorageMedium> {
    medium: M,
    document: FilterDocument,
}

impl FilterStore<JsonFileMedium> {
    /// Opens the store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// See [`FilterStore::open`] and [`JsonFileMedium::new`].
    pub fn open_default() -> StoreResult<Self> {
        Self::open(JsonFileMedium::new()?)
    }
}

impl<M: StorageMedium> FilterStore<M> {
    /// Loads the collection from `medium`, starting empty if nothing was
    /// persisted yet.
    ///
    /// # Errors
    ///
    /// Returns the medium's read errors, and `StoreError::UnsupportedVersion`
    /// for a document written by a newer version.
    pub fn open(medium: M) -> StoreResult<Self> {
        let document = medium.load()?.unwrap_or_default();
        if document.version > DOCUMENT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: document.version,
            });
        }

        let store = Self { medium, document };
        for entry in store.invalid_entries() {
            warn!(name = %entry.name, error = %entry.error, "stored filter does not parse");
        }
        Ok(store)
    }

    /// The storage medium.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// The in-memory document.
    pub fn document(&self) -> &FilterDocument {
        &self.document
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.document.filters.iter().position(|f| f.name == name)
    }

    /// Persists `document` and makes it current; on a write error the
    /// in-memory state is left as it was.
    fn commit(&mut self, document: FilterDocument) -> StoreResult<()> {
        self.medium.persist(&document)?;
        self.document = document;
        Ok(())
    }

    // ==================== Named Filters ====================

    /// Stores `filter` under its own name.
    ///
    /// A new name is appended; an existing name is overwritten in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::BlankName` for an unnamed filter, or the
    /// medium's write errors.
    pub fn save(&mut self, filter: &NamedFilter) -> StoreResult<()> {
        if filter.has_blank_name() {
            return Err(StoreError::BlankName);
        }

        let entry = StoredFilter {
            name: filter.name.clone(),
            config: filter.tree_config(),
        };
        let mut document = self.document.clone();
        match self.position(&filter.name) {
            Some(index) => document.filters[index] = entry,
            None => document.filters.push(entry),
        }
        self.commit(document)
    }

    /// Stores `filter` under `name` and returns the renamed filter.
    ///
    /// # Errors
    ///
    /// See [`FilterStore::save`].
    pub fn save_as(&mut self, name: &str, filter: &NamedFilter) -> StoreResult<NamedFilter> {
        let renamed = NamedFilter::new(name, filter.tree.clone());
        self.save(&renamed)?;
        Ok(renamed)
    }

    /// Returns true if a filter named `name` exists with a different tree.
    ///
    /// Callers ask for confirmation before overwriting in that case.
    pub fn exists_and_differs(&self, name: &str, filter: &NamedFilter) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        self.document.filters[index].comparable_config() != filter.tree_config()
    }

    /// All readable filters, in insertion order.
    pub fn list(&self) -> Vec<NamedFilter> {
        self.document
            .filters
            .iter()
            .filter_map(|entry| entry.parse().ok())
            .collect()
    }

    /// All stored names, readable or not.
    pub fn names(&self) -> Vec<&str> {
        self.document.filters.iter().map(|f| f.name.as_str()).collect()
    }

    /// Entries whose config does not parse.
    pub fn invalid_entries(&self) -> Vec<InvalidEntry> {
        self.document
            .filters
            .iter()
            .filter_map(|entry| {
                entry.parse().err().map(|error| InvalidEntry {
                    name: entry.name.clone(),
                    config: entry.config.clone(),
                    error,
                })
            })
            .collect()
    }

    /// Loads a filter by exact name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidFilter` if the entry exists but does not
    /// parse.
    pub fn load(&self, name: &str) -> StoreResult<Option<NamedFilter>> {
        let Some(index) = self.position(name) else {
            return Ok(None);
        };
        self.document.filters[index]
            .parse()
            .map(Some)
            .map_err(|source| StoreError::InvalidFilter {
                name: name.to_string(),
                source,
            })
    }

    /// Loads a filter that must exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound`, with the closest stored name as a
    /// suggestion, or `StoreError::InvalidFilter`.
    pub fn require(&self, name: &str) -> StoreResult<NamedFilter> {
        self.load(name)?.ok_or_else(|| StoreError::NotFound {
            name: name.to_string(),
            suggestion: find_similar_name(name, self.names().into_iter()),
        })
    }

    /// Deletes a filter; returns false if there was none.
    ///
    /// # Errors
    ///
    /// Returns the medium's write errors.
    pub fn delete(&mut self, name: &str) -> StoreResult<bool> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };
        let mut document = self.document.clone();
        document.filters.remove(index);
        self.commit(document)?;
        Ok(true)
    }

    // ==================== Active Filters ====================

    /// The active filter of `context`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidFilter` if the stored config does not
    /// parse.
    pub fn active(&self, context: ContextKind) -> StoreResult<Option<NamedFilter>> {
        let Some(config) = self.document.active.get(&context) else {
            return Ok(None);
        };
        NamedFilter::from_config(config)
            .map(Some)
            .map_err(|source| StoreError::InvalidFilter {
                name: format!("active {context} filter"),
                source,
            })
    }

    /// Makes `filter` the active filter of `context`.
    ///
    /// # Errors
    ///
    /// Returns the medium's write errors.
    pub fn set_active(&mut self, context: ContextKind, filter: &NamedFilter) -> StoreResult<()> {
        let mut document = self.document.clone();
        document.active.insert(context, filter.to_config());
        self.commit(document)
    }

    /// Clears the active filter of `context`; returns false if there was none.
    ///
    /// # Errors
    ///
    /// Returns the medium's write errors.
    pub fn clear_active(&mut self, context: ContextKind) -> StoreResult<bool> {
        let mut document = self.document.clone();
        if document.active.remove(&context).is_none() {
            return Ok(false);
        }
        self.commit(document)?;
        Ok(true)
    }
}

/// Finds the best matching name using Levenshtein distance.
///
/// Returns the best match if its edit distance is within the threshold and
/// it is not an exact match.
pub fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
