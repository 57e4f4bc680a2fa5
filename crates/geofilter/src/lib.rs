//! Typed, serializable geocache filters.
//!
//! This crate provides filter expression trees over geocache records with
//! tri-state evaluation, a compact config string format, basic/advanced
//! editing mode reconciliation, and a named filter store.
//!
//! - [`filter`] - trees, config codec, evaluator, mode reconciliation
//! - [`geocache`] - the record model filters read from
//! - [`named`] - filters with a name and their transport config
//! - [`store`] - persistence of named and active filters
//!
//! # Example
//!
//! ```
//! use geofilter::filter::{is_basic_expressible, FilterEvaluator};
//! use geofilter::geocache::{CacheType, Geocache};
//! use geofilter::NamedFilter;
//!
//! let filter = NamedFilter::from_config("AND(TYPE(multi),DIFFICULTY(1-3))").unwrap();
//! assert!(is_basic_expressible(&filter));
//!
//! let caches = vec![
//!     Geocache { cache_type: Some(CacheType::Multi), difficulty: Some(2.0), ..Geocache::new("GC1") },
//!     Geocache { cache_type: Some(CacheType::Multi), ..Geocache::new("GC2") },
//! ];
//! let selected = FilterEvaluator::for_filter(&filter).filter_records(&caches);
//! assert_eq!(selected.len(), 1);
//! assert_eq!(selected[0].geocode, "GC1");
//! ```

pub mod filter;
pub mod geocache;
pub mod named;
pub mod store;

pub use filter::{FilterError, FilterNode, FilterResult, LeafCriterion, LeafKind, Outcome, ParseError};
pub use geocache::{CacheRecord, Geocache};
pub use named::NamedFilter;
pub use store::{
    ContextKind, FilterDocument, FilterStore, JsonFileMedium, MemoryMedium, StorageMedium, StoreError,
    StoreResult, StoredFilter,
};
