//! Geocache record model.
//!
//! Filters never look at a concrete struct directly: leaves read attributes
//! through the [`CacheRecord`] trait, where every accessor returns `None` when
//! the attribute is unknown. [`Geocache`] is the serde-backed implementation
//! used for JSON input.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// The kind of a geocache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheType {
    Traditional,
    Multi,
    Mystery,
    Letterbox,
    Wherigo,
    Event,
    Mega,
    Giga,
    Cito,
    Earth,
    Virtual,
    Webcam,
    Lab,
}

impl CacheType {
    /// Every cache type, in declaration order.
    pub const ALL: [CacheType; 13] = [
        CacheType::Traditional,
        CacheType::Multi,
        CacheType::Mystery,
        CacheType::Letterbox,
        CacheType::Wherigo,
        CacheType::Event,
        CacheType::Mega,
        CacheType::Giga,
        CacheType::Cito,
        CacheType::Earth,
        CacheType::Virtual,
        CacheType::Webcam,
        CacheType::Lab,
    ];

    /// The tag used in config strings and JSON.
    pub fn tag(self) -> &'static str {
        match self {
            CacheType::Traditional => "traditional",
            CacheType::Multi => "multi",
            CacheType::Mystery => "mystery",
            CacheType::Letterbox => "letterbox",
            CacheType::Wherigo => "wherigo",
            CacheType::Event => "event",
            CacheType::Mega => "mega",
            CacheType::Giga => "giga",
            CacheType::Cito => "cito",
            CacheType::Earth => "earth",
            CacheType::Virtual => "virtual",
            CacheType::Webcam => "webcam",
            CacheType::Lab => "lab",
        }
    }

    /// Looks up a cache type by tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Container size of a geocache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSize {
    Nano,
    Micro,
    Small,
    Regular,
    Large,
    VeryLarge,
    Other,
    Virtual,
    NotChosen,
}

impl CacheSize {
    /// Every container size, smallest first.
    pub const ALL: [CacheSize; 9] = [
        CacheSize::Nano,
        CacheSize::Micro,
        CacheSize::Small,
        CacheSize::Regular,
        CacheSize::Large,
        CacheSize::VeryLarge,
        CacheSize::Other,
        CacheSize::Virtual,
        CacheSize::NotChosen,
    ];

    /// The tag used in config strings and JSON.
    pub fn tag(self) -> &'static str {
        match self {
            CacheSize::Nano => "nano",
            CacheSize::Micro => "micro",
            CacheSize::Small => "small",
            CacheSize::Regular => "regular",
            CacheSize::Large => "large",
            CacheSize::VeryLarge => "very_large",
            CacheSize::Other => "other",
            CacheSize::Virtual => "virtual",
            CacheSize::NotChosen => "not_chosen",
        }
    }

    /// Looks up a size by tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for CacheSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Boolean status flags a record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusFlag {
    Found,
    Disabled,
    Archived,
    Premium,
}

impl StatusFlag {
    /// Every flag, in config order.
    pub const ALL: [StatusFlag; 4] = [
        StatusFlag::Found,
        StatusFlag::Disabled,
        StatusFlag::Archived,
        StatusFlag::Premium,
    ];

    /// The tag used in config strings.
    pub fn tag(self) -> &'static str {
        match self {
            StatusFlag::Found => "found",
            StatusFlag::Disabled => "disabled",
            StatusFlag::Archived => "archived",
            StatusFlag::Premium => "premium",
        }
    }

    /// Looks up a flag by tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.tag().eq_ignore_ascii_case(tag))
    }
}

/// WGS84 coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, -90 to 90.
    pub lat: f64,
    /// Longitude, -180 to 180.
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair without validation.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // rounding can push `a` just past 1 for antipodal points
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

/// Read-only view of a candidate record.
///
/// Every accessor returns `None` when the attribute is unknown, which filter
/// leaves report as inconclusive rather than as a mismatch.
pub trait CacheRecord {
    /// The cache type.
    fn cache_type(&self) -> Option<CacheType>;
    /// The container size.
    fn size(&self) -> Option<CacheSize>;
    /// Difficulty rating, 1.0 to 5.0.
    fn difficulty(&self) -> Option<f64>;
    /// Terrain rating, 1.0 to 5.0.
    fn terrain(&self) -> Option<f64>;
    /// Published coordinates.
    fn coords(&self) -> Option<Coordinates>;
    /// Date the cache was hidden.
    fn hidden(&self) -> Option<NaiveDate>;
    /// Listing name.
    fn name(&self) -> Option<&str>;
    /// Owner display name.
    fn owner(&self) -> Option<&str>;
    /// Listing description.
    fn description(&self) -> Option<&str>;
    /// Favorite points.
    fn favorites(&self) -> Option<u32>;
    /// A status flag.
    fn flag(&self, flag: StatusFlag) -> Option<bool>;
}

/// A geocache as loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geocache {
    /// Unique code, e.g. `GC1234`.
    pub geocode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cache_type: Option<CacheType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CacheSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coordinates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,
}

impl Geocache {
    /// Creates a record that only knows its geocode.
    pub fn new(geocode: impl Into<String>) -> Self {
        Self {
            geocode: geocode.into(),
            ..Self::default()
        }
    }
}

impl CacheRecord for Geocache {
    fn cache_type(&self) -> Option<CacheType> {
        self.cache_type
    }

    fn size(&self) -> Option<CacheSize> {
        self.size
    }

    fn difficulty(&self) -> Option<f64> {
        self.difficulty
    }

    fn terrain(&self) -> Option<f64> {
        self.terrain
    }

    fn coords(&self) -> Option<Coordinates> {
        self.coords
    }

    fn hidden(&self) -> Option<NaiveDate> {
        self.hidden
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn favorites(&self) -> Option<u32> {
        self.favorites
    }

    fn flag(&self, flag: StatusFlag) -> Option<bool> {
        match flag {
            StatusFlag::Found => self.found,
            StatusFlag::Disabled => self.disabled,
            StatusFlag::Archived => self.archived,
            StatusFlag::Premium => self.premium,
        }
    }
}
