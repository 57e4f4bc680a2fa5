//! The closed set of leaf kinds.

use std::cmp::Ordering;
use std::fmt;

/// Identifies what a leaf criterion inspects.
///
/// Kinds are ordered for presentation by their display name (see
/// [`LeafKind::display_cmp`]); this order never influences evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Type,
    Difficulty,
    Terrain,
    Size,
    Name,
    Owner,
    Description,
    Favorites,
    Distance,
    Hidden,
    Status,
}

impl LeafKind {
    /// Every leaf kind, in declaration order.
    pub const ALL: [LeafKind; 11] = [
        LeafKind::Type,
        LeafKind::Difficulty,
        LeafKind::Terrain,
        LeafKind::Size,
        LeafKind::Name,
        LeafKind::Owner,
        LeafKind::Description,
        LeafKind::Favorites,
        LeafKind::Distance,
        LeafKind::Hidden,
        LeafKind::Status,
    ];

    /// Kinds editable in basic mode, in their canonical slot order.
    pub const BASIC: [LeafKind; 3] = [LeafKind::Type, LeafKind::Difficulty, LeafKind::Terrain];

    /// The tag written in config strings.
    pub fn tag(self) -> &'static str {
        match self {
            LeafKind::Type => "TYPE",
            LeafKind::Difficulty => "DIFFICULTY",
            LeafKind::Terrain => "TERRAIN",
            LeafKind::Size => "SIZE",
            LeafKind::Name => "NAME",
            LeafKind::Owner => "OWNER",
            LeafKind::Description => "DESCRIPTION",
            LeafKind::Favorites => "FAVORITES",
            LeafKind::Distance => "DISTANCE",
            LeafKind::Hidden => "HIDDEN",
            LeafKind::Status => "STATUS",
        }
    }

    /// Looks up a kind by config tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag().eq_ignore_ascii_case(tag))
    }

    /// Returns true if basic mode can edit this kind.
    pub fn is_basic(self) -> bool {
        Self::BASIC.contains(&self)
    }

    /// The name shown to users.
    pub fn display_name(self) -> &'static str {
        match self {
            LeafKind::Type => "Cache type",
            LeafKind::Difficulty => "Difficulty",
            LeafKind::Terrain => "Terrain",
            LeafKind::Size => "Size",
            LeafKind::Name => "Name",
            LeafKind::Owner => "Owner",
            LeafKind::Description => "Description",
            LeafKind::Favorites => "Favorite points",
            LeafKind::Distance => "Distance",
            LeafKind::Hidden => "Hidden date",
            LeafKind::Status => "Status",
        }
    }

    /// Compares two kinds the way a collator compares their display names:
    /// case and punctuation are ignored first and only break ties.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        collation_key(self.display_name())
            .cmp(&collation_key(other.display_name()))
            .then_with(|| self.display_name().cmp(other.display_name()))
    }

    /// Returns every kind sorted for display.
    pub fn sorted_for_display() -> Vec<LeafKind> {
        let mut kinds = Self::ALL.to_vec();
        kinds.sort();
        kinds
    }
}

impl PartialOrd for LeafKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LeafKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_cmp(other)
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Primary collation key: lower-cased alphanumerics only.
fn collation_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
