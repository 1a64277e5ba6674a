//! Taxonomy model
//!
//! Categories, departments and organizers are admin-managed name lists.
//! They share one shape and one set of operations, so the kind travels as
//! a value rather than as three parallel APIs.

use serde::{Deserialize, Serialize};

use crate::utils::errors::{Result, UniEventError};

/// The three mutable name lists events draw their labels from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Category,
    Department,
    Organizer,
}

impl TaxonomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Department => "department",
            TaxonomyKind::Organizer => "organizer",
        }
    }

    /// Table the kind is persisted in
    pub fn table(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "categories",
            TaxonomyKind::Department => "departments",
            TaxonomyKind::Organizer => "organizers",
        }
    }
}

impl std::fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaxonomyKind {
    type Err = UniEventError;

    fn from_str(s: &str) -> Result<Self> {
        // Route paths use the plural table names; accept the singular too.
        match s {
            "category" | "categories" => Ok(TaxonomyKind::Category),
            "department" | "departments" => Ok(TaxonomyKind::Department),
            "organizer" | "organizers" => Ok(TaxonomyKind::Organizer),
            other => Err(UniEventError::InvalidInput(format!(
                "Unknown taxonomy kind: {other}"
            ))),
        }
    }
}

/// All three name lists as one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomySet {
    pub categories: Vec<String>,
    pub departments: Vec<String>,
    pub organizers: Vec<String>,
}

impl TaxonomySet {
    /// The lists a fresh deployment starts with, matching the seed
    /// migration. The in-memory store uses these directly.
    pub fn seed() -> Self {
        Self {
            categories: [
                "Workshop",
                "Seminar",
                "Sports",
                "Cultural",
                "Technical",
                "Career",
                "Social",
                "Academic",
                "Competition",
            ]
            .map(String::from)
            .to_vec(),
            departments: [
                "Department of Computer Science",
                "Department of Textile Engineering",
                "FSD Business School",
                "Department of Fashion Design",
                "Department of Applied Sciences",
            ]
            .map(String::from)
            .to_vec(),
            organizers: [
                "AI Society",
                "Software Engineering Society",
                "Computer Science Society",
                "DCS Sports Society",
                "Literary Society",
                "Dramatics Society",
                "Music Society",
                "Photography Society",
                "E-Sports Society",
                "Career Services",
                "Cultural Society",
            ]
            .map(String::from)
            .to_vec(),
        }
    }

    pub fn list(&self, kind: TaxonomyKind) -> &Vec<String> {
        match kind {
            TaxonomyKind::Category => &self.categories,
            TaxonomyKind::Department => &self.departments,
            TaxonomyKind::Organizer => &self.organizers,
        }
    }

    pub fn list_mut(&mut self, kind: TaxonomyKind) -> &mut Vec<String> {
        match kind {
            TaxonomyKind::Category => &mut self.categories,
            TaxonomyKind::Department => &mut self.departments,
            TaxonomyKind::Organizer => &mut self.organizers,
        }
    }

    pub fn contains(&self, kind: TaxonomyKind, name: &str) -> bool {
        self.list(kind).iter().any(|n| n == name)
    }
}

/// Badge color classes, one per seed category. Values added at runtime fall
/// back to a hash-picked palette entry so the mapping stays total without a
/// closed category enum.
const PALETTE: [&str; 9] = [
    "bg-blue-100 text-blue-800",
    "bg-purple-100 text-purple-800",
    "bg-green-100 text-green-800",
    "bg-pink-100 text-pink-800",
    "bg-indigo-100 text-indigo-800",
    "bg-amber-100 text-amber-800",
    "bg-rose-100 text-rose-800",
    "bg-teal-100 text-teal-800",
    "bg-orange-100 text-orange-800",
];

/// Deterministic badge color for a category name
pub fn category_color(name: &str) -> &'static str {
    match name {
        "Workshop" => PALETTE[0],
        "Seminar" => PALETTE[1],
        "Sports" => PALETTE[2],
        "Cultural" => PALETTE[3],
        "Technical" => PALETTE[4],
        "Career" => PALETTE[5],
        "Social" => PALETTE[6],
        "Academic" => PALETTE[7],
        "Competition" => PALETTE[8],
        other => PALETTE[(fnv1a(other) % PALETTE.len() as u64) as usize],
    }
}

/// FNV-1a, 64-bit
fn fnv1a(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
