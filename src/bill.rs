//! Bill data model
//!
//! Records pending summarization, the generated summary payload, the political
//! orientation axis alphabet, and the fixed category taxonomy.

use crate::ordering::ordering_key;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of categories persisted per bill.
pub const MAX_CATEGORIES: usize = 2;

/// Fixed category taxonomy the generator must choose from.
pub const CATEGORY_TAXONOMY: [&str; 16] = [
    "일자리", "재정", "금융", "교육", "보건", "복지", "주거", "교통", "환경", "에너지", "디지털",
    "안전", "청년", "여성", "국방", "문화",
];

/// A bill pending summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    /// Primary key in the shared store
    pub bill_id: String,
    /// Heterogeneous bill number used for ordering
    pub bill_no: String,
    pub title: String,
    /// Raw source summary of the bill
    pub body: String,
    pub proposal_date: NaiveDate,
}

impl BillRecord {
    /// True when there is nothing to summarize.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }
}

/// Lightweight selection key for an eligible record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateKey {
    pub bill_id: String,
    pub bill_no: String,
    pub proposal_date: NaiveDate,
}

impl CandidateKey {
    pub fn ordering_key(&self) -> i64 {
        ordering_key(&self.bill_no)
    }
}

/// Political orientation axis. Each axis belongs to an exclusive pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "P")]
    Public,
    #[serde(rename = "M")]
    Market,
    #[serde(rename = "U")]
    Universal,
    #[serde(rename = "T")]
    Targeted,
    #[serde(rename = "N")]
    Need,
    #[serde(rename = "S")]
    Merit,
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "R")]
    Stable,
}

impl Axis {
    pub const ALL: [Axis; 8] = [
        Axis::Public,
        Axis::Market,
        Axis::Universal,
        Axis::Targeted,
        Axis::Need,
        Axis::Merit,
        Axis::Open,
        Axis::Stable,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Axis::Public => "P",
            Axis::Market => "M",
            Axis::Universal => "U",
            Axis::Targeted => "T",
            Axis::Need => "N",
            Axis::Merit => "S",
            Axis::Open => "O",
            Axis::Stable => "R",
        }
    }

    /// Parse a single-letter axis symbol. Case-sensitive.
    pub fn from_symbol(symbol: &str) -> Option<Axis> {
        Axis::ALL.into_iter().find(|axis| axis.symbol() == symbol)
    }

    /// The other member of this axis's exclusive pair.
    pub fn opposite(self) -> Axis {
        match self {
            Axis::Public => Axis::Market,
            Axis::Market => Axis::Public,
            Axis::Universal => Axis::Targeted,
            Axis::Targeted => Axis::Universal,
            Axis::Need => Axis::Merit,
            Axis::Merit => Axis::Need,
            Axis::Open => Axis::Stable,
            Axis::Stable => Axis::Open,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Vote weights keyed by axis. Values are strictly positive.
pub type AxisWeights = BTreeMap<Axis, u32>;

/// Generated fields written back for one bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    pub headline: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub vote_for: AxisWeights,
    pub vote_against: AxisWeights,
}

pub fn is_known_category(category: &str) -> bool {
    CATEGORY_TAXONOMY.contains(&category)
}

/// Trim, drop entries outside the taxonomy, deduplicate, and cap at [`MAX_CATEGORIES`].
pub fn normalize_categories(categories: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_CATEGORIES);
    for category in categories {
        let category = category.trim();
        if !is_known_category(category) || out.iter().any(|c| c == category) {
            continue;
        }
        out.push(category.to_string());
        if out.len() == MAX_CATEGORIES {
            break;
        }
    }
    out
}
