use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{RemixError, Result};
use crate::record::{ActionRecord, Table};

/// Labels that mean "no filter", compared after the annotation is stripped.
const ALL_SENTINELS: [&str; 2] = ["全部", "*"];

/// A difficulty label with any trailing `(...)` / `（...）` annotation removed.
///
/// Applied to both filter labels and record values, so `"Low (低成本)"`
/// selects `Low` rows and a multi-word tier such as `"Very Low"` selects itself.
fn tier_key(label: &str) -> &str {
    let label = label.trim();
    match label.find(['(', '（']) {
        Some(cut) if cut > 0 => label[..cut].trim_end(),
        _ => label,
    }
}

fn is_all_sentinel(key: &str) -> bool {
    key.is_empty() || key.eq_ignore_ascii_case("all") || ALL_SENTINELS.contains(&key)
}

// ---------------------------------------------------------------------------
// DifficultyFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Tier(String),
}

impl DifficultyFilter {
    /// Parse a UI label such as `"Low (低成本)"` into the tier it names.
    pub fn parse(label: &str) -> Self {
        let key = tier_key(label);
        if is_all_sentinel(key) {
            DifficultyFilter::All
        } else {
            DifficultyFilter::Tier(key.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DifficultyFilter::All => "All",
            DifficultyFilter::Tier(tier) => tier,
        }
    }

    pub fn matches(&self, record: &ActionRecord) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Tier(tier) => tier_key(&record.difficulty) == tier.as_str(),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(DifficultyFilter::parse(s))
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DifficultyFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Rows that pass `filter`, in table order.
pub fn filter_records<'a>(table: &'a Table, filter: &DifficultyFilter) -> Vec<&'a ActionRecord> {
    table.iter().filter(|r| filter.matches(r)).collect()
}

/// Draw one row uniformly at random from the rows that pass `filter`.
pub fn select<R: Rng + ?Sized>(
    table: &Table,
    filter: &DifficultyFilter,
    rng: &mut R,
) -> Result<ActionRecord> {
    if table.is_empty() {
        return Err(RemixError::EmptyStore);
    }
    let candidates = filter_records(table, filter);
    let picked = candidates
        .choose(rng)
        .ok_or_else(|| RemixError::NoMatchingRecords {
            tier: filter.label().to_string(),
        })?;
    tracing::debug!(
        id = %picked.id,
        candidates = candidates.len(),
        filter = %filter,
        "selected action record"
    );
    Ok((*picked).clone())
}

/// Distinct tiers in first-seen order, each one a label `parse` maps back to
/// a filter that selects its rows. Values that read as "all" are left out.
pub fn tiers(table: &Table) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in table {
        let key = tier_key(&record.difficulty);
        if !is_all_sentinel(key) && !seen.iter().any(|t| t == key) {
            seen.push(key.to_string());
        }
    }
    seen
}
