//! Name resolution against the registry.
//!
//! Tiered matching, first hit wins:
//!   exact name → exact alias → name ⊇ query → query ⊇ name → query ⊇ alias
//!
//! Tiers are tried in order; inside a tier entries are tried in registry
//! order. There is no scoring.

use super::types::LocationEntry;
use serde::Serialize;
use std::fmt;

/// One rule of the resolution ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactName,
    ExactAlias,
    NameContainsQuery,
    QueryContainsName,
    QueryContainsAlias,
}

impl MatchTier {
    /// Every tier, highest priority first.
    pub const LADDER: [MatchTier; 5] = [
        MatchTier::ExactName,
        MatchTier::ExactAlias,
        MatchTier::NameContainsQuery,
        MatchTier::QueryContainsName,
        MatchTier::QueryContainsAlias,
    ];

    /// Does `entry` satisfy this tier for an already lower-cased query?
    fn matches(self, query: &str, entry: &LocationEntry) -> bool {
        let alias = || entry.match_name.as_deref().map(str::to_lowercase);
        match self {
            Self::ExactName => entry.name.to_lowercase() == query,
            Self::ExactAlias => alias().is_some_and(|a| a == query),
            Self::NameContainsQuery => entry.name.to_lowercase().contains(query),
            Self::QueryContainsName => query.contains(&entry.name.to_lowercase()),
            Self::QueryContainsAlias => alias().is_some_and(|a| query.contains(&a)),
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ExactName => "exact name",
            Self::ExactAlias => "exact alias",
            Self::NameContainsQuery => "name contains query",
            Self::QueryContainsName => "query contains name",
            Self::QueryContainsAlias => "query contains alias",
        };
        f.write_str(s)
    }
}

/// A successful resolution: the entry and the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution<'a> {
    pub entry: &'a LocationEntry,
    pub tier: MatchTier,
}

/// Resolve a free-text restaurant name to a registry entry.
///
/// Returns `None` for blank queries and for names the registry does not know.
/// No match is a normal outcome: callers fall back to an external map search.
pub fn resolve<'a>(query: &str, entries: &'a [LocationEntry]) -> Option<Resolution<'a>> {
    let q = normalize(query)?;

    MatchTier::LADDER.iter().find_map(|&tier| {
        entries
            .iter()
            .find(|e| tier.matches(&q, e))
            .map(|entry| Resolution { entry, tier })
    })
}

/// Search-as-you-type: every entry whose display name contains the query,
/// case-insensitively, in registry order. Aliases are not consulted.
pub fn filter_by_name<'a>(query: &str, entries: &'a [LocationEntry]) -> Vec<&'a LocationEntry> {
    let Some(q) = normalize(query) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&q))
        .collect()
}

/// Trim and lower-case; blank queries become `None`.
fn normalize(query: &str) -> Option<String> {
    let q = query.trim();
    if q.is_empty() {
        None
    } else {
        Some(q.to_lowercase())
    }
}
