//! Filtered fact queries.
//!
//! [`FactFilter`] is the simple form: up to four independent criteria that
//! must all hold. [`QueryOptions`] is the richer form used by query layers:
//! criteria within one dimension OR together, dimensions AND together, and
//! the matches are paginated after every filter (including the property
//! filter) has been applied.

use super::inner::StoreInner;
use crate::model::{Fact, FactKind, RelationKind};
use serde::{Deserialize, Serialize};

/// Page size used when `limit` is 0.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Largest page size a query may request.
pub const MAX_QUERY_LIMIT: usize = 500;

/// Simple conjunctive filter. `None` fields are not constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactFilter {
    /// Exact kind
    pub kind: Option<FactKind>,
    /// Exact file path
    pub file: Option<String>,
    /// Substring of the name
    pub name: Option<String>,
    /// At least one relation of this kind
    pub rel_kind: Option<RelationKind>,
}

impl FactFilter {
    /// Whether `fact` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, fact: &Fact) -> bool {
        self.kind.as_ref().is_none_or(|k| &fact.kind == k)
            && self.file.as_ref().is_none_or(|f| &fact.file == f)
            && self.name.as_ref().is_none_or(|n| fact.name.contains(n.as_str()))
            && self.rel_kind.as_ref().is_none_or(|r| fact.has_relation(r))
    }
}

/// Multi-dimension query with pagination.
///
/// Empty strings and empty lists leave their dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Exact kind
    pub kind: Option<FactKind>,
    /// Any of these kinds
    pub kinds: Vec<FactKind>,
    /// Exact file path
    pub file: Option<String>,
    /// Any of these file paths
    pub files: Vec<String>,
    /// File path prefix
    pub file_prefix: Option<String>,
    /// Substring of the name
    pub name: Option<String>,
    /// Any of these exact names
    pub names: Vec<String>,
    /// Exact repository label
    pub repo: Option<String>,
    /// At least one relation of this kind
    pub rel_kind: Option<RelationKind>,
    /// Property that must be present
    pub prop_key: Option<String>,
    /// Required string form of `prop_key`'s value
    pub prop_value: Option<String>,
    /// Matches to skip
    pub offset: usize,
    /// Page size; 0 means [`DEFAULT_QUERY_LIMIT`], capped at [`MAX_QUERY_LIMIT`]
    pub limit: usize,
}

fn set(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl QueryOptions {
    /// The page size this query will actually use.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_QUERY_LIMIT,
            n => n.min(MAX_QUERY_LIMIT),
        }
    }

    fn matches_kind(&self, fact: &Fact) -> bool {
        if self.kind.is_none() && self.kinds.is_empty() {
            return true;
        }
        self.kind.as_ref() == Some(&fact.kind) || self.kinds.contains(&fact.kind)
    }

    fn matches_file(&self, fact: &Fact) -> bool {
        let file = set(self.file.as_ref());
        let prefix = set(self.file_prefix.as_ref());
        if file.is_none() && prefix.is_none() && self.files.is_empty() {
            return true;
        }
        file == Some(fact.file.as_str())
            || self.files.iter().any(|f| f == &fact.file)
            || prefix.is_some_and(|p| fact.file.starts_with(p))
    }

    fn matches_name(&self, fact: &Fact) -> bool {
        let name = set(self.name.as_ref());
        if name.is_none() && self.names.is_empty() {
            return true;
        }
        name.is_some_and(|n| fact.name.contains(n)) || self.names.iter().any(|n| n == &fact.name)
    }

    fn matches_prop(&self, fact: &Fact) -> bool {
        let Some(key) = set(self.prop_key.as_ref()) else {
            return true;
        };
        match (fact.prop_str(key), self.prop_value.as_deref()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }

    /// Whether `fact` satisfies every dimension of this query.
    #[must_use]
    pub fn matches(&self, fact: &Fact) -> bool {
        self.matches_kind(fact)
            && self.matches_file(fact)
            && self.matches_name(fact)
            && set(self.repo.as_ref()).is_none_or(|r| fact.repo == r)
            && self.rel_kind.as_ref().is_none_or(|r| fact.has_relation(r))
            && self.matches_prop(fact)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPage {
    /// Matching facts on this page, in insertion order
    pub facts: Vec<Fact>,
    /// Number of matches before pagination
    pub total: usize,
    /// Offset this page starts at
    pub offset: usize,
    /// Page size that was applied
    pub limit: usize,
}

impl QueryPage {
    /// Whether matches exist beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.facts.len()) < self.total
    }
}

impl StoreInner {
    pub(super) fn query(&self, filter: &FactFilter) -> Vec<Fact> {
        // Narrow by the most selective exact index available.
        let candidates: Box<dyn Iterator<Item = &Fact> + '_> =
            if let Some(kind) = filter.kind.as_ref() {
                Box::new(self.indexed(self.by_kind.get(kind)))
            } else if let Some(file) = filter.file.as_ref() {
                Box::new(self.indexed(self.by_file.get(file)))
            } else {
                Box::new(self.facts.iter())
            };

        candidates
            .filter(|fact| filter.matches(fact))
            .cloned()
            .collect()
    }

    pub(super) fn query_advanced(&self, options: &QueryOptions) -> QueryPage {
        let limit = options.effective_limit();
        let matches: Vec<usize> = self
            .facts
            .iter()
            .enumerate()
            .filter(|(_, fact)| options.matches(fact))
            .map(|(position, _)| position)
            .collect();

        let page: Vec<usize> = matches
            .iter()
            .copied()
            .skip(options.offset)
            .take(limit)
            .collect();

        QueryPage {
            facts: self.collect(&page),
            total: matches.len(),
            offset: options.offset,
            limit,
        }
    }

    fn indexed<'a>(&'a self, positions: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a Fact> {
        positions
            .into_iter()
            .flatten()
            .filter_map(|&i| self.facts.get(i))
    }
}
