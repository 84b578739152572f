//! # Courier Lookup
//!
//! Resolves the courier stored on a claim to a directory entry. Historical
//! claims carry inconsistent identity data, so lookup walks a fixed chain
//! and stops at the first hit:
//!
//! | Tier | Matcher | Rule |
//! |------|---------|------|
//! | 1 | `ExactId` | directory id == claim courier id |
//! | 2 | `ExactName` | names equal, ignoring case and surrounding space |
//! | 3 | `FuzzyName` | directory name contains the claim name, ignoring case |
//! | - | - | no entry |
//!
//! Within a tier the first directory entry wins.

use crate::ports::CourierContact;
use shared_types::CourierId;

/// What the claim says about its courier.
#[derive(Debug, Clone, Copy)]
pub struct CourierQuery<'a> {
    pub id: Option<&'a CourierId>,
    pub name: Option<&'a str>,
}

/// One lookup tier.
pub trait CourierMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, query: &CourierQuery<'_>, candidate: &CourierContact) -> bool;
}

fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct ExactId;

impl CourierMatcher for ExactId {
    fn name(&self) -> &'static str {
        "exact_id"
    }

    fn matches(&self, query: &CourierQuery<'_>, candidate: &CourierContact) -> bool {
        query.id.is_some_and(|id| *id == candidate.id)
    }
}

pub struct ExactName;

impl CourierMatcher for ExactName {
    fn name(&self) -> &'static str {
        "exact_name"
    }

    fn matches(&self, query: &CourierQuery<'_>, candidate: &CourierContact) -> bool {
        match query.name.map(normalized) {
            Some(name) if !name.is_empty() => name == normalized(&candidate.name),
            _ => false,
        }
    }
}

pub struct FuzzyName;

impl CourierMatcher for FuzzyName {
    fn name(&self) -> &'static str {
        "fuzzy_name"
    }

    fn matches(&self, query: &CourierQuery<'_>, candidate: &CourierContact) -> bool {
        match query.name.map(normalized) {
            Some(name) if !name.is_empty() => normalized(&candidate.name).contains(&name),
            _ => false,
        }
    }
}

/// Ordered matcher chain.
pub struct CourierLookup {
    tiers: Vec<Box<dyn CourierMatcher>>,
}

impl CourierLookup {
    /// Exact id, then exact name, then substring.
    pub fn standard() -> Self {
        Self {
            tiers: vec![Box::new(ExactId), Box::new(ExactName), Box::new(FuzzyName)],
        }
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// First candidate matched by the earliest tier.
    pub fn resolve<'c>(
        &self,
        id: Option<&CourierId>,
        name: Option<&str>,
        roster: &'c [CourierContact],
    ) -> Option<&'c CourierContact> {
        let query = CourierQuery { id, name };
        self.tiers.iter().find_map(|tier| {
            roster
                .iter()
                .find(|candidate| tier.matches(&query, candidate))
        })
    }
}

impl Default for CourierLookup {
    fn default() -> Self {
        Self::standard()
    }
}
