use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::User;

/// An in-memory view of the subscription graph, built from user records.
///
/// The graph is not a storage engine; it is an inspection structure. Load
/// users from the store, add them here, and use the query methods to derive
/// relationships or audit the bidirectional bookkeeping.
///
/// Users are indexed by `id`. Duplicate `id`s replace the earlier entry.
#[derive(Debug, Default)]
pub struct SubscriptionGraph {
    users: BTreeMap<String, User>,
}

/// Result of [`SubscriptionGraph::audit`]. Every list is sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphAudit {
    /// `(a, b)` pairs where `a` lists `b` but `b` does not list `a`.
    pub asymmetric_edges: Vec<(String, String)>,
    /// Users whose list contains their own id.
    pub self_edges: Vec<String>,
    /// `(a, b)` pairs where `a` lists `b` and no user `b` exists.
    pub dangling_edges: Vec<(String, String)>,
}

impl GraphAudit {
    /// `true` when no inconsistency was found.
    pub fn is_clean(&self) -> bool {
        self.asymmetric_edges.is_empty()
            && self.self_edges.is_empty()
            && self.dangling_edges.is_empty()
    }
}

impl SubscriptionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an iterator of users.
    pub fn from_users(iter: impl IntoIterator<Item = User>) -> Self {
        let mut g = Self::new();
        for u in iter {
            g.add(u);
        }
        g
    }

    /// Insert a user. If a user with the same `id` already exists, it is replaced.
    pub fn add(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Total number of list entries across all users. A fully consistent
    /// graph records every subscription twice.
    pub fn entry_count(&self) -> usize {
        self.users
            .values()
            .map(|u| u.subscribed_to_user_ids.len())
            .sum()
    }

    /// The users whose ids appear in `id`'s list (outgoing entries).
    ///
    /// Ids with no matching user in this graph are silently omitted.
    pub fn listed_by(&self, id: &str) -> Vec<&User> {
        let Some(user) = self.users.get(id) else {
            return vec![];
        };
        user.subscribed_to_user_ids
            .iter()
            .filter_map(|s| self.users.get(s))
            .collect()
    }

    /// The users whose lists contain `id` (incoming entries), in id order.
    ///
    /// These are exactly the records a cascade delete of `id` must rewrite.
    pub fn listing(&self, id: &str) -> Vec<&User> {
        self.users
            .values()
            .filter(|u| u.id != id && u.is_subscribed_to(id))
            .collect()
    }

    /// Check the bidirectional bookkeeping of every edge.
    pub fn audit(&self) -> GraphAudit {
        let mut audit = GraphAudit::default();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for user in self.users.values() {
            for target in &user.subscribed_to_user_ids {
                if !seen.insert((user.id.as_str(), target.as_str())) {
                    continue;
                }
                if *target == user.id {
                    audit.self_edges.push(user.id.clone());
                    continue;
                }
                match self.users.get(target) {
                    None => audit
                        .dangling_edges
                        .push((user.id.clone(), target.clone())),
                    Some(other) if !other.is_subscribed_to(&user.id) => audit
                        .asymmetric_edges
                        .push((user.id.clone(), target.clone())),
                    Some(_) => {}
                }
            }
        }

        audit.asymmetric_edges.sort();
        audit.self_edges.sort();
        audit.dangling_edges.sort();
        audit
    }
}

// --- tests -------------------------------------------------------------------
