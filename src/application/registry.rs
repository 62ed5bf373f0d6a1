//! Status-code keyed message overrides
//!
//! The registry is first-write-wins: once a status code holds an entry it is
//! never replaced. It is handed explicitly to every classification call. A
//! registry shared between concurrent requests is an opt-in decision of the
//! caller; `add` is an atomic check-then-insert so the first writer still wins
//! under parallel access.

use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A registered override for one status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl OverrideEntry {
    /// The `{message, details?}` form attached to fallback envelopes
    pub fn to_details(&self) -> Value {
        let mut map = Map::new();
        map.insert("message".to_string(), json!(self.message));
        if let Some(details) = &self.details {
            map.insert("details".to_string(), details.clone());
        }
        Value::Object(map)
    }
}

/// Seed record used to create a registry, typically from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSeed {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

impl OverrideSeed {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn is_well_formed(&self) -> bool {
        self.status != 0 && !self.message.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverrideRegistry {
    entries: DashMap<u16, OverrideEntry>,
}

impl OverrideRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from seed records.
    ///
    /// Seeds with a zero status or an empty message are dropped silently. A
    /// status code seeded twice keeps its first well-formed message.
    pub fn create<I>(seed: I) -> Self
    where
        I: IntoIterator<Item = OverrideSeed>,
    {
        let registry = Self::new();
        for item in seed.into_iter().filter(OverrideSeed::is_well_formed) {
            registry.add(item.status, item.message, None);
        }
        registry
    }

    pub fn get(&self, status_code: u16) -> Option<OverrideEntry> {
        self.entries.get(&status_code).map(|entry| entry.value().clone())
    }

    /// Insert an override unless the status code already has one.
    ///
    /// Returns `true` when this call inserted the entry.
    pub fn add(&self, status_code: u16, message: impl Into<String>, details: Option<Value>) -> bool {
        match self.entries.entry(status_code) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(OverrideEntry {
                    status_code,
                    message: message.into(),
                    details,
                });
                true
            }
        }
    }

    pub fn contains(&self, status_code: u16) -> bool {
        self.entries.contains_key(&status_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<OverrideSeed> for OverrideRegistry {
    fn from_iter<T: IntoIterator<Item = OverrideSeed>>(iter: T) -> Self {
        Self::create(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_add_is_first_write_wins() {
        let registry = OverrideRegistry::new();

        assert!(registry.add(409, "A", None));
        assert!(!registry.add(409, "B", Some(json!({"ignored": true}))));

        let entry = registry.get(409).unwrap();
        assert_eq!(entry.message, "A");
        assert!(entry.details.is_none());
    }

    #[test]
    fn test_create_drops_malformed_seeds() {
        let registry = OverrideRegistry::create(vec![
            OverrideSeed::new(0, "x"),
            OverrideSeed::new(409, ""),
            OverrideSeed::new(409, "ok"),
        ]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(409).unwrap().message, "ok");
    }

    #[test]
    fn test_create_keeps_first_duplicate() {
        let registry: OverrideRegistry = vec![
            OverrideSeed::new(404, "first"),
            OverrideSeed::new(404, "second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.get(404).unwrap().message, "first");
    }

    #[test]
    fn test_get_missing() {
        let registry = OverrideRegistry::create(Vec::new());
        assert!(registry.is_empty());
        assert!(registry.get(500).is_none());
        assert!(!registry.contains(500));
    }

    #[test]
    fn test_add_keeps_details() {
        let registry = OverrideRegistry::new();
        registry.add(400, "Custom", Some(json!({"field": "name"})));

        let entry = registry.get(400).unwrap();
        assert_eq!(entry.details, Some(json!({"field": "name"})));
        assert_eq!(
            entry.to_details(),
            json!({"message": "Custom", "details": {"field": "name"}})
        );
    }

    #[test]
    fn test_to_details_without_details() {
        let registry = OverrideRegistry::new();
        registry.add(500, "Error: boom", None);

        assert_eq!(
            registry.get(500).unwrap().to_details(),
            json!({"message": "Error: boom"})
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let template = OverrideRegistry::create(vec![OverrideSeed::new(404, "Missing")]);
        let per_request = template.clone();

        per_request.add(500, "Error: only here", None);

        assert!(per_request.contains(500));
        assert!(!template.contains(500));
        assert_eq!(per_request.get(404).unwrap().message, "Missing");
    }

    #[test]
    fn test_concurrent_add_single_winner() {
        let registry = Arc::new(OverrideRegistry::new());

        let winners: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let registry = Arc::clone(&registry);
                    scope.spawn(move || {
                        let message = format!("writer-{i}");
                        registry.add(409, message.clone(), None).then_some(message)
                    })
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|h| h.join().unwrap())
                .collect()
        });

        assert_eq!(winners.len(), 1);
        assert_eq!(registry.get(409).unwrap().message, winners[0]);

        let distinct: HashSet<_> = (0..16).map(|_| registry.get(409).unwrap().message).collect();
        assert_eq!(distinct.len(), 1);
    }
}
