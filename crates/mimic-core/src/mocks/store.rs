//! Registration store keyed by method and normalized URI.
//!
//! The set of registrations lives behind an `Arc`, so taking a snapshot for
//! a scope or a clone is a pointer copy. Mutation goes through
//! `Arc::make_mut`, which copies the map only while a snapshot still shares it.

use crate::types::descriptor::ResponseDescriptor;
use indexmap::IndexMap;
use std::sync::Arc;
use url::Url;

/// Lookup identity of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    method: String,
    uri: String,
}

impl MatchKey {
    /// Build a key; the URI is normalized and, unless `case_sensitive`, lowercased.
    pub fn new(method: &str, uri: &str, case_sensitive: bool) -> Self {
        Self {
            method: method.to_string(),
            uri: normalize_uri(uri, case_sensitive),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Canonical form of a URI for key comparison.
///
/// Absolute URLs with a host are re-serialized (lowercase scheme and host,
/// default port dropped, empty path as `/`). Anything else is only trimmed.
pub fn normalize_uri(uri: &str, case_sensitive: bool) -> String {
    let trimmed = uri.trim();
    let canonical = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url.to_string(),
        _ => trimmed.to_string(),
    };

    if case_sensitive {
        canonical
    } else {
        canonical.to_lowercase()
    }
}

/// One registered override, with method and URI as supplied.
#[derive(Debug, Clone)]
pub struct Registration {
    pub method: String,
    pub uri: String,
    pub descriptor: ResponseDescriptor,
}

/// Insertion-ordered map of registrations with copy-on-write snapshots.
#[derive(Debug, Clone, Default)]
pub struct RegistrationSet {
    entries: Arc<IndexMap<MatchKey, Registration>>,
}

impl RegistrationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    ///
    /// Returns `true` when an existing registration was overwritten.
    pub fn insert(&mut self, key: MatchKey, registration: Registration) -> bool {
        Arc::make_mut(&mut self.entries)
            .insert(key, registration)
            .is_some()
    }

    pub fn remove(&mut self, key: &MatchKey) -> Option<Registration> {
        if !self.entries.contains_key(key) {
            return None;
        }
        Arc::make_mut(&mut self.entries).shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries = Arc::default();
    }

    pub fn get(&self, key: &MatchKey) -> Option<&Registration> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.values()
    }

    /// Whether both sets share the same underlying storage.
    pub fn shares_storage_with(&self, other: &RegistrationSet) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

/// The unit of state that is cloned and scoped: registrations plus flags.
#[derive(Debug, Clone, Default)]
pub struct OptionsState {
    pub registrations: RegistrationSet,
    pub case_sensitive: bool,
    pub throw_on_missing_registration: bool,
}

impl OptionsState {
    pub fn key(&self, method: &str, uri: &str) -> MatchKey {
        MatchKey::new(method, uri, self.case_sensitive)
    }
}
