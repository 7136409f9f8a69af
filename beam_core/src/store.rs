//! # Scenario Store
//!
//! Named configurations and the "last used" record, kept behind the narrow
//! [`KeyValueStore`] interface so the backend is injected rather than global.
//!
//! - [`MemoryStore`] - in-process map, for tests and embedding
//! - [`FileStore`](crate::file_io::FileStore) - a single JSON file on disk
//!
//! Scenario names compare case-insensitively. Saving under an existing name
//! replaces the stored configuration and keeps the scenario's id.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::configuration::BeamConfiguration;
//! use beam_core::store::{MemoryStore, ScenarioStore};
//!
//! let mut store = ScenarioStore::new(MemoryStore::default());
//! store.save("Roof Beam", &BeamConfiguration::default())?;
//!
//! let loaded = store.load("roof beam")?;
//! assert_eq!(loaded, BeamConfiguration::default());
//! assert_eq!(store.list()?, vec!["Roof Beam".to_string()]);
//! # Ok::<(), beam_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configuration::BeamConfiguration;
use crate::errors::{CalcError, CalcResult};

/// Key prefix for named scenarios
pub const SCENARIO_PREFIX: &str = "scenario:";

/// Key of the last-used configuration
pub const LAST_USED_KEY: &str = "last_used";

/// String key/value persistence.
///
/// Values are JSON documents. Implementations report I/O problems as
/// [`CalcError`]s; a missing key is `Ok(None)`, not an error.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>>;

    fn set(&mut self, key: &str, value: String) -> CalcResult<()>;

    /// Keys starting with `prefix`, in ascending order
    fn list(&self, prefix: &str) -> CalcResult<Vec<String>>;

    /// Remove `key`; returns whether it existed
    fn delete(&mut self, key: &str) -> CalcResult<bool>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CalcResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn list(&self, prefix: &str) -> CalcResult<Vec<String>> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delete(&mut self, key: &str) -> CalcResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// A saved, named configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name as last saved
    pub name: String,
    /// Stable across overwrites
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub configuration: BeamConfiguration,
}

/// Scenario operations over any [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct ScenarioStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ScenarioStore<S> {
    pub fn new(backend: S) -> Self {
        ScenarioStore { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Save (or overwrite) a scenario
    pub fn save(&mut self, name: &str, configuration: &BeamConfiguration) -> CalcResult<Scenario> {
        let key = scenario_key(name)?;
        let id = match self.read_scenario(&key) {
            Ok(Some(existing)) => existing.id,
            _ => Uuid::new_v4(),
        };

        let scenario = Scenario {
            name: name.trim().to_string(),
            id,
            saved_at: Utc::now(),
            configuration: configuration.clone(),
        };
        self.backend.set(&key, serde_json::to_string(&scenario)?)?;
        tracing::info!(name = %scenario.name, id = %scenario.id, "Saved scenario");
        Ok(scenario)
    }

    /// Full scenario record for `name`
    pub fn get(&self, name: &str) -> CalcResult<Scenario> {
        let key = scenario_key(name)?;
        self.read_scenario(&key)?
            .ok_or_else(|| CalcError::scenario_not_found(name.trim()))
    }

    /// Configuration saved under `name`
    pub fn load(&self, name: &str) -> CalcResult<BeamConfiguration> {
        Ok(self.get(name)?.configuration)
    }

    /// Display names of all scenarios, sorted case-insensitively.
    ///
    /// Entries that no longer parse are skipped.
    pub fn list(&self) -> CalcResult<Vec<String>> {
        let mut names = Vec::new();
        for key in self.backend.list(SCENARIO_PREFIX)? {
            match self.read_scenario(&key) {
                Ok(Some(scenario)) => names.push(scenario.name),
                Ok(None) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "Skipping unreadable scenario"),
            }
        }
        names.sort_by_key(|n| n.to_lowercase());
        Ok(names)
    }

    pub fn delete(&mut self, name: &str) -> CalcResult<()> {
        let key = scenario_key(name)?;
        if self.backend.delete(&key)? {
            tracing::info!(name = name.trim(), "Deleted scenario");
            Ok(())
        } else {
            Err(CalcError::scenario_not_found(name.trim()))
        }
    }

    /// Last-used configuration, or `fallback` if none is stored or it is
    /// unreadable
    pub fn last_used(&self, fallback: &BeamConfiguration) -> BeamConfiguration {
        let raw = match self.backend.get(LAST_USED_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read last-used configuration");
                return fallback.clone();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Corrupted last-used configuration, using default");
                fallback.clone()
            }
        }
    }

    pub fn set_last_used(&mut self, configuration: &BeamConfiguration) -> CalcResult<()> {
        self.backend
            .set(LAST_USED_KEY, serde_json::to_string(configuration)?)
    }

    fn read_scenario(&self, key: &str) -> CalcResult<Option<Scenario>> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

/// Storage key for a scenario name (trimmed, lowercased)
pub fn scenario_key(name: &str) -> CalcResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CalcError::invalid_input(
            "name",
            name,
            "Scenario name must not be empty",
        ));
    }
    Ok(format!("{}{}", SCENARIO_PREFIX, trimmed.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::SupportType;

    fn cantilever() -> BeamConfiguration {
        BeamConfiguration {
            support_type: SupportType::Cantilever,
            length: 2.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_save_load_exact() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        let c = cantilever();
        store.save("Balcony", &c).unwrap();
        assert_eq!(store.load("Balcony").unwrap(), c);
    }

    #[test]
    fn test_names_case_insensitive() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        store.save("Balcony", &BeamConfiguration::default()).unwrap();
        assert_eq!(store.load("BALCONY").unwrap(), BeamConfiguration::default());
        assert_eq!(store.load("  balcony ").unwrap(), BeamConfiguration::default());
    }

    #[test]
    fn test_overwrite_keeps_id() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        let first = store.save("Balcony", &BeamConfiguration::default()).unwrap();
        let second = store.save("BALCONY", &cantilever()).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.list().unwrap(), vec!["BALCONY".to_string()]);
        assert_eq!(store.load("balcony").unwrap(), cantilever());
    }

    #[test]
    fn test_list_sorted() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        for name in ["zeta", "Alpha", "beta"] {
            store.save(name, &BeamConfiguration::default()).unwrap();
        }
        assert_eq!(store.list().unwrap(), vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_delete_and_missing() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        store.save("Balcony", &BeamConfiguration::default()).unwrap();
        store.delete("balcony").unwrap();
        assert!(store.list().unwrap().is_empty());

        let err = store.load("Balcony").unwrap_err();
        assert_eq!(err.error_code(), "SCENARIO_NOT_FOUND");
        assert!(store.delete("Balcony").is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        let err = store.save("   ", &BeamConfiguration::default()).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_last_used_fallbacks() {
        let mut store = ScenarioStore::new(MemoryStore::default());
        let fallback = BeamConfiguration::default();
        assert_eq!(store.last_used(&fallback), fallback);

        store.set_last_used(&cantilever()).unwrap();
        assert_eq!(store.last_used(&fallback), cantilever());

        let mut backend = store.into_inner();
        backend.set(LAST_USED_KEY, "{ not json".to_string()).unwrap();
        let store = ScenarioStore::new(backend);
        assert_eq!(store.last_used(&fallback), fallback);
    }

    #[test]
    fn test_corrupt_scenario_skipped_in_list() {
        let mut backend = MemoryStore::default();
        backend.set("scenario:broken", "[]".to_string()).unwrap();
        let mut store = ScenarioStore::new(backend);
        store.save("Good", &BeamConfiguration::default()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["Good"]);
    }
}
