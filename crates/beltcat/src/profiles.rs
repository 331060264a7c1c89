//! Profile files.
//!
//! A profile file is JSON with a `profiles` array; each entry follows
//! [`Profile`]'s field names and any field left out takes its default:
//!
//! ```json
//! {
//!   "profiles": [
//!     { "id": "C", "start_marker": "Profile C", "end_marker": "Profile D",
//!       "min_speed": 500, "pages": "24" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use beltcat_core::profile::builtins;
use beltcat_core::{CatalogError, Profile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SourceError;

/// An ordered set of validated profiles with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
}

impl ProfileSet {
    /// Build a set, validating every profile and rejecting repeated ids.
    pub fn new(profiles: Vec<Profile>) -> Result<Self, SourceError> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            profile.validate()?;
            if !seen.insert(profile.id.as_str()) {
                return Err(SourceError::ProfileFile(format!(
                    "duplicate profile id '{}'",
                    profile.id
                )));
            }
        }
        Ok(Self { profiles })
    }

    /// The profiles shipped with the library.
    pub fn builtin() -> Self {
        Self {
            profiles: builtins(),
        }
    }

    /// Parse and validate a JSON profile document.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let raw: ProfileSet = serde_json::from_str(json)?;
        Self::new(raw.profiles)
    }

    /// Read and validate a JSON profile file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json(&json)?;
        debug!(path = %path.display(), profiles = set.len(), "loaded profile file");
        Ok(set)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SourceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add built-in profiles whose ids this set does not define.
    pub fn with_builtins(mut self) -> Self {
        for profile in builtins() {
            if self.find(&profile.id).is_none() {
                self.profiles.push(profile);
            }
        }
        self
    }

    /// The profile with `id`, if present.
    pub fn find(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The profile with `id`.
    pub fn get(&self, id: &str) -> Result<&Profile, CatalogError> {
        self.find(id)
            .ok_or_else(|| CatalogError::UnknownProfile(id.to_string()))
    }

    /// Profile ids in file order.
    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }

    /// All profiles in file order.
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns true if the set has no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
