use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::profile::Profile;

/// In-memory, domain-keyed view of the final artifact — the state the
/// read-only serving layer sits on. Loading is explicit: construct with
/// `load`, refresh with `reload`.
pub struct ProfileStore {
    path: PathBuf,
    by_domain: HashMap<String, Profile>,
}

impl ProfileStore {
    /// Load the merged artifact wholesale into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let by_domain = read_artifact(&path)?;
        info!("loaded {} profiles from {}", by_domain.len(), path.display());
        Ok(Self { path, by_domain })
    }

    /// Re-read the artifact in place. The hook the serving layer calls when
    /// a new merge lands.
    pub fn reload(&mut self) -> Result<()> {
        self.by_domain = read_artifact(&self.path)?;
        Ok(())
    }

    /// Lookup by domain. The presented key is normalized first; a miss is
    /// the 404-equivalent and returns `None`.
    pub fn get(&self, raw_key: &str) -> Option<&Profile> {
        self.by_domain.get(&normalize_domain(raw_key))
    }

    pub fn len(&self) -> usize {
        self.by_domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_domain.is_empty()
    }
}

fn read_artifact(path: &Path) -> Result<HashMap<String, Profile>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact {}", path.display()))?;
    let values: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let mut by_domain = HashMap::with_capacity(values.len());
    for value in &values {
        let profile = Profile::from_value(value);
        if profile.domain.is_empty() {
            continue;
        }
        // First occurrence wins, mirroring the merger.
        by_domain.entry(profile.domain.clone()).or_insert(profile);
    }
    Ok(by_domain)
}

/// Strip scheme and leading www. so frontend-supplied keys match artifact
/// domains.
pub fn normalize_domain(raw: &str) -> String {
    let key = raw.trim();
    let key = key
        .strip_prefix("https://")
        .or_else(|| key.strip_prefix("http://"))
        .unwrap_or(key);
    let key = key.strip_prefix("www.").unwrap_or(key);
    key.trim_end_matches('/').to_string()
}

// ── Tests ──
