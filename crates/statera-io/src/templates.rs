//! Named snapshots kept for reuse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SerResult, SerializationError};
use crate::snapshot::Snapshot;

/// Listing entry for a stored template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
    pub updated: DateTime<Utc>,
}

/// Storage for named snapshots; saving under an existing name overwrites it
pub trait TemplateStore {
    fn put(&mut self, name: &str, snapshot: &Snapshot) -> SerResult<()>;

    fn get(&self, name: &str) -> SerResult<Option<Snapshot>>;

    /// Stored templates ordered by name
    fn list(&self) -> SerResult<Vec<TemplateInfo>>;
}

/// File-safe form of a template name: lowercase letters and digits joined by `-`
pub fn slug(name: &str) -> SerResult<String> {
    let mut out = String::new();
    let mut pending_dash = false;
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        return Err(SerializationError::InvalidTemplateName {
            name: name.to_string(),
        });
    }
    Ok(out)
}

// ==================== Memory ====================

#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    entries: BTreeMap<String, StoredTemplate>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn put(&mut self, name: &str, snapshot: &Snapshot) -> SerResult<()> {
        let key = slug(name)?;
        self.entries.insert(key, StoredTemplate::new(name, snapshot));
        Ok(())
    }

    fn get(&self, name: &str) -> SerResult<Option<Snapshot>> {
        let key = slug(name)?;
        Ok(self.entries.get(&key).map(|t| t.snapshot.clone()))
    }

    fn list(&self) -> SerResult<Vec<TemplateInfo>> {
        let mut infos: Vec<TemplateInfo> = self.entries.values().map(StoredTemplate::info).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }
}

// ==================== Directory ====================

/// One JSON file per template under a directory
#[derive(Debug, Clone)]
pub struct DirTemplateStore {
    dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTemplate {
    name: String,
    updated: DateTime<Utc>,
    snapshot: Snapshot,
}

impl StoredTemplate {
    fn new(name: &str, snapshot: &Snapshot) -> Self {
        Self {
            name: name.trim().to_string(),
            updated: Utc::now(),
            snapshot: snapshot.clone(),
        }
    }

    fn info(&self) -> TemplateInfo {
        TemplateInfo {
            name: self.name.clone(),
            updated: self.updated,
        }
    }
}

impl DirTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> SerResult<PathBuf> {
        Ok(self.dir.join(format!("{}.json", slug(name)?)))
    }

    fn read(path: &Path) -> SerResult<StoredTemplate> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| SerializationError::SnapshotSchemaMismatch {
            message: format!("{}: {}", path.display(), e),
        })
    }
}

impl TemplateStore for DirTemplateStore {
    fn put(&mut self, name: &str, snapshot: &Snapshot) -> SerResult<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let stored = StoredTemplate::new(name, snapshot);
        fs::write(&path, serde_json::to_string_pretty(&stored)?)?;
        log::info!("saved template {:?} to {}", stored.name, path.display());
        Ok(())
    }

    fn get(&self, name: &str) -> SerResult<Option<Snapshot>> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read(&path)?.snapshot))
    }

    fn list(&self) -> SerResult<Vec<TemplateInfo>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }

        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(stored) => infos.push(stored.info()),
                Err(e) => log::warn!("skipping unreadable template {}: {}", path.display(), e),
            }
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }
}
