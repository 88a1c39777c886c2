//! Persistence for the overlay window's settled placement.
//!
//! A single JSON record (`placement.json` in the platform data directory)
//! holding position, expansion flag, snap side, and expand direction. Read
//! once at startup; every settled transition writes through with a
//! read-modify-write merge so partial patches never clobber fields written
//! by an earlier transition. Missing or corrupt data degrades to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Screen edge the collapsed window visually acknowledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapSide {
    #[default]
    None,
    Left,
    Right,
}

/// Direction the window grows when expanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandDirection {
    Left,
    #[default]
    Right,
}

/// Persisted window placement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub snap_side: SnapSide,
    #[serde(default)]
    pub expand_direction: ExpandDirection,
}

/// Partial update merged into the persisted record.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub is_expanded: Option<bool>,
    pub snap_side: Option<SnapSide>,
    pub expand_direction: Option<ExpandDirection>,
}

impl Placement {
    fn merge(&mut self, patch: PlacementPatch) {
        if let Some(x) = patch.x {
            self.x = Some(x);
        }
        if let Some(y) = patch.y {
            self.y = Some(y);
        }
        if let Some(expanded) = patch.is_expanded {
            self.is_expanded = expanded;
        }
        if let Some(side) = patch.snap_side {
            self.snap_side = side;
        }
        if let Some(direction) = patch.expand_direction {
            self.expand_direction = direction;
        }
    }
}

/// File-backed placement store.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    path: PathBuf,
}

impl PlacementStore {
    /// Store at the platform data directory (e.g.
    /// `~/Library/Application Support/revtray/placement.json`), or `None`
    /// when no data directory can be resolved.
    pub fn open_default() -> Option<Self> {
        dirs::data_dir().map(|dir| Self {
            path: dir.join("revtray").join("placement.json"),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the placement, returning defaults if the file is missing or invalid.
    pub fn load(&self) -> Placement {
        load_from(&self.path)
    }

    /// Merge the patch into whatever is currently persisted and write back.
    pub fn update(&self, patch: PlacementPatch) -> Result<(), std::io::Error> {
        let mut placement = load_from(&self.path);
        placement.merge(patch);
        save_to(&placement, &self.path)
    }
}

// ---------------------------------------------------------------------------
// Path-parameterised helpers (used by the store and tests)
// ---------------------------------------------------------------------------

fn load_from(path: &Path) -> Placement {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
        Err(_) => Placement::default(),
    }
}

fn save_to(placement: &Placement, path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(placement).map_err(std::io::Error::other)?;
    atomic_write(path, json.as_bytes())
}

/// Write bytes to a file atomically: write to a temp file in the same
/// directory, then rename over the target. Prevents partial JSON on crash.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
    use std::io::Write;

    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent")
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_store(name: &str) -> (PathBuf, PlacementStore) {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("placement.json");
        (dir, PlacementStore::at(path))
    }

    #[test]
    fn defaults() {
        let placement = Placement::default();
        assert!(placement.x.is_none());
        assert!(placement.y.is_none());
        assert!(!placement.is_expanded);
        assert_eq!(placement.snap_side, SnapSide::None);
        assert_eq!(placement.expand_direction, ExpandDirection::Right);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let store = PlacementStore::at("/tmp/revtray_nonexistent/placement.json".into());
        assert_eq!(store.load(), Placement::default());
    }

    #[test]
    fn load_invalid_json_returns_default() {
        let (dir, store) = temp_store("revtray_test_invalid");
        fs::write(dir.join("placement.json"), "not valid json!!!").unwrap();
        assert_eq!(store.load(), Placement::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn update_merges_into_existing_record() {
        let (dir, store) = temp_store("revtray_test_merge");

        store
            .update(PlacementPatch {
                x: Some(120.0),
                y: Some(64.0),
                ..Default::default()
            })
            .unwrap();
        store
            .update(PlacementPatch {
                snap_side: Some(SnapSide::Left),
                ..Default::default()
            })
            .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.x, Some(120.0));
        assert_eq!(loaded.y, Some(64.0));
        assert_eq!(loaded.snap_side, SnapSide::Left);
        assert!(!loaded.is_expanded);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn update_overwrites_patched_fields_only() {
        let (dir, store) = temp_store("revtray_test_patch");

        store
            .update(PlacementPatch {
                x: Some(10.0),
                is_expanded: Some(true),
                expand_direction: Some(ExpandDirection::Left),
                ..Default::default()
            })
            .unwrap();
        store
            .update(PlacementPatch {
                is_expanded: Some(false),
                x: Some(30.0),
                ..Default::default()
            })
            .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.x, Some(30.0));
        assert!(!loaded.is_expanded);
        // Direction from the first write survives the second.
        assert_eq!(loaded.expand_direction, ExpandDirection::Left);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn extra_fields_ignored() {
        let (dir, store) = temp_store("revtray_test_extra");
        fs::write(
            dir.join("placement.json"),
            r#"{"x":5.0,"snap_side":"right","unknown_field":42}"#,
        )
        .unwrap();
        let loaded = store.load();
        assert_eq!(loaded.x, Some(5.0));
        assert_eq!(loaded.snap_side, SnapSide::Right);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn snap_side_serialization() {
        assert_eq!(serde_json::to_string(&SnapSide::Left).unwrap(), "\"left\"");
        assert_eq!(serde_json::to_string(&SnapSide::None).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::to_string(&ExpandDirection::Right).unwrap(),
            "\"right\""
        );
    }
}
