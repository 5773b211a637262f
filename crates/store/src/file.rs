//! JSON file persistence for [`HighScores`].
//!
//! Writes go to a sibling temp file that is then renamed over the target, so a
//! crash mid-write never leaves a truncated score file behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use blockfall_types::Difficulty;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::high_scores::{HighScores, ScoreEntry};

const APP_DIR: &str = "blockfall";
const FILE_NAME: &str = "high-scores.json";

#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/blockfall/high-scores.json`
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
            .ok_or(StoreError::NoDataDir)
    }

    pub fn open_default() -> Result<Self> {
        Self::default_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the score lists. A missing file yields empty lists.
    pub fn load(&self) -> Result<HighScores> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HighScores::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let mut scores: HighScores =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        scores.normalize();
        debug!(path = %self.path.display(), "loaded high scores");
        Ok(scores)
    }

    /// Write the score lists atomically.
    pub fn save(&self, scores: &HighScores) -> Result<()> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = serde_json::to_string_pretty(scores)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents).map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        debug!(path = %self.path.display(), "saved high scores");
        Ok(())
    }

    /// Load, insert `entry`, and save. Returns the entry's rank if it was kept.
    ///
    /// Nothing is written when the entry does not make the list.
    pub fn record(&self, difficulty: Difficulty, entry: ScoreEntry) -> Result<Option<usize>> {
        let mut scores = self.load()?;
        let rank = scores.insert(difficulty, entry);
        if rank.is_some() {
            self.save(&scores)?;
        }
        Ok(rank)
    }

    /// Delete the score file. Clearing an absent file succeeds.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn record_persists_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("nested").join("scores.json"));

        assert_eq!(store.record(Difficulty::Easy, ScoreEntry::new(120, 2, 11)).unwrap(), Some(0));
        assert_eq!(store.record(Difficulty::Easy, ScoreEntry::new(80, 1, 3)).unwrap(), Some(1));

        let reloaded = ScoreStore::new(store.path()).load().unwrap();
        let top = reloaded.top(Difficulty::Easy);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].score, 120);
        assert_eq!(top[0].lines, 11);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();
        let err = ScoreStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "{err}");
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.json"));
        store.record(Difficulty::Hard, ScoreEntry::new(1, 1, 0)).unwrap();
        assert!(store.path().exists());
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn default_path_ends_with_app_file() {
        if let Ok(path) = ScoreStore::default_path() {
            assert!(path.ends_with("blockfall/high-scores.json"));
        }
    }
}
