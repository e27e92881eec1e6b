use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

const MAGIC: &[u8; 4] = b"SSH1";
const FILE_NAME: &str = "starstrike.scores";
pub const MAX_ENTRIES: usize = 10;
pub const NAME_LEN: usize = 9;
// 9 bytes of name, NUL padded, then a little-endian u32
const ENTRY_SIZE: usize = NAME_LEN + 4;
const FILE_SIZE: usize = MAGIC.len() + MAX_ENTRIES * ENTRY_SIZE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    fn decode(bytes: &[u8]) -> Self {
        let name = String::from_utf8_lossy(&bytes[..NAME_LEN])
            .trim_end_matches('\0')
            .trim_end()
            .to_string();
        let mut score = [0u8; 4];
        score.copy_from_slice(&bytes[NAME_LEN..ENTRY_SIZE]);
        ScoreEntry {
            name,
            score: u32::from_le_bytes(score),
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        let name = self.name.as_bytes();
        let len = name.len().min(NAME_LEN);
        buf.extend_from_slice(&name[..len]);
        buf.resize(buf.len() + NAME_LEN - len, 0);
        buf.extend_from_slice(&self.score.to_le_bytes());
    }
}

/// Best runs, highest first. Empty slots are not stored in memory; the
/// file always holds ten records with zero scores filling the tail.
#[derive(Clone, Debug)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
    path: PathBuf,
}

impl HighScores {
    pub fn load() -> Self {
        Self::load_from(Self::scores_path())
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_file(&path);
        debug!(path = %path.display(), entries = entries.len(), "high scores loaded");
        HighScores { entries, path }
    }

    fn scores_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(FILE_NAME);
            }
        }
        PathBuf::from(FILE_NAME)
    }

    fn read_file(path: &Path) -> Vec<ScoreEntry> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read high scores");
                return Vec::new();
            }
        };
        if data.len() < FILE_SIZE || &data[..MAGIC.len()] != MAGIC {
            warn!(path = %path.display(), len = data.len(), "ignoring unrecognised high score file");
            return Vec::new();
        }

        let mut entries: Vec<ScoreEntry> = data[MAGIC.len()..FILE_SIZE]
            .chunks_exact(ENTRY_SIZE)
            .map(ScoreEntry::decode)
            .filter(|e| e.score > 0)
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }

    fn write_file(&self) {
        let mut buf = Vec::with_capacity(FILE_SIZE);
        buf.extend_from_slice(MAGIC);
        let blank = ScoreEntry {
            name: String::new(),
            score: 0,
        };
        for slot in 0..MAX_ENTRIES {
            self.entries.get(slot).unwrap_or(&blank).encode(&mut buf);
        }
        if let Err(e) = fs::write(&self.path, &buf) {
            warn!(path = %self.path.display(), error = %e, "could not save high scores");
        }
    }

    /// Would `score` earn a place on the table?
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_ENTRIES || self.entries.iter().any(|e| score > e.score)
    }

    /// Insert a run and save. Returns its 1-based rank, or `None` when it
    /// did not make the table. Ties rank below the existing entry.
    pub fn submit(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let name: String = name.chars().take(NAME_LEN).collect();
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, ScoreEntry { name, score });
        self.entries.truncate(MAX_ENTRIES);
        self.write_file();
        Some(pos + 1)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map_or(0, |e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let hs = HighScores::load_from(dir.path().join(FILE_NAME));
        assert!(hs.entries().is_empty());
        assert_eq!(hs.best(), 0);
        assert!(hs.qualifies(1));
        assert!(!hs.qualifies(0));
    }

    #[test]
    fn test_submit_ranks_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let mut hs = HighScores::load_from(&path);
        assert_eq!(hs.submit("ACE", 500), Some(1));
        assert_eq!(hs.submit("BOB", 900), Some(1));
        assert_eq!(hs.submit("CAT", 500), Some(3), "ties go below");

        let data = fs::read(&path).unwrap();
        assert_eq!(data.len(), FILE_SIZE);
        assert_eq!(&data[..4], b"SSH1");

        let reloaded = HighScores::load_from(&path);
        let names: Vec<&str> = reloaded.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["BOB", "ACE", "CAT"]);
        assert_eq!(reloaded.best(), 900);
    }

    #[test]
    fn test_table_keeps_top_ten() {
        let dir = tempfile::tempdir().unwrap();
        let mut hs = HighScores::load_from(dir.path().join(FILE_NAME));
        for i in 1..=MAX_ENTRIES as u32 {
            hs.submit("P", i * 100);
        }
        assert!(!hs.qualifies(100));
        assert_eq!(hs.submit("LOW", 50), None);
        assert_eq!(hs.submit("MID", 550), Some(6));
        assert_eq!(hs.entries().len(), MAX_ENTRIES);
        assert_eq!(hs.entries().last().unwrap().score, 200);
    }

    #[test]
    fn test_long_names_are_cut() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let mut hs = HighScores::load_from(&path);
        hs.submit("ABCDEFGHIJKLMN", 10);
        assert_eq!(HighScores::load_from(&path).entries()[0].name, "ABCDEFGHI");
    }

    #[test]
    fn test_foreign_or_short_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, b"SSH1 too short").unwrap();
        assert!(HighScores::load_from(&path).entries().is_empty());

        let mut wrong_magic = vec![0u8; FILE_SIZE];
        wrong_magic[..4].copy_from_slice(b"RCS2");
        wrong_magic[4 + NAME_LEN] = 7;
        fs::write(&path, &wrong_magic).unwrap();
        assert!(HighScores::load_from(&path).entries().is_empty());
    }
}
