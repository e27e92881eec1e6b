use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const FILE_NAME: &str = "starstrike.log";
const ENV_VAR: &str = "STARSTRIKE_LOG";

pub fn default_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(FILE_NAME);
        }
    }
    PathBuf::from(FILE_NAME)
}

/// `STARSTRIKE_LOG` wins over the configured level. An unparsable
/// directive falls back to `info`.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send tracing output to a file, since the terminal belongs to the UI.
/// Returns false, leaving logging off, when the file cannot be created.
pub fn init(path: &Path, level: &str) -> bool {
    let Ok(file) = File::create(path) else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}
