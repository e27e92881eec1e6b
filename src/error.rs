use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning sprite art into images.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("sprite art has no rows")]
    Empty,

    #[error("row {row} is {found} pixels wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },

    #[error("sprite {name}: {source}")]
    Named {
        name: &'static str,
        #[source]
        source: Box<SpriteError>,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
