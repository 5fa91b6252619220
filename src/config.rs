/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub play: PlayConfig,
    pub input: InputConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayConfig {
    pub max_undo: usize,     // 0 disables undo
    pub start_level: usize,
    pub wrap_levels: bool,   // after the last level, continue at level 0
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputConfig {
    pub repeat_ms: u64,      // min delay between two moves while a key is held
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    play: TomlPlay,
    #[serde(default)]
    input: TomlInput,
}

#[derive(Deserialize, Debug)]
struct TomlPlay {
    #[serde(default = "default_max_undo")]
    max_undo: usize,
    #[serde(default)]
    start_level: usize,
    #[serde(default = "default_wrap_levels")]
    wrap_levels: bool,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_repeat_ms")]
    repeat_ms: u64,
}

// ── Defaults ──

fn default_max_undo() -> usize { 64 }
fn default_wrap_levels() -> bool { true }
fn default_repeat_ms() -> u64 { 120 }

impl Default for TomlPlay {
    fn default() -> Self {
        TomlPlay {
            max_undo: default_max_undo(),
            start_level: 0,
            wrap_levels: default_wrap_levels(),
        }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput { repeat_ms: default_repeat_ms() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            play: PlayConfig {
                max_undo: t.play.max_undo,
                start_level: t.play.start_level,
                wrap_levels: t.play.wrap_levels,
            },
            input: InputConfig { repeat_ms: t.input.repeat_ms },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Any failure is logged and replaced by defaults.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("{e}; using default settings");
                GameConfig::default()
            }
        }
    }

    /// Like `load`, but unreadable or malformed files are errors.
    /// A missing file is not: defaults apply.
    pub fn try_load() -> Result<Self, ConfigError> {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if path.exists() {
                let cfg = Self::from_file(&path)?;
                log::info!("config loaded from {}", path.display());
                return Ok(cfg);
            }
        }
        log::debug!("no config.toml found, using defaults");
        Ok(GameConfig::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from)
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so data next to the real binary is found.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.play.max_undo, 64);
        assert_eq!(cfg.play.start_level, 0);
        assert!(cfg.play.wrap_levels);
        assert_eq!(cfg.input.repeat_ms, 120);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = GameConfig::from_toml_str("[play]\nmax_undo = 5\n").unwrap();
        assert_eq!(cfg.play.max_undo, 5);
        assert!(cfg.play.wrap_levels);
        assert_eq!(cfg.input.repeat_ms, 120);
    }

    #[test]
    fn full_file() {
        let text = r#"
            [play]
            max_undo = 0
            start_level = 2
            wrap_levels = false

            [input]
            repeat_ms = 40
        "#;
        let cfg = GameConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.play, PlayConfig { max_undo: 0, start_level: 2, wrap_levels: false });
        assert_eq!(cfg.input.repeat_ms, 40);
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(GameConfig::from_toml_str("[play]\nmax_undo = \"lots\"\n").is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GameConfig::from_file(Path::new("/nonexistent/wordpush/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
