/// Error types for the surfaces around the rule engine.
///
/// The engine itself (parse / transform / move) never fails: every edge
/// case has a silent policy. Errors only come from the outside world:
/// reading configuration, naming kinds, picking levels.

use std::path::PathBuf;

use thiserror::Error;

/// An object kind name that is not in the kind table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object kind `{0}`")]
pub struct ParseKindError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid config: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {index} does not exist ({count} levels available)")]
    UnknownLevel { index: usize, count: usize },
}
