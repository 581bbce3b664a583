use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum DiscoveryError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    NotADirectory(PathBuf),
    Io(PathBuf, String),
}

impl Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::NotFound(path) => write!(f, "{:?} does not exist.", path),
            DiscoveryError::PermissionDenied(path) => write!(f, "{:?} is not readable.", path),
            DiscoveryError::NotADirectory(path) => write!(f, "{:?} is not a directory.", path),
            DiscoveryError::Io(path, msg) => write!(f, "Error reading {:?}: {}", path, msg),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EncodeErrorKind {
    /// The encoder process could not be started at all.
    Launch,
    /// The encoder ran but did not exit successfully.
    Encode,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EncodeError {
    path: PathBuf,
    msg: String,
    kind: EncodeErrorKind,
}

impl EncodeError {
    pub fn for_file(path: &Path, msg: &str) -> Self {
        EncodeError {
            path: PathBuf::from(path),
            msg: String::from(msg),
            kind: EncodeErrorKind::Encode,
        }
    }

    pub fn launch(path: &Path, msg: &str) -> Self {
        EncodeError {
            path: PathBuf::from(path),
            msg: String::from(msg),
            kind: EncodeErrorKind::Launch,
        }
    }

    pub fn is_launch_failure(&self) -> bool {
        self.kind == EncodeErrorKind::Launch
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error encoding {:?}: {}", &self.path, &self.msg)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, String),
    Parse(PathBuf, String),
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, msg) => write!(f, "Error reading config {:?}: {}", path, msg),
            ConfigError::Parse(path, msg) => write!(f, "Error parsing config {:?}: {}", path, msg),
        }
    }
}
