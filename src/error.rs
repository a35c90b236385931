/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Browser storage unavailable or refused the operation.
    Storage(String),
    IncompatibleVersion { found: u32, min_compatible: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Json(e) => write!(f, "Serialization error: {}", e),
            SaveError::Storage(msg) => write!(f, "Storage error: {}", msg),
            SaveError::IncompatibleVersion {
                found,
                min_compatible,
            } => write!(
                f,
                "Save version {} is older than the oldest supported version {}",
                found, min_compatible
            ),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Json(e) => Some(e),
            _ => None,
        }
    }
}
