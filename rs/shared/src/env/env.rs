use std::env::var;
use std::path::PathBuf;

use super::EnvError;

pub fn get_env_var(key: &str) -> Result<String, EnvError> {
    var(key).map_err(|e| EnvError::EnvVar(e, key.to_owned()))
}

/// Reads a filesystem path from `key`. Whitespace-only values count as empty.
pub fn get_env_path(key: &str) -> Result<PathBuf, EnvError> {
    let value = get_env_var(key)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError::Empty(key.to_owned()));
    }
    Ok(PathBuf::from(trimmed))
}
