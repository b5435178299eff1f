use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn to_json<T: Serialize>(obj: &T) -> String {
    serde_json::to_string_pretty(obj).unwrap()
}

/// Creates parent directories as needed, then writes the object as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &str, obj: &T) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    fs_err::write(path, to_json(obj))?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let contents = fs_err::read_to_string(path)?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path))
}

/// Like `read_json`, but a file that doesn't exist yet yields the fallback instead of an
/// error. A file that exists but doesn't parse is still an error.
pub fn maybe_read_json<T: DeserializeOwned>(path: &str, fallback: T) -> Result<T> {
    if !Path::new(path).exists() {
        return Ok(fallback);
    }
    read_json(path)
}
