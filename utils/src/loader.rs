//! This module handles I/O

use std::io;
use std::path::Path;

/// Loads a file as a [`String`] object. This is useful for loading plaintext such as yaml files.
pub fn load_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Writes the string to the given path. The content is first written to a sibling temporary file
/// which then replaces the target, such that a failed write never leaves a truncated file behind.
pub fn store_string<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_load() {
        let path = std::env::temp_dir().join(format!("utils-loader-{}.txt", std::process::id()));
        store_string(&path, "roads: []").unwrap();
        assert_eq!(load_string(&path).unwrap(), "roads: []");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("utils-loader-does-not-exist.yml");
        assert!(load_string(path).is_err());
    }
}
