use std::{fs, path::Path};

use tracing::{instrument, warn};

use super::CcdError;

/// Names of the non-directory entries directly inside `dir`, in listing order.
///
/// Symlinks are not followed when deciding whether an entry is a directory,
/// so a link pointing at a directory is still reported as a client.
#[instrument]
pub fn list_files(dir: &Path) -> Result<Vec<String>, CcdError> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir).map_err(CcdError::directory(dir))? {
        let entry = entry.map_err(CcdError::directory(dir))?;
        let file_type = entry.file_type().map_err(CcdError::directory(dir))?;
        if file_type.is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => warn!("skipping non utf-8 entry {name:?} in {dir:?}"),
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn lists_only_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alice"), b"").unwrap();
        fs::write(dir.path().join("bob"), b"ifconfig-push 10.8.0.5 255.255.255.0\n").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive").join("carol"), b"").unwrap();

        let names = list_files(dir.path()).unwrap();
        assert_eq!(sorted(names), vec!["alice", "bob"]);
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = list_files(&missing).unwrap_err();
        assert!(matches!(err, CcdError::DirectoryUnavailable { ref path, .. } if path == &missing));
    }

    #[test]
    fn file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("alice");
        fs::write(&file, b"").unwrap();

        assert!(matches!(
            list_files(&file),
            Err(CcdError::DirectoryUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_listed() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dave")).unwrap();

        assert_eq!(list_files(dir.path()).unwrap(), vec!["dave"]);
    }
}
