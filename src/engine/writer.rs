use crate::error::WriteError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A single relative path segment: no separators, no `.`/`..`, no NUL.
pub fn is_path_component(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// `<root>/<group>/[<subgroup>/]<stem>.txt`
pub fn output_path(root: &Path, group: &str, subgroup: &str, stem: &str) -> PathBuf {
    let mut path = root.join(group.trim());
    let subgroup = subgroup.trim();
    if !subgroup.is_empty() {
        path.push(subgroup);
    }
    path.push(format!("{}.txt", stem));
    path
}

/// Writes `text` to `path`. Returns `Ok(false)` and touches nothing when `text` is empty.
pub fn write(path: &Path, text: &str) -> Result<bool, WriteError> {
    if text.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    fs::write(path, text).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

fn ensure_dir(dir: &Path) -> Result<(), WriteError> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        // Entries sharing a group race to create the same directory.
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(WriteError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_output_path_layout() {
        let root = Path::new("out");
        assert_eq!(
            output_path(root, " ads ", "", "3"),
            PathBuf::from("out/ads/3.txt")
        );
        assert_eq!(
            output_path(root, "security", " malware ", "17"),
            PathBuf::from("out/security/malware/17.txt")
        );
    }

    #[test]
    fn test_path_components() {
        assert!(is_path_component("ads"));
        assert!(is_path_component(" malware "));
        assert!(is_path_component("v1.2"));
        assert!(!is_path_component(""));
        assert!(!is_path_component("  "));
        assert!(!is_path_component(".."));
        assert!(!is_path_component("."));
        assert!(!is_path_component("../../escape"));
        assert!(!is_path_component("a/b"));
        assert!(!is_path_component("a\\b"));
        assert!(!is_path_component("/etc"));
    }

    #[test]
    fn test_empty_text_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group/sub/0.txt");
        assert!(!write(&path, "").unwrap());
        assert!(!path.exists());
        assert!(!dir.path().join("group").exists());
    }

    #[test]
    fn test_write_then_read_back_same_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), "ads", "trackers", "5");
        let text = "b.example.com\na.example.com\nc.example.com";

        assert!(write(&path, text).unwrap());

        let read = fs::read_to_string(&path).unwrap();
        let expected: HashSet<&str> = text.lines().collect();
        let actual: HashSet<&str> = read.lines().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_existing_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ads")).unwrap();
        assert!(write(&dir.path().join("ads/1.txt"), "x.com").unwrap());
        assert!(write(&dir.path().join("ads/2.txt"), "y.com").unwrap());
    }

    #[test]
    fn test_file_in_place_of_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ads"), "not a dir").unwrap();
        let err = write(&dir.path().join("ads/1.txt"), "x.com").unwrap_err();
        assert!(matches!(err, WriteError::CreateDir { .. }));
    }
}
