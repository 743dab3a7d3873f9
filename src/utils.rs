use std::path::Path;
use tracing::debug;

/// Read a small sensor or state file.
///
/// Files under `/sys` report a bogus size, so the content is read until EOF
/// rather than trusted to match the metadata.
///
/// # Returns
///
/// The file content, or `None` if it cannot be read or is empty
#[must_use]
pub fn read_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.is_empty() => Some(content),
        Ok(_) => {
            debug!("{} is empty", path.display());
            None
        }
        Err(e) => {
            debug!("Cannot read {}: {e}", path.display());
            None
        }
    }
}

/// Read a file and parse its trimmed content
#[must_use]
pub fn read_number<T: std::str::FromStr>(path: &Path) -> Option<T> {
    read_file(path)?.trim().parse().ok()
}

/// Whether `text` holds only ASCII digits and whitespace
#[must_use]
pub fn is_num(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace())
}

/// Remove every whitespace character from `text`
#[must_use]
pub fn strip(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_num() {
        assert!(is_num("42\n"));
        assert!(is_num(" 7 "));
        assert!(is_num(""));
        assert!(!is_num("4a2"));
        assert!(!is_num("-3"));
    }

    #[test]
    fn test_strip_removes_all_whitespace() {
        assert_eq!(strip(" mu ted\n"), "muted");
        assert_eq!(strip("  \n"), "");
        assert_eq!(strip("Full"), "Full");
    }

    #[test]
    fn test_read_file_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::write(&empty, "").unwrap();

        assert_eq!(read_file(&dir.path().join("missing")), None);
        assert_eq!(read_file(&empty), None);
    }

    #[test]
    fn test_read_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capacity");
        fs::write(&path, "87\n").unwrap();
        assert_eq!(read_number::<u32>(&path), Some(87));

        fs::write(&path, "unknown\n").unwrap();
        assert_eq!(read_number::<u32>(&path), None);
    }
}
