use std::path::{Path, PathBuf};

use anyhow::Context;

/// Resolve a user-supplied path into the ordered list of candidate files.
///
/// A regular file resolves to itself. A directory resolves to its regular
/// files, including nested ones when `recursive` is set. There is no
/// extension filter: the metadata reader decides what is a module. The list
/// is sorted so a given directory snapshot always enumerates identically.
pub fn collect_candidates(path: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut files = Vec::new();
        collect_files(path, recursive, &mut files)?;
        files.sort();
        return Ok(files);
    }

    anyhow::bail!("provided path does not exist: {}", path.display())
}

fn collect_files(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, files)?;
            }
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn single_file_resolves_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.exe");
        touch(&file);

        let candidates = collect_candidates(&file, false).unwrap();
        assert_eq!(candidates, vec![file]);
    }

    #[test]
    fn non_recursive_excludes_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.dll"));
        touch(&dir.path().join("a.exe"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub").join("c.exe"));

        let candidates = collect_candidates(dir.path(), false).unwrap();
        assert_eq!(
            candidates,
            vec![dir.path().join("a.exe"), dir.path().join("b.dll")]
        );
    }

    #[test]
    fn recursive_includes_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.exe"));
        fs::create_dir_all(dir.path().join("sub").join("deep")).unwrap();
        touch(&dir.path().join("sub").join("c.exe"));
        touch(&dir.path().join("sub").join("deep").join("d.dll"));

        let candidates = collect_candidates(dir.path(), true).unwrap();
        assert_eq!(
            candidates,
            vec![
                dir.path().join("a.exe"),
                dir.path().join("sub").join("c.exe"),
                dir.path().join("sub").join("deep").join("d.dll"),
            ]
        );
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = collect_candidates(&missing, false).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
