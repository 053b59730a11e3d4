//! Normalizing and flattening candidate repository paths.

use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute and removes `.` and `..` components lexically.
///
/// Symlinks are not resolved.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Normalizes, deduplicates and sorts `paths`, then drops every path that
/// lies inside another surviving path.
///
/// Only the outermost roots remain, so no directory tree is scanned twice.
pub fn flatten_paths<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut unique: Vec<PathBuf> = paths
        .into_iter()
        .map(|p| normalize_path(p.as_ref()))
        .collect();
    unique.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    unique.dedup();

    unique
        .iter()
        .filter(|path| {
            !unique
                .iter()
                .any(|other| other != *path && path.starts_with(other))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_descendants_are_removed() {
        assert_eq!(flatten_paths(["/a", "/a/b", "/c"]), paths(&["/a", "/c"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_duplicates_collapse_and_output_is_sorted() {
        assert_eq!(
            flatten_paths(["/z", "/m/x", "/z", "/m/./x", "/m/y/../x"]),
            paths(&["/m/x", "/z"])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_sibling_prefixes_are_not_ancestors() {
        assert_eq!(
            flatten_paths(["/work/api", "/work/api-client"]),
            paths(&["/work/api", "/work/api-client"])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_deep_descendants_are_removed_in_any_order() {
        assert_eq!(
            flatten_paths(["/r/a/b/c", "/r/a", "/r/a/b"]),
            paths(&["/r/a"])
        );
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(flatten_paths(["some/repo"]), vec![cwd.join("some").join("repo")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(flatten_paths(Vec::<PathBuf>::new()).is_empty());
    }
}
