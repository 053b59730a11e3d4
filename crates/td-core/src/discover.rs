//! Finding working copies under discovery roots.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::paths::{flatten_paths, normalize_path};
use crate::vcs::VcsKind;

/// Repository roots found by [`discover_repositories`], per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub git: Vec<PathBuf>,
    pub svn: Vec<PathBuf>,
}

impl Discovered {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.git.is_empty() && self.svn.is_empty()
    }
}

/// The kind whose marker `dir` carries, checking [`VcsKind::ALL`] in order.
fn marker_kind(dir: &Path) -> Option<VcsKind> {
    VcsKind::ALL.into_iter().find(|kind| kind.has_marker(dir))
}

/// Walks each root depth-first and records working-copy roots.
///
/// A directory is claimed by the first kind whose marker it carries, and the
/// walk does not descend into it, so neither its metadata nor any repository
/// nested inside it is reported. Roots that overlap each other are flattened
/// the same way, across kinds.
pub fn discover_repositories<P: AsRef<Path>>(roots: &[P]) -> Discovered {
    let mut found: Vec<(VcsKind, PathBuf)> = Vec::new();

    for root in roots {
        let root = normalize_path(root.as_ref());
        let mut walker = WalkDir::new(&root).into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable path during discovery");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(kind) = marker_kind(entry.path()) {
                tracing::debug!(%kind, path = %entry.path().display(), "discovered repository");
                found.push((kind, entry.path().to_path_buf()));
                walker.skip_current_dir();
            }
        }
    }

    let outermost: BTreeSet<PathBuf> = flatten_paths(found.iter().map(|(_, path)| path))
        .into_iter()
        .collect();

    let of_kind = |wanted: VcsKind| {
        flatten_paths(
            found
                .iter()
                .filter(|(kind, path)| *kind == wanted && outermost.contains(path))
                .map(|(_, path)| path),
        )
    };

    Discovered {
        git: of_kind(VcsKind::Git),
        svn: of_kind(VcsKind::Svn),
    }
}
