//! TreeWalker - flat depth-first listing of a directory subtree

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};

use super::config::WalkerConfig;
use super::filter::{METADATA_DIR, PathFilter};

/// A path discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Root-prefixed or root-relative, depending on [`WalkerConfig::relative`].
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Lists a directory subtree depth-first.
///
/// Within each directory, entries are sorted by name: files come first, then
/// each subdirectory followed by its own contents. `.git` is never listed.
pub struct TreeWalker {
    config: WalkerConfig,
    filter: Option<PathFilter>,
}

impl TreeWalker {
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    /// Use a specific ignore filter instead of the `git`-command default.
    /// Only consulted when `use_gitignore` is set.
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        self.walk_each(root, |entry| {
            paths.push(entry.path);
            Ok(())
        })?;
        Ok(paths)
    }

    /// Stream entries to `visit` as they are discovered.
    ///
    /// With `use_gitignore`, fails with [`Error::NotRepo`] before reading
    /// anything if `root` is not inside a git working tree. An error from
    /// `visit` stops the walk.
    pub fn walk_each<F>(&self, root: &Path, mut visit: F) -> Result<()>
    where
        F: FnMut(WalkEntry) -> Result<()>,
    {
        let default_filter;
        let filter = if self.config.use_gitignore {
            let filter = match &self.filter {
                Some(filter) => filter,
                None => {
                    default_filter = PathFilter::default();
                    &default_filter
                }
            };
            if !filter.is_repo_root(root)? {
                return Err(Error::NotRepo(root.to_path_buf()));
            }
            Some(filter)
        } else {
            None
        };

        if !root.is_dir() {
            return Ok(());
        }
        self.walk_dir(root, root, filter, &mut visit)
    }

    fn walk_dir<F>(
        &self,
        root: &Path,
        dir: &Path,
        filter: Option<&PathFilter>,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(WalkEntry) -> Result<()>,
    {
        debug!(dir = %dir.display(), "listing directory");

        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        let mut subdirs = Vec::new();
        for entry in entries {
            if entry.file_name() == METADATA_DIR {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type()?;
            // Links are classified by their target but never followed
            let is_symlink = file_type.is_symlink();
            let is_dir = if is_symlink {
                path.is_dir()
            } else {
                file_type.is_dir()
            };

            if let Some(filter) = filter {
                // Ignore queries run from the directory being listed
                if filter.excludes(&path, is_dir, dir)? {
                    trace!(path = %path.display(), "excluded");
                    continue;
                }
            }

            if is_dir {
                subdirs.push((path, is_symlink));
            } else {
                visit(self.entry(root, &path, false))?;
            }
        }

        for (path, is_symlink) in subdirs {
            if !self.config.only_files {
                visit(self.entry(root, &path, true))?;
            }
            if !is_symlink {
                self.walk_dir(root, &path, filter, visit)?;
            }
        }

        Ok(())
    }

    fn entry(&self, root: &Path, path: &Path, is_dir: bool) -> WalkEntry {
        let path = if self.config.relative {
            path.strip_prefix(root).unwrap_or(path).to_path_buf()
        } else {
            path.to_path_buf()
        };
        WalkEntry { path, is_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{GitCommand, NativeIgnore};
    use crate::test_utils::{TestRepo, expected_set, path_set};

    fn relative() -> WalkerConfig {
        WalkerConfig {
            relative: true,
            ..Default::default()
        }
    }

    fn ignore_aware() -> WalkerConfig {
        WalkerConfig {
            relative: true,
            use_gitignore: true,
            ..Default::default()
        }
    }

    fn filters() -> Vec<PathFilter> {
        vec![
            PathFilter::new(GitCommand::new()),
            PathFilter::new(NativeIgnore::new()),
        ]
    }

    fn sample_tree(repo: &TestRepo) {
        repo.add_file("README.md", "# Readme");
        repo.add_file("src/main.rs", "fn main() {}");
        repo.add_file("src/util/mod.rs", "");
        repo.add_dir("empty");
    }

    #[test]
    fn test_walk_all_excludes_git_dir() {
        let repo = TestRepo::with_git();
        sample_tree(&repo);

        let paths = TreeWalker::new(relative()).walk(repo.path()).unwrap();
        assert_eq!(
            path_set(&paths),
            expected_set(&[
                "README.md",
                "empty",
                "src",
                "src/main.rs",
                "src/util",
                "src/util/mod.rs",
            ])
        );
    }

    #[test]
    fn test_walk_all_order() {
        let repo = TestRepo::new();
        sample_tree(&repo);

        let paths = TreeWalker::new(relative()).walk(repo.path()).unwrap();
        let paths: Vec<_> = paths.iter().map(|p| p.to_string_lossy().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "README.md",
                "empty",
                "src",
                "src/main.rs",
                "src/util",
                "src/util/mod.rs",
            ]
        );
    }

    #[test]
    fn test_walk_without_repo_needs_no_git() {
        let repo = TestRepo::new();
        sample_tree(&repo);
        let paths = TreeWalker::new(relative()).walk(repo.path()).unwrap();
        assert_eq!(paths.len(), 6);
    }

    #[test]
    fn test_only_files_drops_exactly_directories() {
        let repo = TestRepo::new();
        sample_tree(&repo);

        let config = WalkerConfig {
            only_files: true,
            ..relative()
        };
        let paths = TreeWalker::new(config).walk(repo.path()).unwrap();
        assert_eq!(
            path_set(&paths),
            expected_set(&["README.md", "src/main.rs", "src/util/mod.rs"])
        );
    }

    #[test]
    fn test_absolute_paths_are_root_prefixed() {
        let repo = TestRepo::new();
        sample_tree(&repo);

        let paths = TreeWalker::new(WalkerConfig::default())
            .walk(repo.path())
            .unwrap();
        assert_eq!(paths.len(), 6);
        assert!(paths.iter().all(|p| p.starts_with(repo.path())));
        assert!(paths.contains(&repo.path().join("src").join("main.rs")));
    }

    #[test]
    fn test_file_root_yields_nothing() {
        let repo = TestRepo::new();
        let file = repo.add_file("only.txt", "x");
        let paths = TreeWalker::new(relative()).walk(&file).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_gitignore_filters_matching_paths() {
        for filter in filters() {
            let repo = TestRepo::with_git();
            repo.add_file(".gitignore", "*.log\n");
            repo.add_untracked("x.log", "log");
            repo.add_untracked("y.txt", "text");

            let paths = TreeWalker::new(ignore_aware())
                .with_filter(filter)
                .walk(repo.path())
                .unwrap();
            assert_eq!(path_set(&paths), expected_set(&[".gitignore", "y.txt"]));
        }
    }

    #[test]
    fn test_gitignore_file_always_listed() {
        for filter in filters() {
            let repo = TestRepo::with_git();
            repo.add_file(".gitignore", ".gitignore\n*.tmp\n");
            repo.add_untracked("sub/.gitignore", "*\n");
            repo.add_untracked("a.tmp", "");
            repo.add_untracked("b.rs", "");

            let paths = TreeWalker::new(ignore_aware())
                .with_filter(filter)
                .walk(repo.path())
                .unwrap();
            assert_eq!(
                path_set(&paths),
                expected_set(&[".gitignore", "b.rs", "sub", "sub/.gitignore"])
            );
        }
    }

    #[test]
    fn test_excluded_directory_hides_descendants() {
        for filter in filters() {
            let repo = TestRepo::with_git();
            repo.add_file(".gitignore", "vendor/\n");
            repo.add_untracked("vendor/.gitignore", "!keep.txt\n");
            repo.add_untracked("vendor/keep.txt", "keep");
            repo.add_untracked("vendor/lib/code.rs", "");
            repo.add_file("src/lib.rs", "");

            let paths = TreeWalker::new(ignore_aware())
                .with_filter(filter)
                .walk(repo.path())
                .unwrap();
            assert_eq!(
                path_set(&paths),
                expected_set(&[".gitignore", "src", "src/lib.rs"])
            );
        }
    }

    #[test]
    fn test_nested_gitignore_applies_to_its_directory() {
        for filter in filters() {
            let repo = TestRepo::with_git();
            repo.add_file("docs/.gitignore", "*.draft\n");
            repo.add_untracked("docs/intro.md", "");
            repo.add_untracked("docs/intro.draft", "");
            repo.add_untracked("notes.draft", "");

            let config = WalkerConfig {
                only_files: true,
                ..ignore_aware()
            };
            let paths = TreeWalker::new(config)
                .with_filter(filter)
                .walk(repo.path())
                .unwrap();
            assert_eq!(
                path_set(&paths),
                expected_set(&["docs/.gitignore", "docs/intro.md", "notes.draft"])
            );
        }
    }

    #[test]
    fn test_reincluded_directory_keeps_outer_rules() {
        for filter in filters() {
            let repo = TestRepo::with_git();
            repo.add_file(".gitignore", "*.log\n");
            repo.add_file("a/.gitignore", "!b/\n");
            repo.add_untracked("a/b/x.log", "log");
            repo.add_untracked("a/b/y.txt", "text");

            let paths = TreeWalker::new(ignore_aware())
                .with_filter(filter)
                .walk(repo.path())
                .unwrap();
            assert_eq!(
                path_set(&paths),
                expected_set(&[".gitignore", "a", "a/.gitignore", "a/b", "a/b/y.txt"])
            );
        }
    }

    #[test]
    fn test_not_repo_fails_before_traversal() {
        for filter in filters() {
            let dir = TestRepo::new();
            dir.add_file("a.txt", "a");

            let mut visited = 0;
            let result = TreeWalker::new(ignore_aware())
                .with_filter(filter)
                .walk_each(dir.path(), |_| {
                    visited += 1;
                    Ok(())
                });
            assert!(matches!(result, Err(Error::NotRepo(_))));
            assert_eq!(visited, 0);
        }
    }

    #[test]
    fn test_default_filter_is_git_command() {
        let repo = TestRepo::with_git();
        repo.add_file(".gitignore", "target/\n");
        repo.add_untracked("target/debug/app", "");
        repo.add_file("Cargo.toml", "");

        let paths = TreeWalker::new(ignore_aware()).walk(repo.path()).unwrap();
        assert_eq!(path_set(&paths), expected_set(&[".gitignore", "Cargo.toml"]));
    }

    #[test]
    fn test_visit_error_stops_walk() {
        let repo = TestRepo::new();
        sample_tree(&repo);

        let mut seen = Vec::new();
        let result = TreeWalker::new(relative()).walk_each(repo.path(), |entry| {
            seen.push(entry.path);
            if seen.len() == 2 {
                return Err(Error::MalformedInput("stop".to_string()));
            }
            Ok(())
        });
        assert!(matches!(result, Err(Error::MalformedInput(_))));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_walk_entries_report_kind() {
        let repo = TestRepo::new();
        sample_tree(&repo);

        let mut dirs = Vec::new();
        TreeWalker::new(relative())
            .walk_each(repo.path(), |entry| {
                if entry.is_dir {
                    dirs.push(entry.path);
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(path_set(&dirs), expected_set(&["empty", "src", "src/util"]));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinked_directory_listed_but_not_entered() {
        let repo = TestRepo::new();
        repo.add_file("real/file.rs", "");
        std::os::unix::fs::symlink(repo.path().join("real"), repo.path().join("link"))
            .unwrap();

        let paths = TreeWalker::new(relative()).walk(repo.path()).unwrap();
        assert_eq!(
            path_set(&paths),
            expected_set(&["link", "real", "real/file.rs"])
        );
    }

    #[test]
    fn test_walk_is_reproducible() {
        let repo = TestRepo::with_git();
        sample_tree(&repo);
        repo.add_file(".gitignore", "empty/\n");

        let walker = TreeWalker::new(ignore_aware()).with_filter(PathFilter::new(NativeIgnore::new()));
        let first = walker.walk(repo.path()).unwrap();
        let second = walker.walk(repo.path()).unwrap();
        assert_eq!(first, second);
    }
}
