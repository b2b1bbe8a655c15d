//! Git repository integration
//!
//! Two interchangeable back ends answer the questions the walker needs:
//! [`GitCommand`] shells out to the `git` executable, [`NativeIgnore`] uses
//! `git2` for repository discovery and the `ignore` crate for pattern matching.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;

use git2::{ErrorCode, Repository};
use ignore::Match;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Version-control queries used by ignore-aware listings.
pub trait IgnoreOracle {
    /// Whether `dir` lies inside a git working tree.
    fn is_repo(&self, dir: &Path) -> Result<bool>;

    /// Whether `path` is ignored by the ignore rules visible from `cwd`.
    fn is_ignored(&self, path: &Path, cwd: &Path) -> Result<bool>;
}

/// Exit code `git` uses for "not a git repository".
const NOT_A_REPO: i32 = 128;

/// Oracle that spawns `git` for every query.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: OsString,
}

impl GitCommand {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a different executable, e.g. a wrapper script or an absolute path.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `git` in `cwd` and return its exit code and stderr.
    fn run(&self, args: &[&OsStr], cwd: &Path) -> Result<(Option<i32>, String)> {
        let command = self.describe(args);
        debug!(%command, cwd = %cwd.display(), "running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::ToolInvocation {
                command: command.clone(),
                detail: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Ok((output.status.code(), stderr))
    }

    fn describe(&self, args: &[&OsStr]) -> String {
        let mut command = self.program.to_string_lossy().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(&arg.to_string_lossy());
        }
        command
    }

    fn unexpected(&self, args: &[&OsStr], code: Option<i32>, stderr: String) -> Error {
        let status = match code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        Error::ToolInvocation {
            command: self.describe(args),
            detail: if stderr.is_empty() {
                status
            } else {
                format!("{}: {}", status, stderr)
            },
        }
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl IgnoreOracle for GitCommand {
    fn is_repo(&self, dir: &Path) -> Result<bool> {
        if !dir.is_dir() {
            return Ok(false);
        }
        let args: [&OsStr; 2] = ["status".as_ref(), "--porcelain".as_ref()];
        match self.run(&args, dir)? {
            (Some(0), _) => Ok(true),
            (Some(NOT_A_REPO), _) => Ok(false),
            (code, stderr) => Err(self.unexpected(&args, code, stderr)),
        }
    }

    fn is_ignored(&self, path: &Path, cwd: &Path) -> Result<bool> {
        // `path` may be relative to our own cwd, which differs from `cwd`
        let path = std::path::absolute(path)?;
        // --no-index: tracked files are still reported if a pattern matches them
        let args: [&OsStr; 4] = [
            "check-ignore".as_ref(),
            "--no-index".as_ref(),
            "-q".as_ref(),
            path.as_os_str(),
        ];
        match self.run(&args, cwd)? {
            (Some(0), _) => Ok(true),
            (Some(1), _) => Ok(false),
            (code, stderr) => Err(self.unexpected(&args, code, stderr)),
        }
    }
}

/// A discovered working tree and its repository-wide exclude rules.
struct Worktree {
    root: PathBuf,
    exclude: Gitignore,
}

/// In-process oracle backed by `git2` and the `ignore` crate.
///
/// Each directory's `.gitignore` is compiled once and cached. Rules are
/// evaluated from the deepest directory upwards; the first decisive match
/// wins, and `$GIT_DIR/info/exclude` is consulted last. A path inside an
/// ignored directory is itself ignored, and re-including a directory does
/// not re-include contents that an outer rule ignores. Global `core.excludesFile` rules
/// are not read.
#[derive(Default)]
pub struct NativeIgnore {
    worktrees: RefCell<HashMap<PathBuf, Rc<Worktree>>>,
    matchers: RefCell<HashMap<PathBuf, Rc<Gitignore>>>,
}

impl NativeIgnore {
    pub fn new() -> Self {
        Self::default()
    }

    fn worktree(&self, cwd: &Path) -> Result<Option<Rc<Worktree>>> {
        if let Some(tree) = self.worktrees.borrow().get(cwd) {
            return Ok(Some(Rc::clone(tree)));
        }

        let repo = match Repository::discover(cwd) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // Bare repositories have no working tree to list
        let Some(workdir) = repo.workdir() else {
            return Ok(None);
        };
        let root = workdir.canonicalize()?;
        let exclude = compile(&root, &repo.path().join("info").join("exclude"))?;
        debug!(root = %root.display(), "discovered working tree");

        let tree = Rc::new(Worktree { root, exclude });
        self.worktrees
            .borrow_mut()
            .insert(cwd.to_path_buf(), Rc::clone(&tree));
        Ok(Some(tree))
    }

    fn matcher(&self, dir: &Path) -> Result<Rc<Gitignore>> {
        if let Some(matcher) = self.matchers.borrow().get(dir) {
            return Ok(Rc::clone(matcher));
        }
        let matcher = Rc::new(compile(dir, &dir.join(".gitignore"))?);
        self.matchers
            .borrow_mut()
            .insert(dir.to_path_buf(), Rc::clone(&matcher));
        Ok(matcher)
    }

    /// Match `path` itself against the `.gitignore` files from its parent up to
    /// the working-tree root, deepest first, then `info/exclude`.
    fn excluded(&self, tree: &Worktree, path: &Path, is_dir: bool) -> Result<bool> {
        let Some(parent) = path.parent() else {
            return Ok(false);
        };
        for dir in parent.ancestors() {
            if !dir.starts_with(&tree.root) {
                break;
            }
            match self.matcher(dir)?.matched(path, is_dir) {
                Match::Ignore(_) => return Ok(true),
                Match::Whitelist(_) => return Ok(false),
                Match::None => {}
            }
        }
        Ok(tree.exclude.matched(path, is_dir).is_ignore())
    }
}

impl IgnoreOracle for NativeIgnore {
    fn is_repo(&self, dir: &Path) -> Result<bool> {
        if !dir.is_dir() {
            return Ok(false);
        }
        Ok(self.worktree(dir)?.is_some())
    }

    fn is_ignored(&self, path: &Path, cwd: &Path) -> Result<bool> {
        let tree = self
            .worktree(cwd)?
            .ok_or_else(|| Error::NotRepo(cwd.to_path_buf()))?;

        let path = canonicalize_parent(&std::path::absolute(path)?)?;
        if path == tree.root {
            return Ok(false);
        }
        if !path.starts_with(&tree.root) {
            return Err(Error::NotRepo(path));
        }
        let is_dir = path.is_dir();

        // An ignored directory hides everything below it, whatever deeper
        // rules say about the contents
        let mut dir = tree.root.clone();
        if let Some(parent) = path.parent() {
            for component in parent.strip_prefix(&tree.root).unwrap_or(Path::new("")) {
                dir.push(component);
                if self.excluded(&tree, &dir, true)? {
                    return Ok(true);
                }
            }
        }
        self.excluded(&tree, &path, is_dir)
    }
}

/// Compile the ignore file at `file` (if any) with patterns anchored at `root`.
fn compile(root: &Path, file: &Path) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    if file.is_file() {
        if let Some(err) = builder.add(file) {
            warn!(file = %file.display(), error = %err, "skipping invalid ignore patterns");
        }
    }
    Ok(builder.build()?)
}

/// Canonicalize the containing directory but keep the final component as is,
/// so a symlink is judged by its own name rather than its target's.
fn canonicalize_parent(path: &Path) -> Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            Ok(parent.canonicalize()?.join(name))
        }
        _ => Ok(path.canonicalize()?),
    }
}
