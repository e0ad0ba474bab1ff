//! Git CLI access
//!
//! Profiles are read from shallow, sparse clones made with the `git` binary.
//! Only the directories that are needed get checked out, which keeps large
//! profile repositories cheap to read.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use profilectl_core::GitRef;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::{RepoError, Result};

/// Builder for one `git` invocation
#[derive(Debug, Clone)]
pub struct GitCommand {
    binary: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl GitCommand {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Run inside `dir` using `git -C`
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn full_args(&self) -> Vec<String> {
        let mut full = Vec::with_capacity(self.args.len() + 2);
        if let Some(dir) = &self.current_dir {
            full.push("-C".to_string());
            full.push(dir.display().to_string());
        }
        full.extend(self.args.iter().cloned());
        full
    }

    /// Run the command, returning stdout on success
    pub fn execute(self) -> Result<String> {
        let args = self.full_args();
        tracing::debug!(target: "git", "Executing command: {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| RepoError::GitUnavailable {
                binary: self.binary.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(target: "git", "Command failed with exit code {:?}: {}", output.status.code(), stderr);
            return Err(RepoError::GitCommand {
                operation: self.args.first().cloned().unwrap_or_default(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// A checked-out repository tree
#[derive(Debug)]
pub enum Checkout {
    /// Temporary sparse clone, removed on drop
    Temporary(TempDir),
    /// Directory owned by someone else
    Local(PathBuf),
}

impl Checkout {
    pub fn root(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Local(path) => path,
        }
    }

    /// Absolute location of a repository path
    pub fn join(&self, repo_path: &str) -> PathBuf {
        if repo_path.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(repo_path)
        }
    }

    /// Copy the directory at `repo_path` to `dest`, returning the file count
    ///
    /// Git metadata is skipped.
    pub fn copy_out(&self, repo_path: &str, dest: &Path) -> Result<usize> {
        let src = self.join(repo_path);
        if !src.is_dir() {
            return Err(RepoError::PathNotFound {
                url: self.root().display().to_string(),
                path: repo_path.to_string(),
            });
        }

        let mut copied = 0;
        let walker = WalkDir::new(&src)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");
        for entry in walker {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(&src)
                .map_err(|e| RepoError::Io(std::io::Error::other(e)))?;
            let target = dest.join(relative);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

/// Something that can provide a working tree for a repository and ref
pub trait RepositoryCheckout {
    /// Check out `url` at `reference`, making at least `sparse_path` available
    fn checkout(&self, url: &str, reference: &GitRef, sparse_path: &str) -> Result<Checkout>;
}

/// Shallow sparse clone of `url` at `reference` into a temporary directory
///
/// Only top-level files and `sparse_path` are checked out. A ref that does not
/// exist upstream is reported as [`RepoError::RefNotFound`].
pub fn sparse_clone(git: &str, url: &str, reference: &GitRef, sparse_path: &str) -> Result<Checkout> {
    let dir = tempfile::Builder::new().prefix("profilectl-clone-").tempdir()?;
    let target = dir.path().display().to_string();

    let cloned = GitCommand::new(git)
        .args([
            "clone",
            "--depth",
            "1",
            "--filter=blob:none",
            "--sparse",
            "--branch",
            reference.name(),
        ])
        .arg(url)
        .arg(target)
        .execute();

    match cloned {
        Err(RepoError::GitCommand { stderr, .. }) if is_missing_ref(&stderr) => {
            return Err(RepoError::RefNotFound {
                url: url.to_string(),
                reference: reference.to_string(),
            });
        }
        Err(e) => return Err(e),
        Ok(_) => {}
    }

    if !sparse_path.is_empty() {
        GitCommand::new(git)
            .current_dir(dir.path())
            .args(["sparse-checkout", "set", sparse_path])
            .execute()?;
    }

    tracing::debug!(url, %reference, path = sparse_path, "Sparse clone ready");
    Ok(Checkout::Temporary(dir))
}

fn is_missing_ref(stderr: &str) -> bool {
    stderr.contains("not found in upstream") || stderr.contains("Could not find remote branch")
}
