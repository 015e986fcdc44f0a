use crate::{paths, Filesystem};
use crudgen_codegen::{build_context, render};
use crudgen_core::{ErrorCode, GeneratorError, Result, TableDefinition};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Options for [`Generator::generate`]. Extended by adding named fields,
/// never by accepting arbitrary keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Allow replacing files that already exist at a target path.
    pub overwrite: bool,
}

/// What committing a file would do (or did).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Create,
    Overwrite,
    /// Target already holds byte-identical content; the write is a no-op.
    Skip,
}

/// One resolved output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    pub action: FileAction,
}

/// Result of a preview run. Never touches the filesystem.
#[derive(Debug, Clone)]
pub struct Preview {
    pub table: TableDefinition,
    pub files: Vec<GeneratedFile>,
}

/// Result of a committed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// The generation service: sequences parse, context building, rendering,
/// path resolution, and (for [`Generator::generate`]) the all-or-nothing
/// write.
///
/// All collaborators are injected; there is no global state. Concurrent
/// calls for different modules share nothing but the per-path lock set,
/// which exists so two commits targeting the same path fail fast instead of
/// silently racing.
pub struct Generator {
    root: PathBuf,
    fs: Arc<dyn Filesystem>,
    locks: Mutex<HashSet<PathBuf>>,
}

impl Generator {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            root: root.into(),
            fs,
            locks: Mutex::new(HashSet::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs every stage except the write. The returned file contents are
    /// exactly what [`Generator::generate`] would commit for the same input.
    pub fn preview_sql(&self, sql: &str, module_name: &str) -> Result<Preview> {
        let (table, files) = self.plan(sql, module_name)?;
        Ok(Preview { table, files })
    }

    /// Runs the full pipeline and commits the files.
    ///
    /// Every target path is validated before anything is written: if any
    /// target exists and `overwrite` was not requested, the call fails with
    /// a FILE conflict and no file is touched. A write failure midway rolls
    /// back what was already written.
    pub fn generate(
        &self,
        sql: &str,
        module_name: &str,
        options: GenerateOptions,
    ) -> Result<Report> {
        let (_, files) = self.plan(sql, module_name)?;

        let targets: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();
        let _guard = self.lock_paths(&targets)?;

        // Conflict check runs under the lock so the answer cannot change
        // before the writes happen.
        for file in &files {
            if self.fs.exists(&file.path) && !options.overwrite {
                return Err(GeneratorError::with_message(
                    ErrorCode::TargetExists,
                    format!("target file `{}` already exists", file.path.display()),
                ));
            }
        }

        let mut journal: Vec<(PathBuf, Option<String>)> = Vec::new();
        match self.write_all(&files, &mut journal) {
            Ok(report) => Ok(report),
            Err(err) => {
                self.rollback(&journal);
                Err(err)
            }
        }
    }

    /// Parse, build context, render, resolve paths. Shared by preview and
    /// generate; pure except for read-only action classification.
    fn plan(&self, sql: &str, module_name: &str) -> Result<(TableDefinition, Vec<GeneratedFile>)> {
        let table = crudgen_sql::parse(sql)?;
        let ctx = build_context(&table, module_name)?;
        let rendered = render(&ctx)?;

        let mut files = Vec::with_capacity(rendered.len());
        for file in rendered {
            let path = paths::resolve(&self.root, &file.path)?;
            let action = if !self.fs.exists(&path) {
                FileAction::Create
            } else if self.fs.read(&path)? == file.content {
                FileAction::Skip
            } else {
                FileAction::Overwrite
            };
            files.push(GeneratedFile {
                path,
                content: file.content,
                action,
            });
        }

        Ok((table, files))
    }

    fn write_all(
        &self,
        files: &[GeneratedFile],
        journal: &mut Vec<(PathBuf, Option<String>)>,
    ) -> Result<Report> {
        let mut written = Vec::new();
        let mut skipped = Vec::new();

        for file in files {
            let prior = if self.fs.exists(&file.path) {
                Some(self.fs.read(&file.path)?)
            } else {
                None
            };

            if prior.as_deref() == Some(file.content.as_str()) {
                skipped.push(file.path.clone());
                continue;
            }

            self.fs.write(&file.path, &file.content)?;
            journal.push((file.path.clone(), prior));
            written.push(file.path.clone());
        }

        Ok(Report { written, skipped })
    }

    /// Best-effort restore of every journaled write, newest first. Files
    /// that did not exist before are removed, along with any directories
    /// created for them; `remove_dir` refuses non-empty directories, so
    /// anything that held files before the call survives.
    fn rollback(&self, journal: &[(PathBuf, Option<String>)]) {
        for (path, prior) in journal.iter().rev() {
            match prior {
                Some(content) => {
                    let _ = self.fs.write(path, content);
                }
                None => {
                    let _ = self.fs.remove(path);
                    self.remove_created_dirs(path);
                }
            }
        }
    }

    fn remove_created_dirs(&self, path: &Path) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir == self.root || !dir.starts_with(&self.root) {
                break;
            }
            if self.fs.remove_dir(dir).is_err() {
                break;
            }
            parent = dir.parent();
        }
    }

    fn lock_paths(&self, targets: &[PathBuf]) -> Result<PathLockGuard<'_>> {
        let mut held = self.held_locks();

        for target in targets {
            if held.contains(target) {
                return Err(GeneratorError::with_message(
                    ErrorCode::PathLocked,
                    format!(
                        "target path `{}` is locked by a concurrent generation",
                        target.display()
                    ),
                ));
            }
        }
        for target in targets {
            held.insert(target.clone());
        }

        Ok(PathLockGuard {
            locks: &self.locks,
            held: targets.to_vec(),
        })
    }

    fn held_locks(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Advisory locks over the target paths of one commit, released on drop.
struct PathLockGuard<'a> {
    locks: &'a Mutex<HashSet<PathBuf>>,
    held: Vec<PathBuf>,
}

impl Drop for PathLockGuard<'_> {
    fn drop(&mut self) {
        let mut set = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for path in &self.held {
            set.remove(path);
        }
    }
}
