//! Regeneration driver.
//!
//! One run compares the model against the snapshot left by the previous run,
//! purges the generated code of everything that changed (removal pass over
//! the previous model), then regenerates the current model into the same
//! fragment stores (generation pass). Every file is read at most once and
//! written or deleted at most once.

pub mod class_file;
pub mod table_file;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::context::ServiceContext;
use crate::error::{GenError, Result};
use crate::fragments::parser;
use crate::fragments::FragmentMap;
use crate::model::diff::{mark_modified, DiffSummary};
use crate::model::{snapshot, ClassModel, Clazz};

pub use class_file::ClassFileGenerator;
pub use table_file::TableFileGenerator;

/// Produces one kind of output file per class.
pub trait FileGenerator {
    /// Name of the snapshot file kept next to the generated package.
    fn snapshot_file_name(&self) -> &str;

    /// Path of the file generated for `clazz`.
    fn file_path(&self, model: &ClassModel, clazz: &Clazz) -> PathBuf;

    /// Upserts every fragment generated for `clazz` into `fragments`.
    ///
    /// Elements flagged as modified are force-removed instead.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    fn generate(
        &self,
        ctx: &ServiceContext,
        model: &ClassModel,
        clazz: &Clazz,
        fragments: &mut FragmentMap,
    ) -> Result<()>;
}

/// A file that could not be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Path of the failing file.
    pub path: PathBuf,
    /// What went wrong.
    pub message: String,
}

/// Outcome of one [`Regenerator::run`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files whose text changed and was written.
    pub written: Vec<PathBuf>,
    /// Files regenerated to exactly their previous text.
    pub unchanged: Vec<PathBuf>,
    /// Files deleted because their class was purged and nothing remained.
    pub deleted: Vec<PathBuf>,
    /// Files that failed; siblings are unaffected.
    pub failures: Vec<FileFailure>,
    /// Elements of the previous model that were purged.
    pub diff: DiffSummary,
    /// Whether the snapshot for the next run was saved.
    pub snapshot_saved: bool,
}

impl GenerationReport {
    /// Returns `true` if every file and the snapshot were handled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.snapshot_saved
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.written {
            writeln!(f, "wrote {}", path.display())?;
        }
        for path in &self.deleted {
            writeln!(f, "deleted {}", path.display())?;
        }
        for failure in &self.failures {
            writeln!(f, "failed {}: {}", failure.path.display(), failure.message)?;
        }
        write!(
            f,
            "{} written, {} unchanged, {} deleted, {} failed",
            self.written.len(),
            self.unchanged.len(),
            self.deleted.len(),
            self.failures.len()
        )
    }
}

/// A file loaded for this run.
struct OpenFile {
    fragments: FragmentMap,
    original: String,
    existed: bool,
    purge: bool,
}

/// Drives one [`FileGenerator`] over a model.
pub struct Regenerator<'a> {
    ctx: &'a ServiceContext,
    generator: Box<dyn FileGenerator + 'a>,
}

impl<'a> Regenerator<'a> {
    /// Creates a driver for `generator`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, generator: Box<dyn FileGenerator + 'a>) -> Self {
        Self { ctx, generator }
    }

    /// Path of the snapshot this driver reads and writes for `model`.
    #[must_use]
    pub fn snapshot_path(&self, model: &ClassModel) -> PathBuf {
        snapshot::snapshot_path(model, self.generator.snapshot_file_name())
    }

    /// Brings the generated files in line with `current`.
    ///
    /// Never fails as a whole: per-file problems are collected in the report
    /// and the remaining files are still processed. The snapshot is only
    /// replaced when every file succeeded, so a failed purge is retried on
    /// the next run.
    pub fn run(&self, current: &ClassModel) -> GenerationReport {
        let snapshot_path = self.snapshot_path(current);
        let mut report = GenerationReport::default();
        let mut files: BTreeMap<PathBuf, OpenFile> = BTreeMap::new();
        let mut failed: BTreeMap<PathBuf, String> = BTreeMap::new();

        if let Some(mut previous) = snapshot::load(self.ctx, &snapshot_path) {
            report.diff = mark_modified(&mut previous, current);
            debug!(marked = report.diff.marked.len(), "removal pass");
            for clazz in &previous.classes {
                let path = self.apply(&previous, clazz, &mut files, &mut failed);
                if let Some(file) = files.get_mut(&path) {
                    // An already deleted empty class must not come back as a shell.
                    file.purge |= clazz.modified || (clazz.is_empty() && !file.existed);
                }
            }
            // Fragments inserted above still carry their leading indentation.
            // Reparsing moves it into the gaps, as if the file came from disk.
            for file in files.values_mut() {
                file.fragments = parser::parse(&file.fragments.render());
            }
        }

        debug!(classes = current.classes.len(), "generation pass");
        for clazz in &current.classes {
            self.apply(current, clazz, &mut files, &mut failed);
        }

        for (path, file) in files {
            if let Err(err) = self.finish_file(&path, &file, &mut report) {
                failed.insert(path, err.to_string());
            }
        }
        report.failures =
            failed.into_iter().map(|(path, message)| FileFailure { path, message }).collect();

        if report.failures.is_empty() {
            match snapshot::save(self.ctx, &snapshot_path, current) {
                Ok(()) => report.snapshot_saved = true,
                Err(err) => {
                    warn!(path = %snapshot_path.display(), error = %err, "could not save snapshot");
                    report.failures.push(FileFailure { path: snapshot_path, message: err.to_string() });
                }
            }
        } else {
            warn!(failed = report.failures.len(), "snapshot kept so the next run retries");
        }
        report
    }

    /// Runs the generator for one class into its cached store.
    fn apply(
        &self,
        model: &ClassModel,
        clazz: &Clazz,
        files: &mut BTreeMap<PathBuf, OpenFile>,
        failed: &mut BTreeMap<PathBuf, String>,
    ) -> PathBuf {
        let path = self.generator.file_path(model, clazz);
        if failed.contains_key(&path) {
            return path;
        }

        if !files.contains_key(&path) {
            match self.open(&path) {
                Ok(file) => {
                    files.insert(path.clone(), file);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "could not read existing file");
                    failed.insert(path.clone(), err.to_string());
                    return path;
                }
            }
        }

        if let Some(file) = files.get_mut(&path) {
            if let Err(err) = self.generator.generate(self.ctx, model, clazz, &mut file.fragments) {
                warn!(path = %path.display(), error = %err, "generation failed");
                files.remove(&path);
                failed.insert(path.clone(), err.to_string());
            }
        }
        path
    }

    fn open(&self, path: &Path) -> Result<OpenFile> {
        let existed = self.ctx.fs.exists(path);
        let fragments = parser::parse_file(self.ctx, path)?;
        let original = fragments.render();
        Ok(OpenFile { fragments, original, existed, purge: false })
    }

    fn finish_file(&self, path: &Path, file: &OpenFile, report: &mut GenerationReport) -> Result<()> {
        if file.purge && file.fragments.is_class_body_empty() {
            if self.ctx.fs.exists(path) {
                self.ctx.fs.remove_file(path).map_err(|e| GenError::fs(path, e.as_ref()))?;
                info!(path = %path.display(), "deleted empty file");
                report.deleted.push(path.to_path_buf());
            }
            return Ok(());
        }

        let text = file.fragments.render();
        if text == file.original {
            debug!(path = %path.display(), "unchanged");
            report.unchanged.push(path.to_path_buf());
            return Ok(());
        }
        self.ctx.fs.write(path, &text).map_err(|e| GenError::fs(path, e.as_ref()))?;
        info!(path = %path.display(), "wrote file");
        report.written.push(path.to_path_buf());
        Ok(())
    }
}

/// Upper-cases the first character, as in `name` → `Name`.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
