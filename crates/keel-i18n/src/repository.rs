//! Directory scanning for locale-tagged resource trees.
//!
//! Layout convention, multi-locale mode:
//!
//! ```text
//! base/
//!   en/        <- locale-tagged subdirectory
//!     msg.txt
//!     img/logo.png
//!   ro/
//!     msg.txt
//!     img/logo.png
//! ```
//!
//! Each locale subdirectory is expected to carry the same relative file
//! set. Single-locale mode omits the locale level: the base directory's
//! files are the resource set and carry no locale.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use keel_util::{files, strings};
use tracing::{debug, warn};

use crate::{I18nError, Locale};

/// A scanned file bound to the locale directory it came from.
///
/// Immutable; produced only by [`I18nRepository::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nFile {
    path: PathBuf,
    relative: PathBuf,
    locale: Option<Locale>,
}

impl I18nFile {
    /// Full filesystem path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the locale directory (or the base, in
    /// single-locale mode). Identical across locales for the same
    /// resource.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Relative path as a `/`-separated name, the pool-friendly key.
    #[must_use]
    pub fn relative_name(&self) -> String {
        let parts: Vec<String> = self
            .relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        parts.join("/")
    }

    /// The locale this file belongs to, absent in single-locale mode.
    #[must_use]
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Single,
    Multi,
}

/// Scanner for a locale-tagged resource directory.
///
/// # Example
///
/// ```no_run
/// use keel_i18n::I18nRepository;
///
/// let repo = I18nRepository::multi("assets/i18n").with_filter("*.txt");
/// for file in repo.scan().unwrap() {
///     println!("{:?} {}", file.locale(), file.relative_name());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct I18nRepository {
    base: PathBuf,
    layout: Layout,
    filter: Option<String>,
}

impl I18nRepository {
    /// A repository whose base contains locale-named subdirectories.
    #[must_use]
    pub fn multi(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            layout: Layout::Multi,
            filter: None,
        }
    }

    /// A repository with no locale level; all files are locale-less.
    #[must_use]
    pub fn single(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            layout: Layout::Single,
            filter: None,
        }
    }

    /// Restrict the scan to file names matching a wildcard pattern
    /// (`*`/`?`, matched against the file name only).
    #[must_use]
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Scan the directory tree.
    ///
    /// Multi mode: every immediate subdirectory whose name parses as a
    /// locale contributes its recursive file set; subdirectories with
    /// non-locale names are skipped with a warning; plain files directly
    /// in the base are ignored. Single mode: the recursive file set of the
    /// base itself.
    pub fn scan(&self) -> Result<Vec<I18nFile>, I18nError> {
        let mut out = Vec::new();
        match self.layout {
            Layout::Single => {
                self.collect(&self.base, None, &mut out)?;
            }
            Layout::Multi => {
                for (dir, locale) in self.locale_dirs()? {
                    self.collect(&dir, Some(locale), &mut out)?;
                }
            }
        }
        debug!(
            base = %self.base.display(),
            files = out.len(),
            "i18n repository scanned"
        );
        Ok(out)
    }

    /// The locales present, sorted by tag. Empty in single mode.
    pub fn locales(&self) -> Result<Vec<Locale>, I18nError> {
        match self.layout {
            Layout::Single => Ok(Vec::new()),
            Layout::Multi => {
                let mut locales: Vec<Locale> =
                    self.locale_dirs()?.into_iter().map(|(_, l)| l).collect();
                locales.sort();
                Ok(locales)
            }
        }
    }

    fn locale_dirs(&self) -> Result<Vec<(PathBuf, Locale)>, I18nError> {
        let entries = fs::read_dir(&self.base).map_err(|source| self.io_error(source))?;
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| self.io_error(source))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = files::base_name(&path) else {
                continue;
            };
            match Locale::parse(name) {
                Ok(locale) => dirs.push((path, locale)),
                Err(_) => {
                    warn!(directory = name, "skipping non-locale directory");
                }
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn collect(
        &self,
        dir: &Path,
        locale: Option<Locale>,
        out: &mut Vec<I18nFile>,
    ) -> Result<(), I18nError> {
        let paths = files::walk_files(dir).map_err(|source| I18nError::Io {
            path: dir.to_owned(),
            source,
        })?;
        for path in paths {
            if let Some(pattern) = &self.filter {
                let matches = files::base_name(&path)
                    .is_some_and(|name| strings::wildcard_match(pattern, name));
                if !matches {
                    continue;
                }
            }
            // walk_files only yields paths under dir.
            let relative = path
                .strip_prefix(dir)
                .map(Path::to_owned)
                .unwrap_or_else(|_| path.clone());
            out.push(I18nFile {
                path,
                relative,
                locale: locale.clone(),
            });
        }
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> I18nError {
        I18nError::Io {
            path: self.base.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn single_mode_has_no_locales() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"));
        touch(&dir.path().join("nested/b.txt"));

        let repo = I18nRepository::single(dir.path());
        assert!(repo.locales().unwrap().is_empty());

        let scanned = repo.scan().unwrap();
        assert_eq!(scanned.len(), 2);
        assert!(scanned.iter().all(|f| f.locale().is_none()));
        let names: Vec<String> = scanned.iter().map(I18nFile::relative_name).collect();
        assert_eq!(names, vec!["a.txt", "nested/b.txt"]);
    }

    #[test]
    fn filter_matches_file_name_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("keep.txt"));
        touch(&dir.path().join("drop.png"));

        let repo = I18nRepository::single(dir.path()).with_filter("*.txt");
        let scanned = repo.scan().unwrap();
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].relative_name(), "keep.txt");
    }

    #[test]
    fn missing_base_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = I18nRepository::multi(dir.path().join("nope"));
        assert!(matches!(repo.scan(), Err(I18nError::Io { .. })));
    }
}
