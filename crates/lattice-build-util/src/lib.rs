//! Build-time workspace queries shared across lattice tooling.
//!
//! Lattice build trees follow a `root/src/<module>` layout, and tooling is
//! pointed at one or more roots through `LATTICE_PATH`, a colon-separated
//! list. These helpers answer the two questions build scripts ask: which
//! root contains a given module, and which root encloses a given working
//! directory. Nothing here is used by the node daemon itself.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming the workspace search roots.
pub const SEARCH_ROOTS_ENV: &str = "LATTICE_PATH";

/// Errors raised by workspace-root queries.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No configured root contains the module.
    #[error("module '{module}' not found under any search root")]
    ModuleNotFound {
        /// Module path that was searched for.
        module: String,
    },
    /// No configured root encloses the directory.
    #[error("directory '{dir}' is not inside any search root")]
    RootNotFound {
        /// Directory that was probed.
        dir: PathBuf,
    },
    /// Probing a candidate path failed.
    #[error("failed to inspect '{path}': {source}")]
    Probe {
        /// Path that could not be inspected.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered list of workspace search roots.
///
/// # Examples
/// ```
/// use lattice_build_util::SearchRoots;
///
/// let roots = SearchRoots::parse("/srv/lattice:/home/dev/lattice");
/// assert_eq!(roots.iter().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots(Vec<PathBuf>);

impl SearchRoots {
    /// Parses a colon-separated root list, preserving order.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let roots = list
            .split(':')
            .filter(|entry| !entry.is_empty())
            .map(|entry| normalise(Path::new(entry)))
            .collect();
        Self(roots)
    }

    /// Reads the root list from [`SEARCH_ROOTS_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        env::var(SEARCH_ROOTS_ENV)
            .map(|list| Self::parse(&list))
            .unwrap_or_else(|_| Self(Vec::new()))
    }

    /// Iterates the roots in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    /// Finds the first root whose `src` tree contains `module`, returning
    /// that root's `src` directory.
    ///
    /// Roots are consulted in configured order; only genuine probe failures
    /// abort the search early.
    pub fn find_module(&self, module: &str) -> Result<PathBuf, WorkspaceError> {
        for root in &self.0 {
            let candidate = root.join("src").join(module);
            match candidate.metadata() {
                Ok(metadata) if metadata.is_dir() => return Ok(root.join("src")),
                Ok(_) => continue,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(WorkspaceError::Probe {
                        path: candidate,
                        source,
                    });
                }
            }
        }
        Err(WorkspaceError::ModuleNotFound {
            module: module.to_owned(),
        })
    }

    /// Finds the root whose `src` tree encloses `dir`.
    ///
    /// When roots nest, the most specific (longest) root wins, so a checkout
    /// inside another root's tree still resolves to its own root.
    pub fn enclosing_root(&self, dir: &Path) -> Result<PathBuf, WorkspaceError> {
        let dir = normalise(dir);
        let mut ordered: Vec<&PathBuf> = self.0.iter().collect();
        ordered.sort_by(|a, b| {
            let (a, b) = (a.as_os_str().len(), b.as_os_str().len());
            b.cmp(&a)
        });
        for root in ordered {
            if dir.starts_with(root.join("src")) {
                return Ok(root.clone());
            }
        }
        Err(WorkspaceError::RootNotFound { dir })
    }
}

/// Resolves the root enclosing the current working directory, using the
/// roots configured in the environment.
pub fn working_root() -> Result<PathBuf, WorkspaceError> {
    let cwd = env::current_dir().map_err(|source| WorkspaceError::Probe {
        path: PathBuf::from("."),
        source,
    })?;
    SearchRoots::from_env().enclosing_root(&cwd)
}

/// Strips redundant trailing separators without touching the filesystem.
fn normalise(path: &Path) -> PathBuf {
    path.components().collect()
}
