//! Filter-safe staging of encoder inputs.
//!
//! ffmpeg filter arguments need several layers of escaping for arbitrary
//! file names. Instead of escaping, the input is renamed to a fixed safe
//! name next to the original for the duration of one encode and renamed
//! back afterwards.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Stem of the temporary name given to a staged input.
pub const STAGED_STEM: &str = "ENCODING";

/// An input file temporarily moved to a filter-safe name.
///
/// The original name is restored when the value is dropped, whether or not
/// the encode succeeded.
///
/// # Example
///
/// ```no_run
/// use hardsub_av::StagedInput;
///
/// let staged = StagedInput::new("/media/anime", "[Grp] Show - 01 [1080p].mkv")?;
/// assert_eq!(staged.file_name(), "ENCODING.mkv");
/// // run ffmpeg against staged.file_name() inside /media/anime
/// staged.restore()?;
/// # Ok::<(), hardsub_av::Error>(())
/// ```
#[derive(Debug)]
pub struct StagedInput {
    original: PathBuf,
    staged: PathBuf,
    file_name: String,
    restored: bool,
}

impl StagedInput {
    /// Move `dir/file_name` to `dir/ENCODING.<ext>`.
    pub fn new(dir: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let original = dir.join(file_name);
        let staged_name = staged_name_for(file_name);
        let staged = dir.join(&staged_name);

        if staged.exists() {
            return Err(Error::staging(
                &original,
                format!("{} already exists", staged.display()),
            ));
        }

        std::fs::rename(&original, &staged)
            .map_err(|e| Error::staging(&original, format!("rename failed: {}", e)))?;

        tracing::debug!("Staged {:?} as {:?}", original, staged);

        Ok(Self {
            original,
            staged,
            file_name: staged_name,
            restored: false,
        })
    }

    /// The staged file name, relative to the input directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the staged file.
    pub fn path(&self) -> &Path {
        &self.staged
    }

    /// Move the file back to its original name.
    pub fn restore(mut self) -> Result<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        std::fs::rename(&self.staged, &self.original)
            .map_err(|e| Error::staging(&self.original, format!("restore failed: {}", e)))
    }
}

impl Drop for StagedInput {
    fn drop(&mut self) {
        if let Err(e) = self.restore_inner() {
            tracing::error!("{}", e);
        }
    }
}

/// `ENCODING` plus the original extension, if any.
fn staged_name_for(file_name: &str) -> String {
    match Path::new(file_name).extension() {
        Some(ext) => format!("{}.{}", STAGED_STEM, ext.to_string_lossy()),
        None => STAGED_STEM.to_string(),
    }
}
