//! Backup/restore bracket around the shared template source.
//!
//! [`TemplateGuard::acquire`] parks a copy of the template at the backup path and remembers its pristine content.
//! The template is put back either by [`TemplateGuard::restore`] (which reports failures) or, if the guard is
//! dropped without that call (early return, panic), by `Drop`, which logs failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use super::interfaces::HarnessError;

/// Exclusive hold on the template file for the duration of a batch.
#[derive(Debug)]
pub struct TemplateGuard {
    template: PathBuf,
    backup: PathBuf,
    pristine: Vec<u8>,
    released: bool,
}

impl TemplateGuard {
    /// Copy `template` to `backup` and capture its raw bytes.
    ///
    /// Nothing has been mutated when this fails, so there is nothing to restore.
    pub fn acquire(template: &Path, backup: &Path) -> Result<Self, HarnessError> {
        let backup_err = |source: io::Error| HarnessError::Backup {
            template: template.to_path_buf(),
            backup: backup.to_path_buf(),
            source,
        };

        let pristine = fs::read(template).map_err(backup_err)?;
        fs::copy(template, backup).map_err(backup_err)?;
        debug!(template = %template.display(), backup = %backup.display(), "template backed up");

        Ok(Self {
            template: template.to_path_buf(),
            backup: backup.to_path_buf(),
            pristine,
            released: false,
        })
    }

    /// Content of the template as it was when the guard was acquired.
    pub fn pristine(&self) -> &[u8] {
        &self.pristine
    }

    /// Overwrite the template in place.
    pub fn write(&self, content: &[u8]) -> Result<(), HarnessError> {
        fs::write(&self.template, content).map_err(|source| HarnessError::TemplateWrite {
            path: self.template.clone(),
            source,
        })
    }

    /// Move the backup back over the template and release the guard.
    pub fn restore(mut self) -> Result<(), HarnessError> {
        self.released = true;
        move_back(&self.backup, &self.template).map_err(|source| HarnessError::Restore {
            template: self.template.clone(),
            backup: self.backup.clone(),
            source,
        })?;
        debug!(template = %self.template.display(), "template restored");
        Ok(())
    }
}

impl Drop for TemplateGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match move_back(&self.backup, &self.template) {
            Ok(()) => warn!(template = %self.template.display(), "template restored after an aborted batch"),
            Err(e) => error!(
                template = %self.template.display(),
                backup = %self.backup.display(),
                error = %e,
                "failed to restore template after an aborted batch"
            ),
        }
    }
}

/// Rename `backup` onto `template`, falling back to copy + remove across filesystems.
fn move_back(backup: &Path, template: &Path) -> io::Result<()> {
    if fs::rename(backup, template).is_ok() {
        return Ok(());
    }
    fs::copy(backup, template)?;
    fs::remove_file(backup)
}
