use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::writer::WriteError;

/// Staging file path for a target: the target with `~` appended.
/// 目標檔案對應的暫存檔路徑，即在檔名後附加 `~`。
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push("~");
    PathBuf::from(name)
}

/// Backup file path for a target: `<stem>.backup.<extension>` when the target
/// carries an extension, `<target>.backup` otherwise.
/// 目標檔案對應的備份檔路徑。
///
/// After a crash, a backup file next to a missing or stale target means the
/// previous state lives in the backup; restoring it is the caller's
/// responsibility, this module never does it automatically.
pub fn backup_path(target: &Path) -> PathBuf {
    match target.extension().and_then(|ext| ext.to_str()) {
        Some(extension) => target.with_extension(format!("backup.{extension}")),
        None => target.with_extension("backup"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommitState {
    /// The staging file holds the new serialized document.
    Staged,
    /// The original target has been renamed to the backup path.
    BackedUp,
    /// The staging file has been renamed over the target.
    Promoted,
    /// Promotion failed and the backup was renamed back to the target.
    RolledBack,
}

/// The commit window of a durable write, one rename per transition.
/// 持久寫入的提交階段，每次狀態轉移只執行一次 rename。
///
/// Until [`Commit::back_up`] succeeds the original file is untouched; between
/// back-up and promotion the previous state is always recoverable from the
/// backup path.
#[derive(Debug)]
pub(crate) struct Commit {
    target: PathBuf,
    staging: PathBuf,
    backup: PathBuf,
    state: CommitState,
}

impl Commit {
    pub(crate) fn new(target: &Path, staging: PathBuf) -> Self {
        Self {
            backup: backup_path(target),
            target: target.to_path_buf(),
            staging,
            state: CommitState::Staged,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> CommitState {
        self.state
    }

    /// Runs the full protocol: discard a stale backup, back up the current
    /// target if present, promote the staging file, then clean up — rolling
    /// back on a failed promotion.
    pub(crate) fn run(mut self) -> Result<(), WriteError> {
        self.discard_stale_backup();

        if self.target.is_file() {
            self.back_up().map_err(|source| WriteError::Backup {
                path: self.target.clone(),
                source,
            })?;
            match self.promote() {
                Ok(()) => {
                    self.discard_backup();
                    Ok(())
                }
                Err(source) => {
                    let rolled_back = self.roll_back().is_ok();
                    Err(WriteError::Promote {
                        path: self.target.clone(),
                        rolled_back,
                        source,
                    })
                }
            }
        } else {
            // First-ever write: nothing to back up or roll back.
            self.promote().map_err(|source| WriteError::Promote {
                path: self.target.clone(),
                rolled_back: false,
                source,
            })
        }
    }

    // Leftover from a previous interrupted run. Removal is best effort; a
    // blocked backup path surfaces as a back-up or promotion failure later.
    fn discard_stale_backup(&self) {
        if self.backup.is_file() {
            let _ = fs::remove_file(&self.backup);
        }
    }

    pub(crate) fn back_up(&mut self) -> io::Result<()> {
        fs::rename(&self.target, &self.backup)?;
        self.state = CommitState::BackedUp;
        Ok(())
    }

    pub(crate) fn promote(&mut self) -> io::Result<()> {
        fs::rename(&self.staging, &self.target)?;
        self.state = CommitState::Promoted;
        Ok(())
    }

    pub(crate) fn roll_back(&mut self) -> io::Result<()> {
        fs::rename(&self.backup, &self.target)?;
        self.state = CommitState::RolledBack;
        Ok(())
    }

    fn discard_backup(&self) {
        let _ = fs::remove_file(&self.backup);
    }
}
