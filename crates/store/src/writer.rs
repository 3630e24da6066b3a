use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use treedoc_model::TreeDocument;

use crate::charset::Charset;
use crate::commit::{staging_path, Commit};
use crate::fsutil::ensure_parent_dir;
use crate::serialize::serialize_document;

/// Errors emitted by [`DurableWriter::write`].
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("document has no usable root element")]
    InvalidDocument,
    #[error("unsupported charset label: {0}")]
    UnsupportedCharset(String),
    #[error("failed to prepare directory for {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to promote staged contents to {path} (rolled back: {rolled_back}): {source}")]
    Promote {
        path: PathBuf,
        rolled_back: bool,
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    /// Whether a staged write failed before touching the target.
    /// 判斷錯誤是否發生在目標檔案尚未被變更之前。
    ///
    /// Only [`WriteError::Promote`] happens after the original was moved
    /// aside; on that error the previous state is in the backup file unless
    /// `rolled_back` is true. Direct writes (`use_staging = false`) carry no
    /// such guarantee.
    pub fn target_intact(&self) -> bool {
        !matches!(self, WriteError::Promote { .. })
    }
}

/// Serialization and commit configuration. / 序列化與提交流程的設定。
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Write to a temporary sibling first and promote by rename. Disabling
    /// this collapses the protocol to a direct write with no crash safety.
    pub use_staging: bool,
    pub charset: Charset,
    pub indent_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            use_staging: true,
            charset: Charset::Utf8,
            indent_width: 4,
        }
    }
}

impl WriteOptions {
    /// Resolves a caller-supplied charset label into the options.
    pub fn charset_label(mut self, label: &str) -> Result<Self, WriteError> {
        self.charset = Charset::for_label(label)
            .ok_or_else(|| WriteError::UnsupportedCharset(label.to_string()))?;
        Ok(self)
    }
}

/// Persists a [`TreeDocument`] through the staging → backup → rename
/// protocol, so an abrupt termination never corrupts the previous on-disk
/// version. / 以「暫存、備份、改名」的流程寫入文件，中斷時不會破壞既有檔案。
///
/// Re-invoking [`DurableWriter::write`] after a failure is safe: the protocol
/// restarts from scratch and discards any stale staging or backup file.
/// Concurrent writers to the same path are not arbitrated; callers needing
/// that serialize access externally.
#[derive(Debug, Default)]
pub struct DurableWriter {
    options: WriteOptions,
}

impl DurableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serializes and commits the document to `path`.
    pub fn write(
        &self,
        document: &TreeDocument,
        path: impl AsRef<Path>,
    ) -> Result<(), WriteError> {
        let target = path.as_ref();
        if document.root().tag().is_empty() {
            return Err(WriteError::InvalidDocument);
        }

        let text = serialize_document(document, self.options.charset.name(), self.options.indent_width);
        let bytes = self.options.charset.encode(&text);

        ensure_parent_dir(target).map_err(|source| WriteError::CreateDir {
            path: target.to_path_buf(),
            source,
        })?;

        if !self.options.use_staging {
            // Lower-guarantee fast path: the direct write is the commit.
            return fs::write(target, &bytes).map_err(|source| WriteError::Write {
                path: target.to_path_buf(),
                source,
            });
        }

        let staging = staging_path(target);
        fs::write(&staging, &bytes).map_err(|source| WriteError::Write {
            path: staging.clone(),
            source,
        })?;

        Commit::new(target, staging).run()
    }
}
