//! Upload source abstraction.
//!
//! [`UploadSource`] lets callers hand the client a file path, an open async
//! reader, or an in-memory buffer. Exactly one source kind exists per value
//! by construction, which replaces a runtime both/neither check.

use std::path::{Path, PathBuf};

use tokio::io::AsyncRead;

/// A file to upload to remote temporary storage.
pub enum UploadSource {
    /// A file path on disk, opened and read when the upload starts.
    Path(PathBuf),

    /// In-memory bytes with an optional filename.
    Bytes {
        /// The payload.
        data: Vec<u8>,
        /// Optional original filename.
        filename: Option<String>,
    },

    /// An open async reader, drained when the upload starts.
    ///
    /// The reader is consumed by the upload; a source built from a reader
    /// cannot be reused after a failed request.
    Reader {
        /// The reader providing the data.
        reader: Box<dyn AsyncRead + Send + Unpin>,
        /// Optional filename.
        filename: Option<String>,
    },
}

impl std::fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes { data, filename } => f
                .debug_struct("Bytes")
                .field("data_len", &data.len())
                .field("filename", filename)
                .finish(),
            Self::Reader { filename, .. } => f
                .debug_struct("Reader")
                .field("filename", filename)
                .finish_non_exhaustive(),
        }
    }
}

impl UploadSource {
    /// Creates a source from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a source from in-memory bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            data: data.into(),
            filename: None,
        }
    }

    /// Creates a source from an open async reader.
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Reader {
            reader: Box::new(reader),
            filename: None,
        }
    }

    /// Sets the filename for bytes or reader sources.
    ///
    /// For path sources the name is derived from the path itself.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        match &mut self {
            Self::Bytes { filename: f, .. } | Self::Reader { filename: f, .. } => {
                *f = Some(filename.into())
            }
            Self::Path(_) => {}
        }
        self
    }

    /// Returns the filename, if known.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Path(path) => path.file_name().and_then(|n| n.to_str()),
            Self::Bytes { filename, .. } | Self::Reader { filename, .. } => filename.as_deref(),
        }
    }

    /// Returns the full path as a display name, falling back to the
    /// bare filename. Used as the default task name on submission.
    pub(crate) fn display_name(&self) -> Option<String> {
        match self {
            Self::Path(path) => Some(path.to_string_lossy().into_owned()),
            Self::Bytes { filename, .. } | Self::Reader { filename, .. } => filename.clone(),
        }
    }
}

impl From<PathBuf> for UploadSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for UploadSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for UploadSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for UploadSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for UploadSource {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl From<&[u8]> for UploadSource {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_source_names() {
        let source = UploadSource::from_path("/samples/dropper.exe");
        assert_eq!(source.filename(), Some("dropper.exe"));
        assert_eq!(source.display_name().as_deref(), Some("/samples/dropper.exe"));
    }

    #[test]
    fn bytes_source_filename() {
        let source = UploadSource::from_bytes(vec![1, 2, 3]).with_filename("blob.bin");
        assert_eq!(source.filename(), Some("blob.bin"));
    }

    #[test]
    fn filename_setter_ignored_for_paths() {
        let source = UploadSource::from_path("/a/b.exe").with_filename("other");
        assert_eq!(source.filename(), Some("b.exe"));
    }

    #[test]
    fn conversions() {
        let _: UploadSource = PathBuf::from("/x").into();
        let _: UploadSource = "/x".into();
        let _: UploadSource = String::from("/x").into();
        let _: UploadSource = vec![0u8; 4].into();
        let _: UploadSource = [0u8; 4].as_slice().into();
    }
}
