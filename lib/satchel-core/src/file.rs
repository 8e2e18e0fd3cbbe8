//! File-like parameter values.
//!
//! Anything that has a name on disk (or pretends to) and can hand out its
//! complete contents qualifies as a file. The encoder never takes ownership
//! of the underlying resource and never closes it.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

/// Capability of a value that can be uploaded as a file.
pub trait FileLike: fmt::Debug + Send + Sync {
    /// Path (or bare name) of the file. Its last component becomes the
    /// `filename` of the multipart part.
    fn path(&self) -> &Path;

    /// Read the complete contents, always starting from the beginning.
    fn read_all(&self) -> std::io::Result<Bytes>;

    /// Last path component, used as the multipart `filename`.
    fn file_name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A file on the local filesystem, read fresh on every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Create a file source for the given path.
    ///
    /// The file is not opened until its contents are needed.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FileLike for LocalFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> std::io::Result<Bytes> {
        std::fs::read(&self.path).map(Bytes::from)
    }
}

/// An in-memory file with a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    path: PathBuf,
    data: Bytes,
}

impl MemoryFile {
    /// Create an in-memory file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

impl FileLike for MemoryFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> std::io::Result<Bytes> {
        Ok(self.data.clone())
    }
}

/// A seekable reader presented as a file.
///
/// The reader is rewound before every read, so encoding the same parameters
/// twice yields the same bytes.
pub struct ReaderFile<R> {
    path: PathBuf,
    reader: Mutex<R>,
}

impl<R> ReaderFile<R> {
    /// Wrap a reader under the given name.
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            reader: Mutex::new(reader),
        }
    }

    /// Give the reader back to the caller.
    pub fn into_inner(self) -> R {
        self.reader
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<R> fmt::Debug for ReaderFile<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<R> FileLike for ReaderFile<R>
where
    R: Read + Seek + Send,
{
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> std::io::Result<Bytes> {
        let mut reader = self
            .reader
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        reader.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }
}

/// A shared handle to a file-like value inside a parameter tree.
#[derive(Debug, Clone)]
pub struct FileValue(Arc<dyn FileLike>);

impl FileValue {
    /// Wrap any file-like source.
    pub fn new(file: impl FileLike + 'static) -> Self {
        Self(Arc::new(file))
    }

    /// A file on disk.
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::new(LocalFile::new(path))
    }

    /// An in-memory file.
    #[must_use]
    pub fn memory(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self::new(MemoryFile::new(path, data))
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Last path component.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.0.file_name()
    }

    /// Read the full contents from the start.
    pub fn read_all(&self) -> std::io::Result<Bytes> {
        self.0.read_all()
    }
}

impl From<Arc<dyn FileLike>> for FileValue {
    fn from(file: Arc<dyn FileLike>) -> Self {
        Self(file)
    }
}

impl PartialEq for FileValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
