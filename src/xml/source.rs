//! Document text sources.

use std::fs::File;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

use super::XmlDocument;
use crate::util::{Error, Result};

/// Backing storage of a document's text.
/// Supports both memory-mapped and buffered I/O modes.
pub struct XmlSource {
    inner: SourceInner,
    name: String,
}

enum SourceInner {
    /// Memory-mapped file (preferred for large libraries)
    #[cfg(feature = "mmap")]
    Mmap(Mmap),
    /// Text held in memory
    Owned(Vec<u8>),
}

impl XmlSource {
    /// Wrap text that is already in memory.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            inner: SourceInner::Owned(text.into().into_bytes()),
            name: name.into(),
        }
    }

    /// Open a file for reading with memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open a file with optional memory mapping.
    ///
    /// Without the `mmap` feature the file is always read into memory.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let size = file.metadata()?.len();
        let name = path.display().to_string();

        #[cfg(feature = "mmap")]
        if use_mmap && size > 0 {
            // Safety: the file is opened read-only and the map is never written through.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            tracing::trace!(path = %name, size, "mapped document");
            return Ok(Self { inner: SourceInner::Mmap(mmap), name });
        }
        #[cfg(not(feature = "mmap"))]
        let _ = use_mmap;

        let mut buf = Vec::with_capacity(size as usize);
        file.read_to_end(&mut buf)?;
        tracing::trace!(path = %name, size, "read document");
        Ok(Self { inner: SourceInner::Owned(buf), name })
    }

    /// File path or caller-supplied name of the document.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the text is memory-mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        match &self.inner {
            #[cfg(feature = "mmap")]
            SourceInner::Mmap(_) => true,
            SourceInner::Owned(_) => false,
        }
    }

    /// Raw bytes of the document.
    pub fn bytes(&self) -> &[u8] {
        match &self.inner {
            #[cfg(feature = "mmap")]
            SourceInner::Mmap(mmap) => &mmap[..],
            SourceInner::Owned(buf) => buf.as_slice(),
        }
    }

    /// Document text, validated as UTF-8. A leading byte-order mark is skipped.
    pub fn text(&self) -> Result<&str> {
        let text = std::str::from_utf8(self.bytes())?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
    }

    /// Parse the document.
    pub fn parse(&self) -> Result<XmlDocument<'_>> {
        XmlDocument::parse(self.text()?)
    }
}
