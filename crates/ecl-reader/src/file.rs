use std::{
    fs::{self, File},
    io::{self, Read, Seek},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::{debug, trace};

use crate::{
    array::{self, EclArray},
    error::{EclError, Result},
    formatted,
    record::{PosReader, HEADER_LEN},
    types::ElementType,
};

/// Default read buffer for [`EclFile::open`].
pub const DEFAULT_READ_BUF: usize = 1 << 20;

/// One catalog entry, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEntry {
    pub name: String,
    pub element_type: ElementType,
    pub element_count: usize,
    /// Offset of the first data record (binary) or first value token (formatted).
    pub data_offset: u64,
    /// Offset just past the array.
    pub end_offset: u64,
}

/// Selects an array by catalog position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayId<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for ArrayId<'_> {
    #[inline]
    fn from(i: usize) -> Self {
        ArrayId::Index(i)
    }
}

impl<'a> From<&'a str> for ArrayId<'a> {
    #[inline]
    fn from(name: &'a str) -> Self {
        ArrayId::Name(name)
    }
}

impl<'a> From<&'a String> for ArrayId<'a> {
    #[inline]
    fn from(name: &'a String) -> Self {
        ArrayId::Name(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Binary,
    Formatted,
}

/// Random-access reader over one ECLIPSE result file.
///
/// The catalog is built once by [`open`](Self::open) and never changes. Payloads
/// are read and decoded on each [`get`](Self::get); nothing is cached.
pub struct EclFile<R = File> {
    path: Option<PathBuf>,
    layout: Layout,
    entries: Vec<ArrayEntry>,
    by_name: FxHashMap<String, Vec<usize>>,
    source: Mutex<Option<PosReader<R>>>,
}

impl EclFile<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_capacity(path, DEFAULT_READ_BUF)
    }

    pub fn open_with_capacity(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| open_error(path, e))?;
        if !meta.is_file() {
            return Err(EclError::Access {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        let file = File::open(path).map_err(|e| open_error(path, e))?;

        let mut ecl = Self::from_reader_with_capacity(file, capacity)?;
        debug!(
            path = %path.display(),
            arrays = ecl.entries.len(),
            formatted = ecl.is_formatted(),
            "indexed ECLIPSE file"
        );
        ecl.path = Some(path.to_path_buf());
        Ok(ecl)
    }
}

fn open_error(path: &Path, e: io::Error) -> EclError {
    match e.kind() {
        io::ErrorKind::NotFound => EclError::NotFound(path.display().to_string()),
        _ => EclError::Access {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

impl<R: Read + Seek> EclFile<R> {
    pub fn from_reader(inner: R) -> Result<Self> {
        Self::from_reader_with_capacity(inner, DEFAULT_READ_BUF)
    }

    pub fn from_reader_with_capacity(inner: R, capacity: usize) -> Result<Self> {
        let mut src = PosReader::with_capacity(inner, capacity)?;
        let layout = sniff(&mut src)?;
        let entries = build_catalog(&mut src, layout)?;

        let mut by_name: FxHashMap<String, Vec<usize>> =
            FxHashMap::with_capacity_and_hasher(entries.len(), FxBuildHasher);
        for (i, e) in entries.iter().enumerate() {
            by_name.entry(e.name.clone()).or_default().push(i);
        }

        Ok(Self {
            path: None,
            layout,
            entries,
            by_name,
            source: Mutex::new(Some(src)),
        })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[inline]
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[inline]
    pub fn entries(&self) -> &[ArrayEntry] {
        &self.entries
    }

    /// Catalog indices of every array named `name`, in file order.
    pub fn occurrences(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn is_formatted(&self) -> bool {
        self.layout == Layout::Formatted
    }

    /// Catalog index for `id`. Names resolve to their first occurrence.
    pub fn resolve<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<usize> {
        match id.into() {
            ArrayId::Index(index) if index < self.entries.len() => Ok(index),
            ArrayId::Index(index) => Err(EclError::Range {
                index,
                count: self.entries.len(),
            }),
            ArrayId::Name(name) => self
                .occurrences(name)
                .first()
                .copied()
                .ok_or_else(|| EclError::NotFound(name.to_string())),
        }
    }

    pub fn entry<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<&ArrayEntry> {
        Ok(&self.entries[self.resolve(id)?])
    }

    /// Decode an array by position or name.
    pub fn get<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<EclArray> {
        let entry = self.entry(id)?;
        let mut guard = self.lock();
        let src = guard.as_mut().ok_or(EclError::Closed)?;

        match self.layout {
            Layout::Binary => {
                let bytes =
                    src.read_payload(entry.data_offset, entry.element_type, entry.element_count)?;
                array::decode(entry.element_type, entry.element_count, &bytes)
            }
            Layout::Formatted => formatted::read_values(
                src,
                entry.data_offset,
                entry.element_type,
                entry.element_count,
            ),
        }
    }

    /// Decode the `n`-th array called `name` (0-based).
    pub fn get_occurrence(&self, name: &str, n: usize) -> Result<EclArray> {
        let found = self.occurrences(name);
        if found.is_empty() {
            return Err(EclError::NotFound(name.to_string()));
        }
        let index = *found.get(n).ok_or(EclError::Range {
            index: n,
            count: found.len(),
        })?;
        self.get(index)
    }

    /// Reassembled payload bytes, uninterpreted.
    pub fn get_raw<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<Vec<u8>> {
        let entry = self.entry(id)?;
        if self.layout == Layout::Formatted {
            return Err(EclError::format(format!(
                "raw payload of {} requested from a formatted file",
                entry.name
            )));
        }
        let mut guard = self.lock();
        let src = guard.as_mut().ok_or(EclError::Closed)?;
        src.read_payload(entry.data_offset, entry.element_type, entry.element_count)
    }

    pub fn get_int<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<Vec<i32>> {
        let index = self.expect_type(id, "INTE", |t| t == ElementType::Int32)?;
        self.get(index)?
            .into_int32()
            .ok_or_else(|| self.mismatch(index, "INTE"))
    }

    pub fn get_real<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<Vec<f32>> {
        let index = self.expect_type(id, "REAL", |t| t == ElementType::Float32)?;
        self.get(index)?
            .into_float32()
            .ok_or_else(|| self.mismatch(index, "REAL"))
    }

    pub fn get_doub<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<Vec<f64>> {
        let index = self.expect_type(id, "DOUB", |t| t == ElementType::Float64)?;
        self.get(index)?
            .into_float64()
            .ok_or_else(|| self.mismatch(index, "DOUB"))
    }

    pub fn get_logi<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<Vec<bool>> {
        let index = self.expect_type(id, "LOGI", |t| t == ElementType::Bool)?;
        self.get(index)?
            .into_bool()
            .ok_or_else(|| self.mismatch(index, "LOGI"))
    }

    /// Strings of any width (`CHAR` or `C0nn`).
    pub fn get_char<'a>(&self, id: impl Into<ArrayId<'a>>) -> Result<Vec<String>> {
        let index = self.expect_type(id, "CHAR", |t| matches!(t, ElementType::FixedString(_)))?;
        self.get(index)?
            .into_strings()
            .ok_or_else(|| self.mismatch(index, "CHAR"))
    }

    fn expect_type<'a>(
        &self,
        id: impl Into<ArrayId<'a>>,
        expected: &'static str,
        accept: impl Fn(ElementType) -> bool,
    ) -> Result<usize> {
        let index = self.resolve(id)?;
        if accept(self.entries[index].element_type) {
            Ok(index)
        } else {
            Err(self.mismatch(index, expected))
        }
    }

    #[cold]
    fn mismatch(&self, index: usize, expected: &'static str) -> EclError {
        let entry = &self.entries[index];
        EclError::TypeMismatch {
            name: entry.name.clone(),
            expected,
            actual: entry.element_type,
        }
    }

    /// Release the underlying file. Further reads fail with [`EclError::Closed`].
    pub fn close(&self) {
        if self.lock().take().is_some() {
            trace!(path = ?self.path, "closed ECLIPSE file");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<PosReader<R>>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> std::fmt::Debug for EclFile<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EclFile")
            .field("path", &self.path)
            .field("layout", &self.layout)
            .field("arrays", &self.entries.len())
            .finish()
    }
}

fn sniff<R: Read + Seek>(src: &mut PosReader<R>) -> Result<Layout> {
    let mut head = [0u8; 4];
    let n = src.read_up_to(&mut head)?;
    src.seek(0)?;

    if n == 0 || (n == 4 && u32::from_be_bytes(head) == HEADER_LEN) {
        return Ok(Layout::Binary);
    }
    let layout = match formatted::starts_with_quote(src)? {
        Some(true) | None => Layout::Formatted,
        Some(false) => {
            return Err(EclError::format(
                "file starts with neither an array header record nor a formatted header",
            ))
        }
    };
    src.seek(0)?;
    Ok(layout)
}

fn build_catalog<R: Read + Seek>(src: &mut PosReader<R>, layout: Layout) -> Result<Vec<ArrayEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0u64;

    loop {
        let header = match layout {
            Layout::Binary => src.read_header(offset)?,
            Layout::Formatted => formatted::read_header(src, offset)?,
        };
        let Some((header, data_offset)) = header else {
            break;
        };

        let end_offset = match layout {
            Layout::Binary => {
                src.skip_payload(data_offset, header.element_type, header.element_count)?
            }
            Layout::Formatted => formatted::skip_values(
                src,
                data_offset,
                header.element_type,
                header.element_count,
            )?,
        };
        trace!(
            index = entries.len(),
            name = %header.name,
            ty = %header.element_type,
            count = header.element_count,
            offset,
            "array header"
        );

        entries.push(ArrayEntry {
            name: header.name,
            element_type: header.element_type,
            element_count: header.element_count,
            data_offset,
            end_offset,
        });
        offset = end_offset;
    }

    Ok(entries)
}
