//! Record codec for the ECLIPSE unformatted layout.
//!
//! Every physical record is `[u32 BE len][len bytes][u32 BE len]`. An array is one
//! 16-byte header record followed by as many data records as its payload needs.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};

use crate::{
    array::EclArray,
    error::{EclError, Result},
    types::ElementType,
};

/// Payload length of an array header record: name(8) + count(4) + tag(4).
pub const HEADER_LEN: u32 = 16;

const MARKER_LEN: u64 = 4;

const MIN_READ_BUF: usize = 16;

/// Decoded array header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub element_type: ElementType,
    pub element_count: usize,
}

impl Header {
    /// `MESS` arrays carry no data, so any nonzero count is rejected.
    pub(crate) fn new(name: String, element_type: ElementType, element_count: usize) -> Result<Self> {
        if element_type == ElementType::Message && element_count != 0 {
            return Err(EclError::format(format!(
                "message array {name} declares {element_count} elements"
            )));
        }
        Ok(Header {
            name,
            element_type,
            element_count,
        })
    }
}

/// Location of one data record's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub data_offset: u64,
    pub len: u32,
}

/// Buffered reader that tracks its absolute offset so repositioning can stay
/// inside the buffer.
pub struct PosReader<R> {
    inner: BufReader<R>,
    pos: u64,
}

impl<R: Read + Seek> PosReader<R> {
    pub fn with_capacity(mut inner: R, capacity: usize) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner: BufReader::with_capacity(capacity.max(MIN_READ_BUF), inner),
            pos: 0,
        })
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset != self.pos {
            self.inner.seek_relative(offset as i64 - self.pos as i64)?;
            self.pos = offset;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn skip(&mut self, n: u64) -> Result<()> {
        self.seek(self.pos + n)
    }

    /// Next byte without consuming it. `None` at end of input.
    #[inline]
    pub(crate) fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.inner.fill_buf()?.first().copied())
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.inner.consume(1);
        self.pos += 1;
    }

    /// Fill `buf` completely or fail; a short read is a truncated file.
    pub(crate) fn read_exact(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(e) => {
                let at = self.pos;
                self.resync()?;
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    Err(EclError::format(format!(
                        "file truncated in {what} at offset {at}"
                    )))
                } else {
                    Err(e.into())
                }
            }
        }
    }

    // A failed read leaves an unknown number of bytes consumed.
    fn resync(&mut self) -> Result<()> {
        self.pos = self.inner.stream_position()?;
        Ok(())
    }

    /// Reads up to `buf.len()` bytes, returning how many were available.
    pub(crate) fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.resync()?;
                    return Err(e.into());
                }
            }
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    #[inline]
    fn read_marker(&mut self, what: &str) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b, what)?;
        Ok(u32::from_be_bytes(b))
    }

    /// Leading marker of the next record, or `None` on a clean end of file.
    fn try_read_marker(&mut self) -> Result<Option<u32>> {
        let mut b = [0u8; 4];
        match self.read_up_to(&mut b)? {
            0 => Ok(None),
            4 => Ok(Some(u32::from_be_bytes(b))),
            n => Err(EclError::format(format!(
                "file truncated: {n} stray bytes at offset {}",
                self.pos - n as u64
            ))),
        }
    }

    /// Reads the header record at `offset`.
    ///
    /// Returns the header and the offset of its first data record, or `None`
    /// when `offset` is exactly the end of the file.
    pub fn read_header(&mut self, offset: u64) -> Result<Option<(Header, u64)>> {
        self.seek(offset)?;
        let Some(len) = self.try_read_marker()? else {
            return Ok(None);
        };
        if len != HEADER_LEN {
            return Err(EclError::format(format!(
                "record at offset {offset} has length {len}, expected an array header of {HEADER_LEN}"
            )));
        }

        let mut buf = [0u8; HEADER_LEN as usize];
        self.read_exact(&mut buf, "array header")?;
        let trailing = self.read_marker("array header")?;
        if trailing != len {
            return Err(EclError::format(format!(
                "array header at offset {offset}: leading length {len} != trailing length {trailing}"
            )));
        }

        let name = String::from_utf8_lossy(&buf[..8]).trim_end().to_string();
        let count = i32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let element_count = usize::try_from(count).map_err(|_| {
            EclError::format(format!("array {name} declares negative element count {count}"))
        })?;
        let element_type = ElementType::from_tag(&buf[12..16]).ok_or_else(|| {
            EclError::format(format!(
                "array {name} has unrecognised type tag {:?}",
                String::from_utf8_lossy(&buf[12..16])
            ))
        })?;

        let header = Header::new(name, element_type, element_count)?;
        Ok(Some((header, offset + 2 * MARKER_LEN + HEADER_LEN as u64)))
    }

    /// Walk the data records of one array starting at `start`.
    pub fn chunks(&mut self, start: u64, ty: ElementType, count: usize) -> Chunks<'_, R> {
        Chunks {
            rdr: self,
            next: start,
            remaining: ty.payload_len(count),
            width: ty.element_size() as u64,
            failed: false,
        }
    }

    /// Reassembles the full payload of an array.
    pub fn read_payload(&mut self, start: u64, ty: ElementType, count: usize) -> Result<Vec<u8>> {
        let layout = self
            .chunks(start, ty, count)
            .collect::<Result<Vec<Chunk>>>()?;

        let mut out = vec![0u8; ty.payload_len(count) as usize];
        let mut filled = 0;
        for chunk in layout {
            let end = filled + chunk.len as usize;
            self.seek(chunk.data_offset)?;
            self.read_exact(&mut out[filled..end], "data record")?;
            filled = end;
        }
        Ok(out)
    }

    /// Same walk as [`read_payload`](Self::read_payload) without keeping the bytes.
    /// Returns the offset just past the array.
    pub fn skip_payload(&mut self, start: u64, ty: ElementType, count: usize) -> Result<u64> {
        let mut chunks = self.chunks(start, ty, count);
        for chunk in chunks.by_ref() {
            chunk?;
        }
        Ok(chunks.end_offset())
    }
}

/// Iterator over the data records of one array.
///
/// Each item has had both length markers checked. Iteration stops once the
/// array's byte total is reached, or after the first error.
pub struct Chunks<'a, R> {
    rdr: &'a mut PosReader<R>,
    next: u64,
    remaining: u64,
    width: u64,
    failed: bool,
}

impl<R: Read + Seek> Chunks<'_, R> {
    /// Offset of the record following the last chunk walked so far.
    #[inline]
    pub fn end_offset(&self) -> u64 {
        self.next
    }

    fn step(&mut self) -> Result<Chunk> {
        let offset = self.next;
        self.rdr.seek(offset)?;
        let len = self.rdr.read_marker("data record")?;
        if len == 0 {
            return Err(EclError::format(format!(
                "empty data record at offset {offset} with {} bytes outstanding",
                self.remaining
            )));
        }
        if u64::from(len) > self.remaining {
            return Err(EclError::format(format!(
                "data record at offset {offset} holds {len} bytes, only {} expected",
                self.remaining
            )));
        }
        if u64::from(len) % self.width != 0 {
            return Err(EclError::format(format!(
                "data record at offset {offset} splits an element ({len} bytes, width {})",
                self.width
            )));
        }

        let data_offset = offset + MARKER_LEN;
        self.rdr.skip(u64::from(len))?;
        let trailing = self.rdr.read_marker("data record")?;
        if trailing != len {
            return Err(EclError::format(format!(
                "data record at offset {offset}: leading length {len} != trailing length {trailing}"
            )));
        }

        self.next = data_offset + u64::from(len) + MARKER_LEN;
        self.remaining -= u64::from(len);
        Ok(Chunk { data_offset, len })
    }
}

impl<R: Read + Seek> Iterator for Chunks<'_, R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        let res = self.step();
        self.failed = res.is_err();
        Some(res)
    }
}

/// Write one physical record.
pub fn write_record<W: Write>(w: &mut W, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len())
        .map_err(|_| EclError::format(format!("record of {} bytes", payload.len())))?;
    w.write_all(&len.to_be_bytes())?;
    w.write_all(payload)?;
    w.write_all(&len.to_be_bytes())?;
    Ok(())
}

/// Write an array header record.
pub fn write_header<W: Write>(w: &mut W, name: &str, ty: ElementType, count: usize) -> Result<()> {
    if name.len() > 8 {
        return Err(EclError::format(format!("array name {name:?} exceeds 8 bytes")));
    }
    if let ElementType::FixedString(width) = ty {
        if width == 0 || width > 99 {
            return Err(EclError::format(format!("string width {width} outside 1..=99")));
        }
    }
    let count = i32::try_from(count)
        .map_err(|_| EclError::format(format!("array {name} has too many elements ({count})")))?;

    let mut buf = [b' '; HEADER_LEN as usize];
    buf[..name.len()].copy_from_slice(name.as_bytes());
    buf[8..12].copy_from_slice(&count.to_be_bytes());
    buf[12..16].copy_from_slice(&ty.tag());
    write_record(w, &buf)
}

/// Write a complete array, splitting the payload at the per-type record maximum.
pub fn write_array<W: Write>(w: &mut W, name: &str, array: &EclArray) -> Result<()> {
    let ty = array.element_type();
    write_header(w, name, ty, array.len())?;

    let payload = array.encode()?;
    if payload.is_empty() {
        return Ok(());
    }
    let block = ty.max_block_elements() * ty.element_size();
    for chunk in payload.chunks(block) {
        write_record(w, chunk)?;
    }
    Ok(())
}
