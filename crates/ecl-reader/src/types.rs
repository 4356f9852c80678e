use std::fmt;

/// Largest number of numeric elements ECLIPSE places in one data record.
pub const MAX_BLOCK_NUMERIC: usize = 1000;

/// Largest number of string elements ECLIPSE places in one data record.
pub const MAX_BLOCK_CHAR: usize = 105;

/// Declared element type of an array, as carried by the 4-byte type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `INTE`
    Int32,
    /// `REAL`
    Float32,
    /// `DOUB`
    Float64,
    /// `LOGI`
    Bool,
    /// `CHAR` (width 8) or `C0nn` (width nn)
    FixedString(u8),
    /// `MESS`, never followed by data records
    Message,
}

impl ElementType {
    /// Parse a header type tag. Returns `None` for tags this format does not define.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"INTE" => Some(ElementType::Int32),
            b"REAL" => Some(ElementType::Float32),
            b"DOUB" => Some(ElementType::Float64),
            b"LOGI" => Some(ElementType::Bool),
            b"CHAR" => Some(ElementType::FixedString(8)),
            b"MESS" => Some(ElementType::Message),
            [b'C', b'0', hi, lo] if hi.is_ascii_digit() && lo.is_ascii_digit() => {
                let width = (hi - b'0') * 10 + (lo - b'0');
                (width > 0).then_some(ElementType::FixedString(width))
            }
            _ => None,
        }
    }

    /// On-disk tag. Width-8 strings are always written as `CHAR`.
    pub fn tag(&self) -> [u8; 4] {
        match self {
            ElementType::Int32 => *b"INTE",
            ElementType::Float32 => *b"REAL",
            ElementType::Float64 => *b"DOUB",
            ElementType::Bool => *b"LOGI",
            ElementType::FixedString(8) => *b"CHAR",
            ElementType::FixedString(w) => [b'C', b'0', b'0' + w / 10, b'0' + w % 10],
            ElementType::Message => *b"MESS",
        }
    }

    /// Bytes per element on disk.
    #[inline]
    pub fn element_size(&self) -> usize {
        match self {
            ElementType::Int32 | ElementType::Float32 | ElementType::Bool => 4,
            ElementType::Float64 => 8,
            ElementType::FixedString(w) => *w as usize,
            ElementType::Message => 0,
        }
    }

    /// Elements per data record before the writer starts a new one.
    #[inline]
    pub fn max_block_elements(&self) -> usize {
        match self {
            ElementType::FixedString(_) => MAX_BLOCK_CHAR,
            ElementType::Message => 0,
            _ => MAX_BLOCK_NUMERIC,
        }
    }

    /// Total payload bytes owed by an array of `count` elements.
    #[inline]
    pub fn payload_len(&self, count: usize) -> u64 {
        self.element_size() as u64 * count as u64
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        f.write_str(std::str::from_utf8(&tag).unwrap_or("????"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(ElementType::from_tag(b"INTE"), Some(ElementType::Int32));
        assert_eq!(ElementType::from_tag(b"DOUB"), Some(ElementType::Float64));
        assert_eq!(ElementType::from_tag(b"CHAR"), Some(ElementType::FixedString(8)));
        assert_eq!(ElementType::from_tag(b"MESS"), Some(ElementType::Message));
    }

    #[test]
    fn test_c0nn_tags() {
        assert_eq!(ElementType::from_tag(b"C042"), Some(ElementType::FixedString(42)));
        assert_eq!(ElementType::from_tag(b"C000"), None);
        assert_eq!(ElementType::from_tag(b"C0X1"), None);
        assert_eq!(&ElementType::FixedString(42).tag(), b"C042");
        assert_eq!(&ElementType::FixedString(8).tag(), b"CHAR");
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(ElementType::from_tag(b"XXXX"), None);
        assert_eq!(ElementType::from_tag(b"inte"), None);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(ElementType::Float64.payload_len(1000), 8000);
        assert_eq!(ElementType::FixedString(8).max_block_elements(), 105);
        assert_eq!(ElementType::Message.payload_len(10), 0);
        assert_eq!(ElementType::Float32.to_string(), "REAL");
    }
}
