use crate::{
    error::{EclError, Result},
    types::ElementType,
};

/// Decoded contents of one array.
#[derive(Debug, Clone, PartialEq)]
pub enum EclArray {
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
    FixedString { width: u8, values: Vec<String> },
    Message,
}

impl EclArray {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            EclArray::Int32(v) => v.len(),
            EclArray::Float32(v) => v.len(),
            EclArray::Float64(v) => v.len(),
            EclArray::Bool(v) => v.len(),
            EclArray::FixedString { values, .. } => values.len(),
            EclArray::Message => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            EclArray::Int32(_) => ElementType::Int32,
            EclArray::Float32(_) => ElementType::Float32,
            EclArray::Float64(_) => ElementType::Float64,
            EclArray::Bool(_) => ElementType::Bool,
            EclArray::FixedString { width, .. } => ElementType::FixedString(*width),
            EclArray::Message => ElementType::Message,
        }
    }

    pub fn as_int32(&self) -> Option<&[i32]> {
        match self {
            EclArray::Int32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float32(&self) -> Option<&[f32]> {
        match self {
            EclArray::Float32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float64(&self) -> Option<&[f64]> {
        match self {
            EclArray::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match self {
            EclArray::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            EclArray::FixedString { values, .. } => Some(values),
            _ => None,
        }
    }

    pub fn into_int32(self) -> Option<Vec<i32>> {
        match self {
            EclArray::Int32(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_float32(self) -> Option<Vec<f32>> {
        match self {
            EclArray::Float32(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_float64(self) -> Option<Vec<f64>> {
        match self {
            EclArray::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<Vec<bool>> {
        match self {
            EclArray::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_strings(self) -> Option<Vec<String>> {
        match self {
            EclArray::FixedString { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Render element `i` as text, `None` past the end.
    pub fn render(&self, i: usize) -> Option<String> {
        match self {
            EclArray::Int32(v) => v.get(i).map(|x| x.to_string()),
            EclArray::Float32(v) => v.get(i).map(|x| x.to_string()),
            EclArray::Float64(v) => v.get(i).map(|x| x.to_string()),
            EclArray::Bool(v) => v.get(i).map(|x| if *x { "T" } else { "F" }.to_string()),
            EclArray::FixedString { values, .. } => values.get(i).cloned(),
            EclArray::Message => None,
        }
    }

    /// Big-endian on-disk bytes for every element, concatenated.
    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.element_type().payload_len(self.len()) as usize);
        match self {
            EclArray::Int32(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
            EclArray::Float32(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
            EclArray::Float64(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
            EclArray::Bool(v) => v
                .iter()
                .for_each(|x| out.extend_from_slice(&(if *x { -1i32 } else { 0 }).to_be_bytes())),
            EclArray::FixedString { width, values } => {
                let width = *width as usize;
                for s in values {
                    if s.len() > width {
                        return Err(EclError::format(format!(
                            "string {s:?} does not fit in {width} bytes"
                        )));
                    }
                    out.extend_from_slice(s.as_bytes());
                    out.resize(out.len() + width - s.len(), b' ');
                }
            }
            EclArray::Message => {}
        }
        Ok(out)
    }
}

/// Decode a reassembled payload into exactly `count` elements of `ty`.
pub(crate) fn decode(ty: ElementType, count: usize, bytes: &[u8]) -> Result<EclArray> {
    let expected = ty.payload_len(count);
    if bytes.len() as u64 != expected {
        return Err(EclError::format(format!(
            "{ty} array of {count} elements needs {expected} bytes, payload has {}",
            bytes.len()
        )));
    }

    let array = match ty {
        ElementType::Int32 => EclArray::Int32(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ElementType::Float32 => EclArray::Float32(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ElementType::Float64 => EclArray::Float64(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        ElementType::Bool => EclArray::Bool(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]) != 0)
                .collect(),
        ),
        ElementType::FixedString(width) => EclArray::FixedString {
            width,
            values: bytes
                .chunks_exact(width as usize)
                .map(|c| String::from_utf8_lossy(c).trim_end_matches(' ').to_string())
                .collect(),
        },
        ElementType::Message => EclArray::Message,
    };

    Ok(array)
}
