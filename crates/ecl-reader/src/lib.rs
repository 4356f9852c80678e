//! Reader for ECLIPSE result files (INIT, UNRST, SMSPEC, ...)
//!
//! A file is an ordered sequence of named, typed arrays. Opening a file scans it
//! once and records where every array lives; payloads are only read and decoded
//! when asked for, by position or by name. Both the unformatted (big-endian,
//! length-marked records) and the formatted (ASCII) renditions are understood.

pub mod array;
pub mod error;
pub mod file;
mod formatted;
pub mod record;
pub mod types;

pub use array::EclArray;
pub use error::{EclError, Result};
pub use file::{ArrayEntry, ArrayId, EclFile, DEFAULT_READ_BUF};
pub use types::ElementType;
