// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Opaque payload blobs carried alongside resource indirections.
//!
//! A payload's structure belongs to whatever factory interprets it; the
//! entity system only stores, clones and compares payloads byte-for-byte.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// An immutable, cheaply clonable byte blob.
///
/// Equality is byte equality, which is what makes repeated
/// resource-attribute updates with an unchanged payload idempotent.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    /// Creates an empty payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the payload.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Starts reading the payload from its first byte.
    pub fn reader(&self) -> PayloadReader<'_> {
        PayloadReader {
            bytes: &self.0,
            pos: 0,
        }
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

/// Errors raised while decoding a payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload ended before the requested value was complete.
    #[error("payload ended at byte {at} while reading {wanted}")]
    UnexpectedEnd {
        /// Offset at which reading stopped.
        at: usize,
        /// Name of the value being read.
        wanted: &'static str,
    },
    /// A string field was not valid UTF-8.
    #[error("payload string at byte {at} is not valid UTF-8")]
    InvalidString {
        /// Offset of the string's first byte.
        at: usize,
    },
}

/// A little-endian cursor over a [`Payload`].
#[derive(Debug)]
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn take(&mut self, n: usize, wanted: &'static str) -> Result<&'a [u8], PayloadError> {
        let bytes: &'a [u8] = self.bytes;
        let end = self.pos + n;
        let slice = bytes.get(self.pos..end).ok_or(PayloadError::UnexpectedEnd {
            at: self.pos,
            wanted,
        })?;
        self.pos = end;
        Ok(slice)
    }

    /// Reads an unsigned byte.
    pub fn uint8(&mut self) -> Result<u8, PayloadError> {
        Ok(self.take(1, "uint8")?[0])
    }

    /// Reads a little-endian `u16`.
    pub fn uint16(&mut self) -> Result<u16, PayloadError> {
        let b = self.take(2, "uint16")?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a little-endian `i32`.
    pub fn int32(&mut self) -> Result<i32, PayloadError> {
        let b = self.take(4, "int32")?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian `f32`.
    pub fn float32(&mut self) -> Result<f32, PayloadError> {
        let b = self.take(4, "float32")?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a NUL-terminated UTF-8 string.
    pub fn string(&mut self) -> Result<&'a str, PayloadError> {
        let bytes: &'a [u8] = self.bytes;
        let start = self.pos;
        let rest = &bytes[start..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(PayloadError::UnexpectedEnd {
                at: bytes.len(),
                wanted: "string terminator",
            })?;
        self.pos = start + len + 1;
        std::str::from_utf8(&rest[..len]).map_err(|_| PayloadError::InvalidString { at: start })
    }

    /// Returns `true` once every byte has been consumed.
    pub fn eom(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}
