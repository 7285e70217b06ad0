use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Write};

use crate::field::{Field, FieldKind, FieldType};
use crate::value::Value;

/// Returns `bytes` up to, not including, the first NUL.
pub(crate) fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// A fixed-capacity, NUL-terminated text buffer of `N` bytes.
///
/// At most `N - 1` bytes of content are stored so the buffer always keeps a
/// terminating NUL; longer input is truncated. Bytes after the terminator are
/// kept zeroed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    pub const fn zeroed() -> Self {
        Self { buf: [0; N] }
    }

    /// Creates a buffer holding `text`, truncated to `N - 1` bytes.
    pub fn new(text: &str) -> Self {
        let mut s = Self::zeroed();
        s.set(text.as_bytes());
        s
    }

    /// Replaces the content, returning the number of bytes kept.
    ///
    /// Input is cut at its first NUL, then at `N - 1` bytes.
    pub fn set(&mut self, bytes: &[u8]) -> usize {
        let bytes = until_nul(bytes);
        let len = bytes.len().min(N.saturating_sub(1));
        self.buf = [0; N];
        self.buf[..len].copy_from_slice(&bytes[..len]);
        len
    }

    /// Content bytes before the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        until_nul(&self.buf)
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// The whole buffer, terminator and padding included.
    pub fn raw(&self) -> &[u8; N] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.first().map_or(true, |&b| b == 0)
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl<const N: usize> From<&str> for FixedStr<N> {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<'a, const N: usize> From<&'a FixedStr<N>> for Value<'a> {
    fn from(s: &'a FixedStr<N>) -> Self {
        Value::Text(s.as_bytes())
    }
}

impl<const N: usize> Field for FixedStr<N> {
    fn kind(&self) -> FieldKind {
        <Self as FieldType>::KIND
    }

    fn value(&self) -> Value<'_> {
        Value::Text(self.as_bytes())
    }

    fn assign(&mut self, value: &Value<'_>) -> bool {
        match value.as_text() {
            Some(bytes) => {
                self.set(bytes);
                true
            }
            None => false,
        }
    }

    fn encode(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(&self.buf)
    }

    fn decode(&mut self, input: &mut dyn Read) -> io::Result<()> {
        input.read_exact(&mut self.buf)
    }
}

impl<const N: usize> FieldType for FixedStr<N> {
    const KIND: FieldKind = FieldKind::Text { capacity: N };
}
