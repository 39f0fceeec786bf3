//! JSON text conversion for the document tree.
//!
//! Serialization goes through `serde_json` with a configurable formatter:
//! pretty-printing with a chosen indent width, or compact output, optionally
//! escaping every non-ASCII character as `\uXXXX` units. Map keys are
//! always written in insertion order. Parsing preserves object key order
//! (via `serde_json`'s `preserve_order` feature).

use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

use crate::{Result, value::Value};

/// Output options for JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per indentation level; `None` writes compact output.
    pub indent: Option<usize>,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub escape_non_ascii: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            escape_non_ascii: false,
        }
    }
}

impl WriteOptions {
    /// Compact output without indentation or ASCII escaping.
    pub fn compact() -> Self {
        Self {
            indent: None,
            escape_non_ascii: false,
        }
    }
}

/// Serializes `value` to JSON text according to `options`.
///
/// Map keys appear in their insertion order.
pub fn to_json_string(value: &Value, options: &WriteOptions) -> Result<String> {
    let mut buf = Vec::new();
    match options.indent {
        Some(width) => {
            let indent = " ".repeat(width);
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            if options.escape_non_ascii {
                let mut ser =
                    Serializer::with_formatter(&mut buf, AsciiFormatter { inner: formatter });
                value.serialize(&mut ser)?;
            } else {
                let mut ser = Serializer::with_formatter(&mut buf, formatter);
                value.serialize(&mut ser)?;
            }
        }
        None => {
            if options.escape_non_ascii {
                let formatter = AsciiFormatter {
                    inner: CompactFormatter,
                };
                let mut ser = Serializer::with_formatter(&mut buf, formatter);
                value.serialize(&mut ser)?;
            } else {
                let mut ser = Serializer::new(&mut buf);
                value.serialize(&mut ser)?;
            }
        }
    }
    Ok(String::from_utf8(buf).expect("serializer emits valid UTF-8"))
}

/// Parses JSON text into a [`Value`], keeping object key order.
///
/// Syntax errors surface as [`Error::Json`](crate::Error::Json).
pub fn from_json_str(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    Ok(value)
}

/// Formatter wrapper that escapes non-ASCII characters as `\uXXXX`.
///
/// Structural output (indentation, separators) is delegated to the wrapped
/// formatter; only string fragments are rewritten. Astral characters are
/// written as UTF-16 surrogate pairs, matching the JSON escape grammar.
struct AsciiFormatter<F> {
    inner: F,
}

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            if start < i {
                writer.write_all(&bytes[start..i])?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        if start < bytes.len() {
            writer.write_all(&bytes[start..])?;
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}
