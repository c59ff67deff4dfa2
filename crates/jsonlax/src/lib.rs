//! Permissive, taint-tracking JSON parsing and structural JSON writing.
//!
//! The parser never rejects malformed input: it decodes a best-effort
//! [`Value`] tree and flags any deviation from strict JSON grammar with a
//! single *taint* bit. The writer walks any value implementing the [`Emit`]
//! capability and renders JSON text, inlining small flat containers and
//! indenting everything else.
//!
//! ```
//! use jsonlax::{Value, WriterConfig, Writer, parse};
//!
//! // Strict input: untainted.
//! let parsed = parse(r#"{"a": 1, "b": [1, 2, 3]}"#).unwrap();
//! assert!(!parsed.tainted);
//!
//! // Sloppy input: decoded anyway, but flagged.
//! let parsed = parse(r#"{'a': 1, "b": [1, 2, 3,],}"#).unwrap();
//! assert!(parsed.tainted);
//! assert_eq!(parsed.value.as_object().unwrap().len(), 2);
//!
//! // Writing back produces canonical text.
//! let writer = Writer::new(WriterConfig::default());
//! assert_eq!(
//!     writer.write(&parsed.value),
//!     r#"{ "a": 1, "b": [ 1, 2, 3 ] }"#
//! );
//! ```

mod cursor;
mod error;
mod parser;
mod shape;
mod value;
mod writer;

#[cfg(test)]
mod tests;

pub use cursor::{Cursor, END};
pub use error::NumberError;
pub use parser::{MAX_DEPTH, Parsed, Parser, parse};
pub use shape::{Field, FieldKind, FieldValue, Record, Shape, best_match, populate};
pub use value::{Array, Map, Value};
pub use writer::{Emit, Emitted, Writer, WriterConfig, write};
