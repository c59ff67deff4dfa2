//! Structural JSON writer.
//!
//! The writer walks any value that can describe itself through the [`Emit`]
//! capability and renders JSON text. Containers whose immediate children are
//! all primitive scalars ("leaf" containers) render inline when small enough;
//! everything else renders one member per line when indentation is enabled.
//!
//! The writer never fails: every [`Emitted`] shape has a rendering, and
//! self-referencing records are cut off by an identity check against the
//! chain of ancestor containers (the back-reference renders as `null`).

use std::borrow::Cow;
use std::fmt::Write as _;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use time::{OffsetDateTime, UtcOffset, macros::format_description};
use uuid::Uuid;

use crate::value::Value;

/// Rendering options, constructed once and reused across writes.
///
/// # Examples
///
/// ```
/// use jsonlax::WriterConfig;
///
/// let config = WriterConfig {
///     indent: true,
///     ..WriterConfig::default()
/// };
/// assert_eq!(config.indent_chars, 4);
/// assert_eq!(config.indent_threshold, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterConfig {
    /// Whether to break containers across lines at all. When `false`,
    /// everything renders inline with `", "` separators.
    pub indent: bool,
    /// Indent with one tab per level instead of spaces.
    pub use_tab_for_indent: bool,
    /// Spaces per level when not using tabs.
    pub indent_chars: usize,
    /// Leaf containers with at most this many members render inline.
    pub indent_threshold: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: false,
            use_tab_for_indent: false,
            indent_chars: 4,
            indent_threshold: 3,
        }
    }
}

/// The classification of a value, as reported by [`Emit::emit`].
///
/// Variants are ordered the way the writer distinguishes them: primitives,
/// then date/time, then containers, then [`Record`] for class-like values
/// that enumerate named fields.
///
/// [`Record`]: Emitted::Record
pub enum Emitted<'a> {
    /// The JSON null, or an absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer of any width up to 64 bits.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A fixed-point decimal number.
    Decimal(Decimal),
    /// String content, borrowed or owned.
    Str(Cow<'a, str>),
    /// A date/time instant, rendered as a quoted ISO-8601 UTC string.
    Timestamp(OffsetDateTime),
    /// A sequence of values, rendered as a JSON array.
    Seq(Vec<&'a dyn Emit>),
    /// Ordered key/value pairs, rendered as a JSON object. Keys are
    /// stringified by the implementation and escaped by the writer.
    Map(Vec<(Cow<'a, str>, &'a dyn Emit)>),
    /// A class-like value enumerating its named readable fields, rendered as
    /// a JSON object with cycle defense.
    Record(Vec<(&'static str, &'a dyn Emit)>),
}

/// The structured-value capability the writer consumes.
///
/// Any host value can be written as JSON by describing itself as an
/// [`Emitted`]. The enumeration must be consistent across calls for a given
/// value's shape.
///
/// # Examples
///
/// ```
/// use jsonlax::{Emit, Emitted, write};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Emit for Point {
///     fn emit(&self) -> Emitted<'_> {
///         Emitted::Record(vec![("x", &self.x), ("y", &self.y)])
///     }
/// }
///
/// let text = write(&Point { x: 1, y: 2 });
/// assert_eq!(text, r#"{ "x": 1, "y": 2 }"#);
/// ```
pub trait Emit {
    /// Classifies `self` for rendering.
    fn emit(&self) -> Emitted<'_>;
}

/// Writes `value` as JSON text with the default configuration.
#[must_use]
pub fn write(value: &dyn Emit) -> String {
    Writer::default().write(value)
}

/// A JSON writer with a fixed configuration.
///
/// The rendering path is reentrant per call; a writer may be shared freely.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    /// Creates a writer with the given configuration.
    #[must_use]
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Renders `value` as JSON text.
    #[must_use]
    pub fn write(&self, value: &dyn Emit) -> String {
        let mut out = String::new();
        self.write_value(&mut out, value, None);
        out
    }

    fn write_value(&self, out: &mut String, value: &dyn Emit, ancestors: Option<&Ancestry<'_>>) {
        match value.emit() {
            Emitted::Null => out.push_str("null"),
            Emitted::Bool(b) => out.push_str(if b { "true" } else { "false" }),
            Emitted::Int(n) => {
                let _ = write!(out, "{n}");
            }
            Emitted::Float(n) => {
                let _ = write!(out, "{n}");
            }
            Emitted::Decimal(d) => {
                let _ = write!(out, "{d}");
            }
            Emitted::Str(s) => write_string(out, &s),
            Emitted::Timestamp(ts) => write_timestamp(out, ts),
            Emitted::Seq(items) => self.write_seq(out, value, &items, ancestors),
            Emitted::Map(entries) => self.write_map(out, value, &entries, ancestors),
            Emitted::Record(fields) => self.write_record(out, value, &fields, ancestors),
        }
    }

    fn write_seq(
        &self,
        out: &mut String,
        container: &dyn Emit,
        items: &[&dyn Emit],
        ancestors: Option<&Ancestry<'_>>,
    ) {
        if items.is_empty() {
            out.push_str("[ ]");
            return;
        }
        let leaf = items.iter().all(|item| is_scalar(&item.emit()));
        let broken = !leaf || items.len() > self.config.indent_threshold;
        let level = Ancestry::depth(ancestors);

        out.push_str("[ ");
        if broken {
            self.indent(out, level + 1);
        }
        let chain = Ancestry::link(container, ancestors);
        let mut first = true;
        for item in items {
            if !first {
                out.push_str(", ");
                if broken {
                    self.indent(out, level + 1);
                }
            }
            first = false;
            self.write_value(out, *item, Some(&chain));
        }
        if broken {
            self.indent(out, level);
        }
        out.push_str(" ]");
    }

    fn write_map(
        &self,
        out: &mut String,
        container: &dyn Emit,
        entries: &[(Cow<'_, str>, &dyn Emit)],
        ancestors: Option<&Ancestry<'_>>,
    ) {
        if entries.is_empty() {
            out.push_str("{ }");
            return;
        }
        let leaf = entries.iter().all(|(_, value)| is_scalar(&value.emit()));
        let broken = !leaf || entries.len() > self.config.indent_threshold;
        let level = Ancestry::depth(ancestors);

        out.push_str("{ ");
        if broken {
            self.indent(out, level + 1);
        }
        let chain = Ancestry::link(container, ancestors);
        let mut first = true;
        for (key, value) in entries {
            if !first {
                out.push_str(", ");
                if broken {
                    self.indent(out, level + 1);
                }
            }
            first = false;
            write_string(out, key);
            out.push_str(": ");
            self.write_value(out, *value, Some(&chain));
        }
        if broken {
            self.indent(out, level);
        }
        out.push_str(" }");
    }

    fn write_record(
        &self,
        out: &mut String,
        container: &dyn Emit,
        fields: &[(&'static str, &dyn Emit)],
        ancestors: Option<&Ancestry<'_>>,
    ) {
        if fields.is_empty() {
            out.push_str("{ }");
            return;
        }
        let leaf = fields.iter().all(|(_, value)| is_scalar(&value.emit()));
        let broken = !leaf || fields.len() > self.config.indent_threshold;
        let level = Ancestry::depth(ancestors);

        out.push_str("{ ");
        if broken {
            self.indent(out, level + 1);
        }
        let chain = Ancestry::link(container, ancestors);
        let mut first = true;
        for (name, value) in fields {
            if !first {
                out.push_str(", ");
                if broken {
                    self.indent(out, level + 1);
                }
            }
            first = false;
            write_string(out, name);
            out.push_str(": ");
            // A field referring back to the record or any enclosing
            // container would recurse forever; the back-reference renders
            // as null.
            if Ancestry::contains(Some(&chain), *value) {
                out.push_str("null");
            } else {
                self.write_value(out, *value, Some(&chain));
            }
        }
        if broken {
            self.indent(out, level);
        }
        out.push_str(" }");
    }

    fn indent(&self, out: &mut String, level: usize) {
        if !self.config.indent {
            return;
        }
        out.push('\n');
        if self.config.use_tab_for_indent {
            for _ in 0..level {
                out.push('\t');
            }
        } else {
            for _ in 0..level * self.config.indent_chars {
                out.push(' ');
            }
        }
    }
}

/// Whether an emitted value is a primitive scalar for leaf detection.
/// Date/time values are quoted strings in the output but count as
/// non-scalar, forcing their container onto multiple lines.
fn is_scalar(emitted: &Emitted<'_>) -> bool {
    matches!(
        emitted,
        Emitted::Null
            | Emitted::Bool(_)
            | Emitted::Int(_)
            | Emitted::Float(_)
            | Emitted::Decimal(_)
            | Emitted::Str(_)
    )
}

/// One frame of the rendering recursion: the container being rendered,
/// linked to the frames above it on the call stack.
///
/// Record fields are checked against the chain by full pointer identity,
/// data address and vtable together. The address alone is not enough: a
/// record's first field lives at the record's own address, and only the
/// vtable tells the field apart from the record holding it.
struct Ancestry<'a> {
    container: &'a dyn Emit,
    depth: usize,
    parent: Option<&'a Ancestry<'a>>,
}

impl<'a> Ancestry<'a> {
    fn link(container: &'a dyn Emit, parent: Option<&'a Ancestry<'a>>) -> Self {
        Self {
            container,
            depth: Ancestry::depth(parent) + 1,
            parent,
        }
    }

    fn depth(chain: Option<&Ancestry<'_>>) -> usize {
        chain.map_or(0, |node| node.depth)
    }

    fn contains(chain: Option<&Ancestry<'_>>, value: &dyn Emit) -> bool {
        let mut node = chain;
        while let Some(current) = node {
            if std::ptr::eq(
                std::ptr::from_ref(current.container),
                std::ptr::from_ref(value),
            ) {
                return true;
            }
            node = current.parent;
        }
        false
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            // `/` is escaped even though JSON does not require it.
            '/' => out.push_str("\\/"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 32 || (c as u32) >= 127 => {
                // One `\uXXXX` per UTF-16 code unit; characters outside the
                // BMP become a surrogate pair.
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04X}");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_timestamp(out: &mut String, ts: OffsetDateTime) {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    out.push('"');
    if let Ok(text) = ts.to_offset(UtcOffset::UTC).format(format) {
        out.push_str(&text);
    }
    out.push('"');
}

impl Emit for Value {
    fn emit(&self) -> Emitted<'_> {
        match self {
            Value::Null => Emitted::Null,
            Value::Bool(b) => Emitted::Bool(*b),
            Value::Int(n) => Emitted::Int(i64::from(*n)),
            Value::Double(n) => Emitted::Float(*n),
            Value::Decimal(d) => Emitted::Decimal(*d),
            Value::String(s) => Emitted::Str(Cow::Borrowed(s)),
            Value::Array(items) => Emitted::Seq(items.iter().map(as_emit).collect()),
            Value::Object(map) => Emitted::Map(
                map.iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn Emit))
                    .collect(),
            ),
        }
    }
}

fn as_emit<T: Emit>(value: &T) -> &dyn Emit {
    value
}

macro_rules! emit_int {
    ($($t:ty),* $(,)?) => {
        $(impl Emit for $t {
            fn emit(&self) -> Emitted<'_> {
                Emitted::Int(i64::from(*self))
            }
        })*
    };
}

emit_int!(i8, i16, i32, i64, u8, u16, u32);

impl Emit for f32 {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Float(f64::from(*self))
    }
}

impl Emit for f64 {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Float(*self)
    }
}

impl Emit for bool {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Bool(*self)
    }
}

impl Emit for str {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Str(Cow::Borrowed(self))
    }
}

impl<T: Emit + ?Sized> Emit for &T {
    fn emit(&self) -> Emitted<'_> {
        (**self).emit()
    }
}

impl Emit for String {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Str(Cow::Borrowed(self))
    }
}

impl Emit for Decimal {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Decimal(*self)
    }
}

impl Emit for OffsetDateTime {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Timestamp(*self)
    }
}

impl Emit for Uuid {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Str(Cow::Owned(self.to_string()))
    }
}

impl<T: Emit> Emit for Option<T> {
    fn emit(&self) -> Emitted<'_> {
        match self {
            Some(value) => value.emit(),
            None => Emitted::Null,
        }
    }
}

impl<T: Emit> Emit for Vec<T> {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Seq(self.iter().map(as_emit).collect())
    }
}

impl<T: Emit> Emit for [T] {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Seq(self.iter().map(as_emit).collect())
    }
}

impl<T: Emit> Emit for IndexMap<String, T> {
    fn emit(&self) -> Emitted<'_> {
        Emitted::Map(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn Emit))
                .collect(),
        )
    }
}
