//! Best-fit record shapes for decoded objects.
//!
//! A [`Shape`] describes a record as an ordered list of named, typed fields.
//! Given a decoded object map and a set of candidate shapes, [`best_match`]
//! scores each candidate by field-name overlap and picks the winner;
//! [`populate`] then coerces the map into a concrete [`Record`]
//! implementation, skipping any field whose conversion fails.
//!
//! This layer is post-processing only. The parser never consults it; callers
//! apply it to [`Value::Object`] nodes after the parse.

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::value::{Map, Value};

/// The declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A boolean field.
    Bool,
    /// A 32-bit integer field.
    Int,
    /// A 64-bit integer field.
    Long,
    /// A double-precision float field.
    Double,
    /// A fixed-point decimal field.
    Decimal,
    /// A string field.
    String,
    /// A UUID field, decoded from its string form.
    Uuid,
    /// A date/time field, decoded from an RFC 3339 string.
    Timestamp,
}

/// A coerced field value, ready to assign to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A JSON null assigned to a nullable field.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 32-bit integer.
    Int(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A double-precision float.
    Double(f64),
    /// A fixed-point decimal.
    Decimal(Decimal),
    /// A string.
    String(String),
    /// A parsed UUID.
    Uuid(Uuid),
    /// A parsed timestamp.
    Timestamp(OffsetDateTime),
}

/// A named, typed field of a [`Shape`].
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    nullable: bool,
}

impl Field {
    /// Creates a field that rejects JSON null.
    #[must_use]
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    /// Creates a field that accepts JSON null.
    #[must_use]
    pub fn nullable(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }

    /// The field's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's declared kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether JSON null is accepted.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Converts a decoded value to this field's declared type.
    ///
    /// Integers widen to the longer numeric kinds; doubles round half to
    /// even into `Long` and convert to and from `Decimal`; strings convert
    /// to identifier-like kinds (UUID, RFC 3339 timestamp); null passes
    /// through for nullable fields. `None` means the conversion failed and
    /// the field should keep its default.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coerce(&self, value: &Value) -> Option<FieldValue> {
        if value.is_null() {
            return self.nullable.then_some(FieldValue::Null);
        }
        match (self.kind, value) {
            (FieldKind::Bool, Value::Bool(b)) => Some(FieldValue::Bool(*b)),
            (FieldKind::Int, Value::Int(n)) => Some(FieldValue::Int(*n)),
            (FieldKind::Long, Value::Int(n)) => Some(FieldValue::Long(i64::from(*n))),
            (FieldKind::Long, Value::Double(n)) => {
                let rounded = n.round_ties_even();
                (rounded >= -9_223_372_036_854_775_808.0
                    && rounded < 9_223_372_036_854_775_808.0)
                    .then(|| FieldValue::Long(rounded as i64))
            }
            (FieldKind::Double, Value::Int(n)) => Some(FieldValue::Double(f64::from(*n))),
            (FieldKind::Double, Value::Double(n)) => Some(FieldValue::Double(*n)),
            (FieldKind::Double, Value::Decimal(d)) => d.to_f64().map(FieldValue::Double),
            (FieldKind::Decimal, Value::Int(n)) => Some(FieldValue::Decimal(Decimal::from(*n))),
            (FieldKind::Decimal, Value::Double(n)) => {
                Decimal::from_f64(*n).map(FieldValue::Decimal)
            }
            (FieldKind::Decimal, Value::Decimal(d)) => Some(FieldValue::Decimal(*d)),
            (FieldKind::String, Value::String(s)) => Some(FieldValue::String(s.clone())),
            (FieldKind::String, Value::Bool(b)) => Some(FieldValue::String(b.to_string())),
            (FieldKind::String, Value::Int(n)) => Some(FieldValue::String(n.to_string())),
            (FieldKind::String, Value::Double(n)) => Some(FieldValue::String(n.to_string())),
            (FieldKind::String, Value::Decimal(d)) => Some(FieldValue::String(d.to_string())),
            (FieldKind::Uuid, Value::String(s)) => {
                Uuid::parse_str(s).ok().map(FieldValue::Uuid)
            }
            (FieldKind::Timestamp, Value::String(s)) => OffsetDateTime::parse(s, &Rfc3339)
                .ok()
                .map(FieldValue::Timestamp),
            _ => None,
        }
    }
}

/// An ordered record-shape descriptor.
///
/// # Examples
///
/// ```
/// use jsonlax::{FieldKind, Shape};
///
/// let shape = Shape::new("Person")
///     .field("name", FieldKind::String)
///     .field("age", FieldKind::Int);
/// assert_eq!(shape.fields().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Shape {
    name: &'static str,
    fields: Vec<Field>,
}

impl Shape {
    /// Creates a shape named `name` with no fields.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field::new(name, kind));
        self
    }

    /// Appends a nullable field.
    #[must_use]
    pub fn nullable_field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field::nullable(name, kind));
        self
    }

    /// The shape's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The ordered field list.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The fraction of this shape's fields that are named by keys of `map`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn match_factor(&self, map: &Map) -> f32 {
        if self.fields.is_empty() {
            return 0.0;
        }
        let named = self
            .fields
            .iter()
            .filter(|field| map.contains_key(field.name))
            .count();
        named as f32 / self.fields.len() as f32
    }
}

/// Picks the candidate shape with the strictly highest match factor.
///
/// Ties keep the first shape found; a best factor of zero, or an empty
/// candidate list, yields `None` and the caller keeps the raw map.
#[must_use]
pub fn best_match(map: &Map, shapes: &[Shape]) -> Option<usize> {
    let mut best = None;
    let mut best_factor = 0.0f32;
    for (index, shape) in shapes.iter().enumerate() {
        let factor = shape.match_factor(map);
        if factor > best_factor {
            best = Some(index);
            best_factor = factor;
        }
    }
    best
}

/// A concrete record that a decoded object map can be coerced into.
///
/// Implementations describe their layout once as a [`Shape`] and accept
/// coerced values field by field. Unknown field names are ignored.
pub trait Record {
    /// The record's layout descriptor.
    fn shape() -> &'static Shape;

    /// Accepts a coerced value for the named field.
    fn assign(&mut self, field: &str, value: FieldValue);
}

/// Constructs an `R` from a decoded object map.
///
/// Each field named in the map is coerced to its declared kind and assigned;
/// a field whose coercion fails is skipped and keeps its default.
#[must_use]
pub fn populate<R: Record + Default>(map: &Map) -> R {
    let mut record = R::default();
    for field in R::shape().fields() {
        let Some(value) = map.get(field.name()) else {
            continue;
        };
        if let Some(coerced) = field.coerce(value) {
            record.assign(field.name(), coerced);
        }
    }
    record
}
