//! Permissive recursive-descent JSON parser.
//!
//! The grammar engine never rejects malformed input. It always produces a
//! best-effort [`Value`] tree and records any deviation from strict JSON
//! grammar in a single monotonic taint flag: once set, the flag stays set for
//! the remainder of the parse. The one exception is numeric conversion, which
//! propagates a [`NumberError`] instead of tainting (see [`crate::error`]).
//!
//! Tainting rules, per construct:
//!
//! - single-quoted strings, unknown escapes, unescaped tabs/newlines inside
//!   strings;
//! - leading zeroes, empty digit runs, exponent markers without digits;
//! - unexpected, doubled, leading or trailing commas in arrays and objects;
//! - unquoted object keys, dangling keys at `}`;
//! - unterminated arrays and objects;
//! - nesting beyond [`MAX_DEPTH`] (flagged, parsing continues);
//! - a bare scalar (string or number) as the whole document, or trailing
//!   content after the first value.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    cursor::Cursor,
    error::NumberError,
    value::{Array, Map, Value},
};

/// Nesting depth at which the parse is flagged as tainted.
///
/// Reaching the limit does not stop recursion; the tree is still built.
pub const MAX_DEPTH: usize = 20;

/// Float literals with at least this many digits decode as [`Value::Decimal`]
/// instead of [`Value::Double`].
const DOUBLE_DIGIT_LIMIT: usize = 17;

/// The outcome of a one-off [`parse`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The best-effort value tree.
    pub value: Value,
    /// Whether the input deviated from strict JSON grammar.
    pub tainted: bool,
}

/// Parses `text` with a fresh [`Parser`].
///
/// # Errors
///
/// Returns [`NumberError`] when a numeric literal cannot be converted, e.g.
/// an integer outside the 32-bit range.
///
/// # Examples
///
/// ```
/// use jsonlax::{parse, Value};
///
/// let parsed = parse("[1,2,3]").unwrap();
/// assert!(!parsed.tainted);
/// assert_eq!(
///     parsed.value,
///     Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
/// );
///
/// // Trailing comma: still decoded, but flagged.
/// let parsed = parse(r#"{"a": 1,}"#).unwrap();
/// assert!(parsed.tainted);
/// ```
pub fn parse(text: &str) -> Result<Parsed, NumberError> {
    let mut parser = Parser::new();
    let value = parser.parse(text)?;
    Ok(Parsed {
        value,
        tainted: parser.tainted(),
    })
}

/// The permissive grammar engine.
///
/// A parser is cheap to construct and may be reused; each call to
/// [`Parser::parse`] resets the taint flag. It is not meant to be shared
/// across concurrent parses.
#[derive(Debug, Default)]
pub struct Parser {
    tainted: bool,
}

impl Parser {
    /// Creates a parser with a clear taint flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the most recent parse deviated from strict JSON grammar.
    #[must_use]
    pub fn tainted(&self) -> bool {
        self.tainted
    }

    /// Parses `text` into a best-effort value tree.
    ///
    /// Malformed input never fails; it sets the taint flag instead. Check
    /// [`Parser::tainted`] after the call.
    ///
    /// # Errors
    ///
    /// Returns [`NumberError`] when a numeric literal cannot be converted.
    pub fn parse(&mut self, text: &str) -> Result<Value, NumberError> {
        let mut cursor = Cursor::new(text);
        self.tainted = false;
        let value = self.parse_value(&mut cursor, 1)?;
        cursor.skip_white();
        if cursor.at_end() {
            // A bare string or number as the whole document is not a JSON
            // text; bare `true`/`false`/`null` pass.
            if matches!(
                value,
                Value::String(_) | Value::Int(_) | Value::Double(_) | Value::Decimal(_)
            ) {
                self.tainted = true;
            }
            return Ok(value);
        }
        // Content remains after the first value.
        self.tainted = true;
        Ok(value)
    }

    fn parse_value(&mut self, cursor: &mut Cursor, depth: usize) -> Result<Value, NumberError> {
        let c = cursor.skip_white();
        match c {
            '"' => Ok(Value::String(self.parse_quoted(cursor, '"'))),
            '\'' => {
                // JSON disallows single-quoted strings.
                self.tainted = true;
                Ok(Value::String(self.parse_quoted(cursor, '\'')))
            }
            '{' => self.parse_object(cursor, depth),
            '[' => self.parse_array(cursor, depth),
            c if c.is_ascii_digit() || c == '-' => self.parse_number(cursor),
            _ => {
                let word = self.parse_string(cursor, false);
                match word.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    _ => {
                        if word.is_empty() {
                            // The character fits no construct; step over it
                            // so the caller's loop makes progress.
                            cursor.next();
                        }
                        self.tainted = true;
                        Ok(Value::Null)
                    }
                }
            }
        }
    }

    /// Decodes a quoted string. `quote` is `"` or `'`; both share the same
    /// escape rules, each recognizing its own quote as an escapable
    /// character.
    fn parse_quoted(&mut self, cursor: &mut Cursor, quote: char) -> String {
        let mut scratch = String::new();
        let mut c = cursor.skip_white();
        if c == quote {
            c = cursor.next();
        }
        while !cursor.at_end() {
            if c == '\\' {
                c = cursor.next();
                match c {
                    '\\' => scratch.push('\\'),
                    '/' => scratch.push('/'),
                    'b' => scratch.push('\u{0008}'),
                    'f' => scratch.push('\u{000C}'),
                    'n' => scratch.push('\n'),
                    'r' => scratch.push('\r'),
                    't' => scratch.push('\t'),
                    'u' => parse_unicode_escape(cursor, &mut scratch),
                    c if c == quote => scratch.push(quote),
                    _ => {
                        // Unknown escaped character.
                        self.tainted = true;
                    }
                }
                c = cursor.next();
            } else if c == quote {
                cursor.next();
                break;
            } else {
                // Control characters must be escaped in strict JSON; keep
                // the character anyway.
                if c == '\t' || c == '\n' {
                    self.tainted = true;
                }
                scratch.push(c);
                c = cursor.next();
            }
        }
        scratch
    }

    /// Parses a string at a key or bare-token position. Quoted and
    /// single-quoted strings are delegated; otherwise a run of letters,
    /// digits and underscores is taken, tainting when quoting was required.
    fn parse_string(&mut self, cursor: &mut Cursor, must_be_quoted: bool) -> String {
        let mut c = cursor.skip_white();
        if c == '"' {
            return self.parse_quoted(cursor, '"');
        }
        if c == '\'' {
            self.tainted = true;
            return self.parse_quoted(cursor, '\'');
        }
        if must_be_quoted {
            self.tainted = true;
        }
        let mut scratch = String::new();
        while !cursor.at_end() && (c.is_alphanumeric() || c == '_') {
            scratch.push(c);
            c = cursor.next();
        }
        scratch
    }

    fn parse_number(&mut self, cursor: &mut Cursor) -> Result<Value, NumberError> {
        let mut scratch = String::new();
        let mut is_float = false;
        let mut is_exp = false;
        let mut digits = 0usize;
        let mut exp_digits = 0usize;
        let mut c = cursor.skip_white();

        // Sign.
        if c == '-' {
            scratch.push('-');
            c = cursor.next();
        }

        // Integer part.
        let mut leading = true;
        let mut leading_zeroes = 0usize;
        while c.is_ascii_digit() {
            if leading && c == '0' {
                leading_zeroes += 1;
            } else {
                leading = false;
            }
            scratch.push(c);
            c = cursor.next();
            digits += 1;
        }

        // Leading zeroes are only strict when the literal is a single `0`.
        if (leading_zeroes > 0 && leading_zeroes != digits) || leading_zeroes > 1 {
            self.tainted = true;
        }

        // Fraction part.
        if c == '.' {
            is_float = true;
            scratch.push('.');
            c = cursor.next();
            while c.is_ascii_digit() {
                scratch.push(c);
                c = cursor.next();
                digits += 1;
            }
        }

        if digits == 0 {
            self.tainted = true;
            return Ok(Value::Null);
        }

        // Exponent part.
        if c == 'e' || c == 'E' {
            is_float = true;
            is_exp = true;
            scratch.push('E');
            c = cursor.next();
            if c == '+' || c == '-' {
                scratch.push(c);
                c = cursor.next();
            }
            while c.is_ascii_digit() {
                scratch.push(c);
                c = cursor.next();
                digits += 1;
                exp_digits += 1;
            }
        }

        if is_exp && exp_digits == 0 {
            self.tainted = true;
            return Ok(Value::Null);
        }

        // Build the number from the captured literal.
        if is_float {
            if digits < DOUBLE_DIGIT_LIMIT {
                let value = f64::from_str(&scratch).map_err(|source| NumberError::Float {
                    literal: scratch.clone(),
                    source,
                })?;
                Ok(Value::Double(value))
            } else {
                let value = if is_exp {
                    Decimal::from_scientific(&scratch)
                } else {
                    Decimal::from_str(&scratch)
                }
                .map_err(|source| NumberError::Decimal {
                    literal: scratch.clone(),
                    source,
                })?;
                Ok(Value::Decimal(value))
            }
        } else {
            let value = i32::from_str(&scratch).map_err(|source| NumberError::Int {
                literal: scratch.clone(),
                source,
            })?;
            Ok(Value::Int(value))
        }
    }

    fn parse_array(&mut self, cursor: &mut Cursor, depth: usize) -> Result<Value, NumberError> {
        if depth >= MAX_DEPTH {
            self.tainted = true;
        }

        let mut closed = false;
        let mut c = cursor.skip_white();
        let mut array = Array::new();
        if c == '[' {
            cursor.next();
        }
        // `None` before the first element, then whether a comma demands one.
        let mut expect_value: Option<bool> = None;
        loop {
            c = cursor.skip_white();
            if c == ']' {
                // Trailing comma.
                if expect_value == Some(true) {
                    self.tainted = true;
                }
                closed = true;
                cursor.next();
                break;
            } else if c == ',' {
                // Doubled or leading comma.
                if expect_value == Some(true) || array.is_empty() {
                    self.tainted = true;
                }
                cursor.next();
                expect_value = Some(true);
            } else {
                // Two values with no separator.
                if expect_value == Some(false) {
                    self.tainted = true;
                }
                array.push(self.parse_value(cursor, depth + 1)?);
                expect_value = Some(false);
            }
            if cursor.at_end() {
                break;
            }
        }
        if !closed {
            self.tainted = true;
        }
        Ok(Value::Array(array))
    }

    fn parse_object(&mut self, cursor: &mut Cursor, depth: usize) -> Result<Value, NumberError> {
        if depth >= MAX_DEPTH {
            self.tainted = true;
        }

        let mut closed = false;
        let mut c = cursor.skip_white();
        let mut object = Map::new();
        if c == '{' {
            cursor.next();
        }
        let mut key = String::new();
        let mut expect_key: Option<bool> = None;
        let mut expect_value: Option<bool> = None;
        loop {
            c = cursor.skip_white();
            if c == ':' {
                cursor.next();
                if expect_value == Some(true) {
                    let value = self.parse_value(cursor, depth + 1)?;
                    object.insert(std::mem::take(&mut key), value);
                    expect_key = None;
                    expect_value = Some(false);
                }
            } else if c == ',' {
                cursor.next();
                cursor.skip_white();
                expect_key = Some(true);
                expect_value = Some(false);
            } else if c == '}' {
                // Trailing comma or a key without a value.
                if expect_value == Some(true) || expect_key == Some(true) {
                    self.tainted = true;
                }
                closed = true;
                cursor.next();
                break;
            } else if expect_key != Some(false) {
                key = self.parse_string(cursor, true);
                cursor.skip_white();
                expect_key = Some(false);
                expect_value = Some(true);
            } else {
                // Unexpected character where a separator was required; stop
                // consuming members, the outer parse continues.
                self.tainted = true;
                break;
            }
            if cursor.at_end() {
                break;
            }
        }
        if !closed {
            self.tainted = true;
        }
        Ok(Value::Object(object))
    }
}

/// Reads exactly four characters and combines the hex digits among them,
/// big-endian, into a UTF-16 code unit. Non-hex characters contribute
/// nothing.
fn parse_hex_unit(cursor: &mut Cursor) -> u32 {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let c = cursor.next();
        if let Some(digit) = c.to_digit(16) {
            value = (value << 4) | digit;
        }
    }
    value
}

/// Decodes one `\u` escape into `scratch`. A high surrogate immediately
/// followed by an escaped low surrogate combines into a single
/// supplementary-plane character; a surrogate unit that completes no pair
/// becomes U+FFFD.
fn parse_unicode_escape(cursor: &mut Cursor, scratch: &mut String) {
    let mut unit = parse_hex_unit(cursor);
    loop {
        if let Some(c) = char::from_u32(unit) {
            scratch.push(c);
            return;
        }
        if (0xD800..0xDC00).contains(&unit) && cursor.follows("\\u") {
            cursor.next();
            cursor.next();
            let low = parse_hex_unit(cursor);
            if (0xDC00..0xE000).contains(&low) {
                let pair = 0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                scratch.push(char::from_u32(pair).unwrap_or('\u{FFFD}'));
                return;
            }
            // The consumed unit was not a low surrogate; it stands on its
            // own for the next round.
            scratch.push('\u{FFFD}');
            unit = low;
            continue;
        }
        scratch.push('\u{FFFD}');
        return;
    }
}
