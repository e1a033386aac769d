//! Device record type and its textual rendering

use std::fmt::{self, Write};

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Field carrying the device status
pub const STATUS_FIELD: &str = "status";

/// Status value marking a device offline
pub const INACTIVE_STATUS: &str = "inactive";

/// One device profile, exactly as stored
///
/// The document is kept opaque and in store field order. Only `status` is interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord(Document);

impl DeviceRecord {
    /// Wrap a raw document
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self(document)
    }

    /// Borrow the raw document
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.0
    }

    /// The `status` field, when present and a string
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.0.get_str(STATUS_FIELD).ok()
    }

    /// Whether this device is marked inactive
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        self.status() == Some(INACTIVE_STATUS)
    }
}

impl From<Document> for DeviceRecord {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

/// Renders the record in mapping notation, e.g. `{'_id': 1, 'status': 'inactive'}`
impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_document(f, &self.0)
    }
}

fn write_document<W: Write>(out: &mut W, doc: &Document) -> fmt::Result {
    out.write_char('{')?;
    for (i, (key, value)) in doc.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_quoted(out, key)?;
        out.write_str(": ")?;
        write_value(out, value)?;
    }
    out.write_char('}')
}

fn write_value<W: Write>(out: &mut W, value: &Bson) -> fmt::Result {
    match value {
        Bson::String(s) | Bson::Symbol(s) => write_quoted(out, s),
        Bson::Int32(n) => write!(out, "{n}"),
        Bson::Int64(n) => write!(out, "{n}"),
        Bson::Double(d) => write_double(out, *d),
        Bson::Boolean(true) => out.write_str("True"),
        Bson::Boolean(false) => out.write_str("False"),
        Bson::Null | Bson::Undefined => out.write_str("None"),
        Bson::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, item)?;
            }
            out.write_char(']')
        }
        Bson::Document(doc) => write_document(out, doc),
        Bson::ObjectId(oid) => write!(out, "ObjectId('{}')", oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => write!(out, "datetime('{s}')"),
            Err(_) => write!(out, "datetime({})", dt.timestamp_millis()),
        },
        Bson::JavaScriptCode(code) => {
            out.write_str("Code(")?;
            write_quoted(out, code)?;
            out.write_char(')')
        }
        Bson::JavaScriptCodeWithScope(code) => {
            out.write_str("Code(")?;
            write_quoted(out, &code.code)?;
            out.write_str(", ")?;
            write_document(out, &code.scope)?;
            out.write_char(')')
        }
        Bson::RegularExpression(regex) => {
            out.write_str("Regex(")?;
            write_quoted(out, &regex.pattern)?;
            out.write_str(", ")?;
            write_quoted(out, &regex.options)?;
            out.write_char(')')
        }
        other => {
            for c in other.to_string().chars() {
                match c {
                    '\n' => out.write_str("\\n")?,
                    '\r' => out.write_str("\\r")?,
                    '\t' => out.write_str("\\t")?,
                    c => out.write_char(c)?,
                }
            }
            Ok(())
        }
    }
}

fn write_double<W: Write>(out: &mut W, d: f64) -> fmt::Result {
    if d.is_nan() {
        return out.write_str("nan");
    }
    if d.is_infinite() {
        return out.write_str(if d > 0.0 { "inf" } else { "-inf" });
    }

    // Debug keeps the fractional part on whole numbers (`1.0`) and switches to
    // exponent form outside 1e-4..1e16; exponents are signed and at least two digits.
    let repr = format!("{d:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(out, "{mantissa}e{sign}{digits:0>2}")
        }
        None => out.write_str(&repr),
    }
}

/// Single quotes unless the text holds `'` and no `"`
fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    out.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c == quote => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}
