//! Line-oriented TSV record codec.
//!
//! One edge per line, two tab-separated fields:
//!
//! ```text
//! origin \t destination
//! ```
//!
//! Parsing is strict about field count and empty endpoints but tolerant of a
//! trailing carriage return, so CRLF input streams round-trip cleanly. Blank
//! lines and any skip-vs-fail policy for malformed records belong to the
//! caller; this module only classifies single lines.

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing a record line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Line has the wrong number of tab-separated fields.
    #[error("expected 2 tab-separated fields, found {found}")]
    FieldCount {
        /// Number of fields found.
        found: usize,
    },

    /// A field is present but empty.
    #[error("empty {field} field")]
    EmptyField {
        /// Which field was empty: `"origin"` or `"destination"`.
        field: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse one record line into an `(origin, destination)` pair.
///
/// A single trailing `\r` is stripped before splitting, so lines read from
/// CRLF streams parse the same as LF lines.
///
/// # Errors
///
/// Returns [`ParseError::FieldCount`] unless the line splits into exactly
/// two fields, and [`ParseError::EmptyField`] if either field is empty.
pub fn parse_record(line: &str) -> Result<(String, String), ParseError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split('\t').collect();

    let [origin, destination] = fields[..] else {
        return Err(ParseError::FieldCount {
            found: fields.len(),
        });
    };

    if origin.is_empty() {
        return Err(ParseError::EmptyField { field: "origin" });
    }
    if destination.is_empty() {
        return Err(ParseError::EmptyField {
            field: "destination",
        });
    }

    Ok((origin.to_string(), destination.to_string()))
}

/// Serialize an edge to a record line, without trailing newline.
#[must_use]
pub fn write_record(origin: &str, destination: &str) -> String {
    format!("{origin}\t{destination}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
