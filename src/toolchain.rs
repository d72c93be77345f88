//! Toolchain record loading and validation.
//!
//! The toolchain record is a flat JSON object naming the external tools the
//! generated rules invoke. Its key set must equal
//! [`ToolchainDescriptor::FIELDS`] exactly: a missing or unexpected key is a
//! fatal [`ToolchainError::SchemaMismatch`] that names both sides of the
//! difference. The field names double as the Ninja variable names written to
//! the build file.
//!
//! ```rust
//! use neosh_configure::toolchain::ToolchainDescriptor;
//!
//! let json = r#"{"mkdir":"mkdir","mkdir_flags":"-p","rm":"rm","rm_flags":"-rf"}"#;
//! let toolchain = ToolchainDescriptor::from_json_str(json, "toolchain.json")?;
//! assert_eq!(toolchain.rm_flags(), "-rf");
//! # Ok::<(), neosh_configure::toolchain::ToolchainError>(())
//! ```

use camino::Utf8Path;
use itertools::Itertools;
use miette::Diagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use thiserror::Error;

/// Errors raised while loading a toolchain record.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolchainError {
    /// The record could not be read, or is not a JSON object.
    #[error("cannot read toolchain record {name}: {reason}")]
    #[diagnostic(
        code(neosh_configure::toolchain::unreadable_input),
        help("the toolchain record must be a JSON object of string values")
    )]
    UnreadableInput {
        /// Display name of the record.
        name: String,
        /// Underlying I/O or parse failure.
        reason: String,
    },

    /// The record's keys differ from the expected field set.
    #[error(
        "{name} does not match the toolchain schema: {}",
        describe_mismatch(.missing, .unexpected)
    )]
    #[diagnostic(
        code(neosh_configure::toolchain::schema_mismatch),
        help("expected exactly the keys: mkdir, mkdir_flags, rm, rm_flags")
    )]
    SchemaMismatch {
        /// Display name of the record.
        name: String,
        /// Expected keys absent from the record, sorted.
        missing: Vec<String>,
        /// Keys present in the record but not expected, sorted.
        unexpected: Vec<String>,
    },

    /// A field holds a value that cannot be written to the build file.
    #[error("{name}: field '{field}' {reason}")]
    #[diagnostic(code(neosh_configure::toolchain::invalid_value))]
    InvalidValue {
        /// Display name of the record.
        name: String,
        /// Offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

fn describe_mismatch(missing: &[String], unexpected: &[String]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing: {}", missing.iter().join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected: {}", unexpected.iter().join(", ")));
    }
    parts.join("; ")
}

/// External tools used by the directory lifecycle rules.
///
/// Instances are only produced by a successful load, so every field holds the
/// verbatim string from the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainDescriptor {
    mkdir: String,
    mkdir_flags: String,
    rm: String,
    rm_flags: String,
}

impl ToolchainDescriptor {
    /// Expected record keys, in the order their variables are declared.
    pub const FIELDS: [&'static str; 4] = ["mkdir", "mkdir_flags", "rm", "rm_flags"];

    /// Load and validate the record stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolchainError::UnreadableInput`] when the file cannot be
    /// read or parsed, and the validation errors of
    /// [`ToolchainDescriptor::from_json_str`] otherwise.
    pub fn load(path: &Utf8Path) -> Result<Self, ToolchainError> {
        let text = fs::read_to_string(path).map_err(|err| ToolchainError::UnreadableInput {
            name: path.to_string(),
            reason: err.to_string(),
        })?;
        Self::from_json_str(&text, path.file_name().unwrap_or(path.as_str()))
    }

    /// Parse and validate a record held in memory.
    ///
    /// `name` labels the record in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ToolchainError::UnreadableInput`] for malformed JSON or a
    /// non-object document, [`ToolchainError::SchemaMismatch`] when the key
    /// set differs from [`Self::FIELDS`], and
    /// [`ToolchainError::InvalidValue`] for non-string or multi-line values.
    pub fn from_json_str(text: &str, name: &str) -> Result<Self, ToolchainError> {
        let unreadable = |reason: String| ToolchainError::UnreadableInput {
            name: name.to_owned(),
            reason,
        };
        let doc: Value = serde_json::from_str(text).map_err(|err| unreadable(err.to_string()))?;
        let Value::Object(record) = doc else {
            return Err(unreadable(format!(
                "expected a JSON object, found {}",
                json_kind(&doc)
            )));
        };
        check_schema(&record, name)?;
        Ok(Self {
            mkdir: string_field(&record, "mkdir", name)?,
            mkdir_flags: string_field(&record, "mkdir_flags", name)?,
            rm: string_field(&record, "rm", name)?,
            rm_flags: string_field(&record, "rm_flags", name)?,
        })
    }

    /// Directory-creation tool.
    #[must_use]
    pub fn mkdir(&self) -> &str {
        &self.mkdir
    }

    /// Flags passed to the directory-creation tool.
    #[must_use]
    pub fn mkdir_flags(&self) -> &str {
        &self.mkdir_flags
    }

    /// Directory-removal tool.
    #[must_use]
    pub fn rm(&self) -> &str {
        &self.rm
    }

    /// Flags passed to the directory-removal tool.
    #[must_use]
    pub fn rm_flags(&self) -> &str {
        &self.rm_flags
    }

    /// Ninja variable bindings contributed by the toolchain, in field order.
    #[must_use]
    pub fn variables(&self) -> [(&'static str, &str); 4] {
        [
            ("mkdir", self.mkdir.as_str()),
            ("mkdir_flags", self.mkdir_flags.as_str()),
            ("rm", self.rm.as_str()),
            ("rm_flags", self.rm_flags.as_str()),
        ]
    }
}

fn check_schema(record: &Map<String, Value>, name: &str) -> Result<(), ToolchainError> {
    let expected: BTreeSet<&str> = ToolchainDescriptor::FIELDS.into_iter().collect();
    let actual: BTreeSet<&str> = record.keys().map(String::as_str).collect();
    if expected == actual {
        return Ok(());
    }
    Err(ToolchainError::SchemaMismatch {
        name: name.to_owned(),
        missing: expected
            .difference(&actual)
            .map(|key| (*key).to_owned())
            .collect(),
        unexpected: actual
            .difference(&expected)
            .map(|key| (*key).to_owned())
            .collect(),
    })
}

fn string_field(
    record: &Map<String, Value>,
    field: &str,
    name: &str,
) -> Result<String, ToolchainError> {
    let invalid = |reason: String| ToolchainError::InvalidValue {
        name: name.to_owned(),
        field: field.to_owned(),
        reason,
    };
    match record.get(field) {
        Some(Value::String(value)) if value.contains(['\n', '\r']) => {
            Err(invalid("must not contain line breaks".to_owned()))
        }
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(invalid(format!(
            "must be a string, found {}",
            json_kind(other)
        ))),
        None => Err(ToolchainError::SchemaMismatch {
            name: name.to_owned(),
            missing: vec![field.to_owned()],
            unexpected: Vec::new(),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
