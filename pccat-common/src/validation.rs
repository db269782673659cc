//! Field-level validation
//!
//! Every catalog entity declares its rules through [`Validator`]: required
//! strings, optional strings, and inclusive numeric ranges. Violations are
//! collected for the whole record so a caller can report every failing field
//! at once. String lengths are measured in characters, not bytes.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Column/field name of the failing value
    pub field: &'static str,
    /// Human-readable description of the rule that failed
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All violations found on a record, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// True if any violation names `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Vec<Violation>> for ValidationErrors {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

/// Records that can be checked against their field rules
pub trait Validate {
    /// Return every rule violation; empty means the record is valid
    fn validate(&self) -> Vec<Violation>;

    /// `Ok(())` for a valid record, otherwise all violations
    fn check(&self) -> std::result::Result<(), ValidationErrors> {
        let violations = self.validate();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::from(violations))
        }
    }
}

/// Inclusive integer range with a display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
    pub unit: &'static str,
}

impl IntRange {
    pub const fn new(min: i32, max: i32, unit: &'static str) -> Self {
        Self { min, max, unit }
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Inclusive decimal range, stored as scaled integer bounds
///
/// `DecimalRange::new(1, 100, 1, "GHz")` is 0.1 to 10.0 GHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalRange {
    min_units: i64,
    max_units: i64,
    scale: u32,
    pub unit: &'static str,
}

impl DecimalRange {
    pub const fn new(min_units: i64, max_units: i64, scale: u32, unit: &'static str) -> Self {
        Self {
            min_units,
            max_units,
            scale,
            unit,
        }
    }

    pub fn min(&self) -> Decimal {
        Decimal::new(self.min_units, self.scale)
    }

    pub fn max(&self) -> Decimal {
        Decimal::new(self.max_units, self.scale)
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min() && value <= self.max()
    }
}

fn unit_suffix(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" {}", unit)
    }
}

/// Accumulates violations while an entity walks its fields
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blank string, any length
    pub fn required(mut self, field: &'static str, label: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.violations
                .push(Violation::new(field, format!("{} is required", label)));
        }
        self
    }

    /// Non-blank string of at most `max_chars` characters
    ///
    /// A blank (empty or whitespace-only) value reports only "is required".
    pub fn required_text(
        mut self,
        field: &'static str,
        label: &str,
        value: &str,
        max_chars: usize,
    ) -> Self {
        if value.trim().is_empty() {
            self.violations
                .push(Violation::new(field, format!("{} is required", label)));
        } else {
            self.check_length(field, label, value, max_chars);
        }
        self
    }

    /// Absent, or a string of at most `max_chars` characters
    pub fn optional_text(
        mut self,
        field: &'static str,
        label: &str,
        value: Option<&str>,
        max_chars: usize,
    ) -> Self {
        if let Some(value) = value {
            self.check_length(field, label, value, max_chars);
        }
        self
    }

    pub fn int_range(mut self, field: &'static str, label: &str, value: i32, range: IntRange) -> Self {
        if !range.contains(value) {
            self.violations.push(Violation::new(
                field,
                format!(
                    "{} must be between {} and {}{}",
                    label,
                    range.min,
                    range.max,
                    unit_suffix(range.unit)
                ),
            ));
        }
        self
    }

    pub fn decimal_range(
        mut self,
        field: &'static str,
        label: &str,
        value: Decimal,
        range: DecimalRange,
    ) -> Self {
        if !range.contains(value) {
            self.violations.push(Violation::new(
                field,
                format!(
                    "{} must be between {} and {}{}",
                    label,
                    range.min(),
                    range.max(),
                    unit_suffix(range.unit)
                ),
            ));
        }
        self
    }

    pub fn finish(self) -> Vec<Violation> {
        self.violations
    }

    fn check_length(&mut self, field: &'static str, label: &str, value: &str, max_chars: usize) {
        if value.chars().count() > max_chars {
            self.violations.push(Violation::new(
                field,
                format!("{} must not exceed {} characters", label, max_chars),
            ));
        }
    }
}
