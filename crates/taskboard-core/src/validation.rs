//! Input gatekeeper for the project form.
//!
//! Raw field values are checked against per-field constraints before
//! anything reaches the store. The store itself never sees constraint
//! objects, only a validated `ProjectDraft`.

use serde::{Deserialize, Serialize};

/// Message shown to the user when a submit is rejected.
pub const REJECTED_MESSAGE: &str = "Invalid input, please try again!";

pub const DESCRIPTION_MIN_LENGTH: usize = 5;
pub const PEOPLE_MIN: i64 = 1;
pub const PEOPLE_MAX: i64 = 5;

/// A value under validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    /// A numeric field left empty.
    Blank,
}

/// A value plus the constraints it must satisfy.
///
/// Length constraints only apply to text, bounds only to numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validatable<'a> {
    pub value: FieldValue<'a>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub whole: bool,
}

impl<'a> Validatable<'a> {
    pub fn text(value: &'a str) -> Self {
        Self::of(FieldValue::Text(value))
    }

    pub fn number(value: f64) -> Self {
        Self::of(FieldValue::Number(value))
    }

    /// A number typed as text: blank stays blank, malformed text becomes NaN.
    pub fn numeric(raw: &'a str) -> Self {
        if raw.trim().is_empty() {
            Self::of(FieldValue::Blank)
        } else {
            Self::number(parse_number(raw))
        }
    }

    fn of(value: FieldValue<'a>) -> Self {
        Self {
            value,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            whole: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn whole(mut self) -> Self {
        self.whole = true;
        self
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    Required,
    TooShort { min_length: usize },
    TooLong { max_length: usize },
    NotANumber,
    NotWhole,
    BelowMin { min: i64 },
    AboveMax { max: i64 },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::TooShort { min_length } => write!(f, "must be at least {} characters", min_length),
            Self::TooLong { max_length } => write!(f, "must be at most {} characters", max_length),
            Self::NotANumber => write!(f, "must be a number"),
            Self::NotWhole => write!(f, "must be a whole number"),
            Self::BelowMin { min } => write!(f, "must be at least {}", min),
            Self::AboveMax { max } => write!(f, "must be at most {}", max),
        }
    }
}

/// Check a value against its constraints. An empty result means it passed.
///
/// Numeric bounds are inclusive on both ends.
pub fn validate(input: &Validatable<'_>) -> Vec<Violation> {
    let mut violations = Vec::new();

    match input.value {
        FieldValue::Text(text) => {
            if input.required && text.trim().is_empty() {
                violations.push(Violation::Required);
            }
            let len = text.chars().count();
            if let Some(min_length) = input.min_length {
                if len < min_length {
                    violations.push(Violation::TooShort { min_length });
                }
            }
            if let Some(max_length) = input.max_length {
                if len > max_length {
                    violations.push(Violation::TooLong { max_length });
                }
            }
        }
        FieldValue::Blank => {
            if input.required {
                violations.push(Violation::Required);
            }
        }
        FieldValue::Number(n) => {
            if n.is_nan() {
                violations.push(Violation::NotANumber);
                return violations;
            }
            if input.whole && n.fract() != 0.0 {
                violations.push(Violation::NotWhole);
            }
            if let Some(min) = input.min {
                if n < min as f64 {
                    violations.push(Violation::BelowMin { min });
                }
            }
            if let Some(max) = input.max {
                if n > max as f64 {
                    violations.push(Violation::AboveMax { max });
                }
            }
        }
    }

    violations
}

/// Raw form values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProjectInput {
    pub title: String,
    pub description: String,
    pub people: String,
}

/// Validated `(title, description, people)` ready for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub people: u32,
}

/// Failed constraints for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub violations: Vec<Violation>,
}

/// A rejected submit: the alert message plus per-field details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl ValidationFailure {
    fn new(fields: Vec<FieldError>) -> Self {
        Self {
            message: REJECTED_MESSAGE.to_string(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.fields.iter().find(|f| f.field == name)
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        for field in &self.fields {
            let reasons: Vec<String> = field.violations.iter().map(|v| v.to_string()).collect();
            write!(f, " {} {}.", field.field, reasons.join(", "))?;
        }
        Ok(())
    }
}

/// Parse a numeric field the way a number input coerces text; blank or
/// malformed input becomes NaN.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Apply the project form's rules to raw input.
pub fn gather(raw: &RawProjectInput) -> Result<ProjectDraft, ValidationFailure> {
    let checks = [
        ("title", Validatable::text(&raw.title).required()),
        (
            "description",
            Validatable::text(&raw.description)
                .required()
                .min_length(DESCRIPTION_MIN_LENGTH),
        ),
        (
            "people",
            Validatable::numeric(&raw.people)
                .required()
                .whole()
                .min(PEOPLE_MIN)
                .max(PEOPLE_MAX),
        ),
    ];

    let fields: Vec<FieldError> = checks
        .iter()
        .filter_map(|(field, input)| {
            let violations = validate(input);
            (!violations.is_empty()).then(|| FieldError {
                field: field.to_string(),
                violations,
            })
        })
        .collect();

    if !fields.is_empty() {
        return Err(ValidationFailure::new(fields));
    }

    Ok(ProjectDraft {
        title: raw.title.clone(),
        description: raw.description.clone(),
        people: parse_number(&raw.people) as u32,
    })
}
