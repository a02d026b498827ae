//! Pre-generation checks over the field store.
//!
//! Rules are independent and all of them run: a field with a blank name is
//! reported once and excluded from duplicate grouping; every member of a name
//! group with two or more fields gets its own error carrying the group size.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::HashMap;
use std::fmt;

use crate::doc::{FieldDefinition, FieldId};

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Name is empty after trimming.
    EmptyName,
    /// Name shared by `count` fields.
    DuplicateName { name: String, count: usize },
}

/// One validation problem, located by field id and position.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field_id: FieldId,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    fn new(field: &FieldDefinition, kind: ValidationErrorKind) -> Self {
        Self { field_id: field.id, page: field.page, x: field.x, y: field.y, kind }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ValidationErrorKind::EmptyName => "E_FIELD_NAME_EMPTY",
            ValidationErrorKind::DuplicateName { .. } => "E_FIELD_NAME_DUPLICATE",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::EmptyName => {
                write!(f, "field at (p{}, {}, {}) has an empty name", self.page, self.x, self.y)
            }
            ValidationErrorKind::DuplicateName { name, count } => {
                write!(f, "field name \"{name}\" is duplicated ({count} fields)")
            }
        }
    }
}

/// Validation refused the field list.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{} field validation error(s); first: {}", .errors.len(), first_message(.errors))]
pub struct ValidationFailed {
    pub errors: Vec<ValidationError>,
}

fn first_message(errors: &[ValidationError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

/// Check `fields` for blank and duplicated names.
#[must_use]
pub fn validate(fields: &[FieldDefinition]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut groups: Vec<(&str, Vec<&FieldDefinition>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for field in fields {
        if field.name.trim().is_empty() {
            errors.push(ValidationError::new(field, ValidationErrorKind::EmptyName));
            continue;
        }
        // Grouping is on the raw name, so "a" and "a " are distinct.
        match index.get(field.name.as_str()) {
            Some(&slot) => groups[slot].1.push(field),
            None => {
                index.insert(field.name.as_str(), groups.len());
                groups.push((field.name.as_str(), vec![field]));
            }
        }
    }

    for (name, members) in groups {
        if members.len() < 2 {
            continue;
        }
        let count = members.len();
        for field in members {
            errors.push(ValidationError::new(
                field,
                ValidationErrorKind::DuplicateName { name: name.to_owned(), count },
            ));
        }
    }

    errors
}

/// `Ok(())` when `fields` pass validation.
///
/// # Errors
///
/// Returns every problem found when any rule fails.
pub fn ensure_valid(fields: &[FieldDefinition]) -> Result<(), ValidationFailed> {
    let errors = validate(fields);
    if errors.is_empty() { Ok(()) } else { Err(ValidationFailed { errors }) }
}
