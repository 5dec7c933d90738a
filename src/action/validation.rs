use std::collections::HashMap;
use thiserror::Error;

/// Minimum length requirement for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub min_length: usize,
}

impl FieldRule {
    pub fn min_length(field: impl Into<String>, min_length: usize) -> Self {
        FieldRule {
            field: field.into(),
            min_length,
        }
    }

    fn failure(&self) -> ValidationFailure {
        ValidationFailure {
            message: format!(
                "{} must be greater than {} characters",
                capitalize(&self.field),
                self.min_length as i64 - 1
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub message: String,
}

/// Checks `rules` in order and stops at the first field that is missing or
/// shorter than its minimum.
pub fn validate(
    fields: &HashMap<String, String>,
    rules: &[FieldRule],
) -> Result<(), ValidationFailure> {
    match rules.iter().find(|rule| {
        fields
            .get(&rule.field)
            .map_or(true, |value| value.chars().count() < rule.min_length)
    }) {
        None => Ok(()),
        Some(rule) => Err(rule.failure()),
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
