//! Request-shape validation shared by the route crates.
//!
//! DTOs implement [`Validate`] and report problems per field. A map holding
//! only "is required" messages is answered with the `required` code, anything
//! else with `invalid`.

use std::collections::BTreeMap;

use crate::error::{AppError, ErrorCode, Res};

pub type FieldErrors = BTreeMap<String, Vec<String>>;

const REQUIRED_SUFFIX: &str = "is required";

pub trait Validate {
    fn validate(&self, errors: &mut Checker);

    /// Runs the checks and turns collected field errors into an `AppError`.
    fn validated(&self, message: &str) -> Res<()> {
        let mut checker = Checker::default();
        self.validate(&mut checker);
        checker.finish(message)
    }
}

#[derive(Debug, Default)]
pub struct Checker {
    errors: FieldErrors,
}

impl Checker {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, format!("{} {}", label(field), REQUIRED_SUFFIX));
            false
        } else {
            true
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(
                field,
                format!("{} must be at most {} characters", label(field), max),
            );
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(
                field,
                format!("{} must be at least {} characters", label(field), min),
            );
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !self.required(field, value) {
            return;
        }
        if !is_email(value) {
            self.add(field, "Enter a valid email address");
        }
    }

    pub fn phone(&mut self, field: &str, value: &str) {
        if !self.required(field, value) {
            return;
        }
        let digits = value.strip_prefix('+').unwrap_or(value);
        if digits.len() < 9 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
            self.add(field, "Enter a valid phone number");
        }
    }

    pub fn one_of(&mut self, field: &str, value: &str, choices: &[&str]) {
        if !self.required(field, value) {
            return;
        }
        if !choices.contains(&value.trim().to_lowercase().as_str()) {
            self.add(
                field,
                format!("\"{}\" is not a valid choice ({})", value, choices.join(", ")),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self, message: &str) -> Res<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let only_required = self
            .errors
            .values()
            .flatten()
            .all(|m| m.ends_with(REQUIRED_SUFFIX));
        Err(AppError::Validation {
            code: if only_required {
                ErrorCode::Required
            } else {
                ErrorCode::Invalid
            },
            message: message.to_string(),
            errors: self.errors,
        })
    }
}

fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}
