use std::collections::BTreeMap;

use validator::{Validate, ValidationErrors};

/// Field name to reason, for every field that failed validation.
pub type FieldErrors = BTreeMap<String, String>;

/// Flattens `validator` output into one reason per field.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            failures.first().map(|failure| {
                let reason = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                (field.to_string(), reason)
            })
        })
        .collect()
}

/// Runs every declared constraint and collects all failures together.
pub fn check<T: Validate>(value: &T) -> Result<(), FieldErrors> {
    value.validate().map_err(|e| field_errors(&e))
}

pub fn single(field: &str, reason: &str) -> FieldErrors {
    FieldErrors::from([(field.to_string(), reason.to_string())])
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
