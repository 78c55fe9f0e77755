use crate::error::{AppError, FieldFailure};

/// Field-level validation for inbound request bodies.
///
/// Each request type checks its own fields and reports every failure,
/// annotated with the type's name via [`Validate::TARGET`].
pub trait Validate {
    /// Name reported as the `target` of each field failure.
    const TARGET: &'static str;

    /// Collect all field failures. Empty means the value is valid.
    fn validate(&self) -> Vec<FieldFailure>;
}

/// Validate a request body, converting a non-empty failure list into
/// [`AppError::Validation`].
pub fn ensure_valid<T: Validate>(value: &T) -> Result<(), AppError> {
    let failures = value.validate();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(failures))
    }
}
