use thiserror::Error;

/// The single error kind raised by this crate.
///
/// Raised for wrong-length slice construction, normalisation of a
/// degenerate (below [`SMALLEST`](crate::scalar::SMALLEST)) vector or
/// quaternion, and inversion of a singular matrix or transform. Expected
/// floating-point boundary conditions (out-of-domain trig arguments, gimbal
/// lock) are resolved by policy instead and never produce an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GMathError {
    message: String,
}

impl GMathError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable description carried by this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Checks the length of a flat-array interchange slice.
///
/// Wrong-length input is always an error, never truncated or zero-padded.
pub(crate) fn check_slice_len(
    type_name: &str,
    expected: usize,
    actual: usize,
) -> Result<(), GMathError> {
    if actual == expected {
        Ok(())
    } else {
        Err(GMathError::new(format!(
            "{type_name}: expected a slice of {expected} values, got {actual}"
        )))
    }
}
