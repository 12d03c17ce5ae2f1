use thiserror::Error;

use crate::errors::domain::DomainError;

/// Top-level error for engine entry points.
///
/// Expected gameplay outcomes (rejected words, out-of-turn input) are *not*
/// errors; they are reported through `SubmitOutcome`. `AppError` covers
/// command misuse (duplicate start, join after start) and operational
/// failures.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Borrow the underlying domain error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::ConflictKind;

    #[test]
    fn domain_errors_convert_and_round_trip() {
        let err: AppError =
            DomainError::conflict(ConflictKind::GameAlreadyActive, "already running").into();
        let domain = err.as_domain().expect("should carry a domain error");
        assert!(matches!(
            domain,
            DomainError::Conflict(ConflictKind::GameAlreadyActive, _)
        ));
    }

    #[test]
    fn config_errors_render_detail() {
        let err = AppError::config("bad WORDCHAIN_TIME_UNIT_MS");
        assert!(err.to_string().contains("bad WORDCHAIN_TIME_UNIT_MS"));
    }
}
