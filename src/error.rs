use good_lp::ResolutionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{exercise}: no solution satisfies all constraints")]
    Infeasible { exercise: &'static str },

    #[error("{exercise}: the objective is unbounded")]
    Unbounded { exercise: &'static str },

    #[error("{exercise}: solver failed: {message}")]
    Solver {
        exercise: &'static str,
        message: String,
    },

    #[error("invalid instance: `{field}` {reason}")]
    InvalidInstance { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    pub(crate) fn resolution(exercise: &'static str, err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => Error::Infeasible { exercise },
            ResolutionError::Unbounded => Error::Unbounded { exercise },
            other => Error::Solver {
                exercise,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidInstance {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
