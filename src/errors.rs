use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when operating on a [`MovieList`](crate::MovieList).
#[derive(Debug, Error)]
pub enum MovieListError {
    /// Front/back access or removal on a list with no elements.
    #[error("movie list is empty")]
    EmptyCollection,

    /// A cursor operation was attempted without calling `begin` first.
    #[error("no edit session is active")]
    NoActiveSession,

    /// The cursor sits on a sentinel that forbids the requested operation.
    #[error("cursor position does not allow this operation")]
    InvalidCursor,

    /// A row of tabular input could not be turned into a movie.
    #[error("malformed input{}: {reason}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    MalformedInput {
        /// 1-based line of the offending row, when the reader knows it.
        line: Option<u64>,
        reason: String,
    },

    /// The load file could not be opened.
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    /// Reading the input failed partway through.
    #[error("I/O error while reading input: {0}")]
    Read(#[source] std::io::Error),
}

impl MovieListError {
    pub(crate) fn malformed(line: Option<u64>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for MovieListError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(error) => Self::Read(error),
            _ => Self::malformed(line, reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, MovieListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_includes_line_when_known() {
        let err = MovieListError::malformed(Some(3), "bad year");
        assert_eq!(err.to_string(), "malformed input at line 3: bad year");

        let err = MovieListError::malformed(None, "bad year");
        assert_eq!(err.to_string(), "malformed input: bad year");
    }

    #[test]
    fn csv_io_errors_stay_io_errors() {
        let err: MovieListError =
            csv::Error::from(std::io::Error::other("disk gone")).into();
        assert!(matches!(err, MovieListError::Read(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
