//! Errors that can happen when interacting with `kobis.or.kr`.

use chrono::NaiveDate;
use thiserror::Error;

pub use crate::stdx::error::ParseError;

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    BoxOfficeError(#[from] BoxOfficeError),
    #[error(transparent)]
    NotScrappedDate(#[from] NotScrappedDate),
    #[error(transparent)]
    MovieError(#[from] MovieError),
}

/// Failure to reach `kobis.or.kr`, or to build the client that does.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, timeout, or a non-success status.
    #[error(transparent)]
    RequestFailed(#[from] reqwest::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BoxOfficeError {
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    ParseError(#[from] ParseError),
}

impl From<reqwest::Error> for BoxOfficeError {
    fn from(error: reqwest::Error) -> Self {
        Self::ClientError(ClientError::RequestFailed(error))
    }
}

/// The requested date was not part of the range a [`BoxOffice`](crate::BoxOffice) was built from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("box office for `{0}` was not scraped")]
pub struct NotScrappedDate(pub NaiveDate);

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MovieError {
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    ParseError(#[from] ParseError),
    /// An element the popup has at most one of is missing, e.g. the main
    /// poster anchor or the synopsis block.
    #[error("no {0} found on movie detail popup")]
    NotFound(&'static str),
}

impl From<reqwest::Error> for MovieError {
    fn from(error: reqwest::Error) -> Self {
        Self::ClientError(ClientError::RequestFailed(error))
    }
}
