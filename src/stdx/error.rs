use thiserror::Error;

macro_rules! invariant {
    ($msg:literal $(, $args:expr)* ) => {{
        return Err($crate::stdx::error::ParseError::from(format!($msg $(, $args)*)).into());
    }};
    ($cond:expr, $msg:literal $(, $args:expr)* ) => {{
        if !$cond {
            return Err($crate::stdx::error::ParseError::from(format!("`{}`, {}", stringify!($cond), format!($msg $(, $args)*))).into());
        }
    }};
}

pub(crate) use invariant;

/// The markup returned by `kobis.or.kr` did not have the expected shape.
///
/// The site has no documented contract for its pages, so every piece of
/// structure this crate relies on is checked. When one of those checks fails,
/// this error carries a message naming what was expected.
///
/// This is not actionable by the library user beyond reporting it: it means
/// the site layout changed and the scraper needs updating.
#[derive(Debug, Error)]
#[error("unexpected page structure: {0}")]
pub struct ParseError(String);

impl From<String> for ParseError {
    #[inline]
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

impl From<&str> for ParseError {
    #[inline]
    fn from(msg: &str) -> Self {
        Self(msg.to_owned())
    }
}

pub(crate) trait Invariant<T> {
    type Output;

    fn invariant(self, msg: impl Into<String>) -> Self::Output;
}

impl<T> Invariant<T> for Option<T> {
    type Output = Result<T, ParseError>;

    #[inline]
    fn invariant(self, msg: impl Into<String>) -> Self::Output {
        self.ok_or_else(|| ParseError(msg.into()))
    }
}

impl<T, E: std::fmt::Display> Invariant<T> for Result<T, E> {
    type Output = Result<T, ParseError>;

    #[inline]
    fn invariant(self, msg: impl Into<String>) -> Self::Output {
        self.map_err(|err| ParseError(format!("{}: {err}", msg.into())))
    }
}
