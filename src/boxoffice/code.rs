//! Extraction of a movie's standard code from the `onclick` handler of its
//! ranking row link.
//!
//! The handler is generated by the site and looks like:
//!
//! ```text
//! mstView('movie','20231234');return false;
//! ```
//!
//! Grammar:
//!
//! - the value is split on [`DELIMITER`] (`','`);
//! - the second token is cut at [`TERMINATOR`] (`');`), if it has one;
//! - what is left must be the whole code, an unsigned integer.
//!
//! So `mstView('movie','12345','x');` still gives `12345`, while
//! `mstView('movie','12345')` fails since `12345')` is not a number.

use crate::stdx::error::{Invariant, ParseError};

const DELIMITER: &str = "','";
const TERMINATOR: &str = "');";

pub(super) fn parse(onclick: &str) -> Result<u32, ParseError> {
    let token = onclick.split(DELIMITER).nth(1).invariant(format!(
        "ranking row `onclick` should have a `{DELIMITER}` delimiter, got `{onclick}`"
    ))?;

    let code = token
        .split_once(TERMINATOR)
        .map_or(token, |(code, _)| code);

    code.parse::<u32>().invariant(format!(
        "ranking row `onclick` code should be a number, got `{code}`"
    ))
}
