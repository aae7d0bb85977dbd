use crate::errors::OscError;

use nom::bytes::complete::{tag, take_while1};
use nom::combinator::all_consuming;
use nom::multi::many1;
use nom::sequence::pair;

/// Characters permitted in an OSC address besides the leading `/` separators:
/// letters, digits, and the handful of punctuation characters OSC addresses
/// and their glob-style extensions are built from.
fn is_address_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '?' | '*' | '[' | ']')
}

/// Verify that a string is a well-formed OSC address: either the bare root
/// address `/`, or a string starting with `/` followed by one or more
/// characters from the allowed set.
///
/// # Examples
/// ```
/// use osc_proto::address::verify_address;
///
/// assert!(verify_address("/oscillator/1").is_ok());
/// assert!(verify_address("no leading slash").is_err());
/// ```
pub fn verify_address(input: &str) -> Result<(), OscError> {
    if input == "/" {
        return Ok(());
    }
    match all_consuming::<_, _, nom::error::Error<&str>, _>(many1(pair(
        tag("/"),
        take_while1(is_address_character),
    )))(input)
    {
        Ok(_) => Ok(()),
        Err(_) => Err(OscError::BadAddress(format!("invalid address: {input}"))),
    }
}
