use thiserror::Error;

/// Errors raised while decoding, encoding or validating OSC data.
///
/// The four kinds map onto the categories a caller actually needs to
/// distinguish: a malformed datagram on the wire (`Parse`), a value that
/// cannot be serialized (`Build`), an API argument that fails validation
/// before any bytes are touched (`Validation`), and a socket-level failure
/// from the client or server (`Io`).
#[derive(Error, Debug)]
pub enum OscError {
    #[error("bad packet: {0}")]
    BadPacket(&'static str),
    #[error("bad message: {0}")]
    BadMessage(&'static str),
    #[error("bad bundle: {0}")]
    BadBundle(String),
    #[error("bad argument: {0}")]
    BadArg(String),
    #[error("bad address: {0}")]
    BadAddress(String),
    #[error("invalid string: {0}")]
    StringError(std::string::FromUtf8Error),
    #[error("bad time tag: {0}")]
    BadTimeTag(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OscError>;

impl nom::error::ParseError<&[u8]> for OscError {
    fn from_error_kind(_input: &[u8], _kind: nom::error::ErrorKind) -> Self {
        OscError::BadPacket("malformed OSC packet")
    }

    fn append(_input: &[u8], _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl<E> nom::error::FromExternalError<&[u8], E> for OscError
where
    E: std::fmt::Display,
{
    fn from_external_error(_input: &[u8], _kind: nom::error::ErrorKind, e: E) -> Self {
        OscError::BadArg(e.to_string())
    }
}

impl From<crate::types::OscTimeError> for OscError {
    fn from(e: crate::types::OscTimeError) -> Self {
        OscError::BadTimeTag(e.to_string())
    }
}
