use std::io;

#[derive(Fail, Debug, is_enum_variant)]
pub enum EncodeError {
    #[fail(display = "Invalid digit {:?} at position {} of phone number", character, position)]
    InvalidDigit {
        character: char,
        position: usize
    },
    #[fail(display = "Destination phone number is empty")]
    EmptyDestination,
    #[fail(display = "Phone number has {} digits; an address holds at most 20", _0)]
    NumberTooLong(usize),
    #[fail(display = "Message text is {} characters long; a single SMS holds at most 160", _0)]
    TextTooLong(usize),
    #[fail(display = "Output buffer too small: {} bytes needed, {} available", needed, available)]
    BufferTooSmall {
        needed: usize,
        available: usize
    },
    #[fail(display = "Invalid hex string")]
    InvalidHex,
    #[fail(display = "An I/O error occurred: {}", _0)]
    Io(#[cause] io::Error)
}
impl From<io::Error> for EncodeError {
    fn from(e: io::Error) -> EncodeError {
        EncodeError::Io(e)
    }
}
pub type EncodeResult<T> = Result<T, EncodeError>;
