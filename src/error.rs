use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecoderError {
    // Frame source errors
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("Malformed transcript record: {0}")]
    MalformedRecord(&'static str),

    // Frame errors
    #[error("Invalid payload length: expected 8 bytes, found {0}")]
    InvalidPayloadLength(usize),

    // Generic errors
    #[error("Invalid parameter")]
    InvalidParameter,
}

pub type Result<T> = std::result::Result<T, DecoderError>;
