use std::io;
use std::path::PathBuf;

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    Compression,
    Format,
    Usage,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Tick file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("Compression failed: {0}")]
    Compression(#[source] io::Error),

    #[error("Invalid tick file: {0}")]
    Format(#[from] FormatError),

    /// A read operation was called before a successful `load`.
    #[error("You should call `load` before `{0}`")]
    NotLoaded(&'static str),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(_) => ErrorKind::Io,
            Error::Compression(_) => ErrorKind::Compression,
            Error::Format(_) => ErrorKind::Format,
            Error::NotLoaded(_) => ErrorKind::Usage,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("File is {len} bytes, shorter than the header")]
    Truncated { len: usize },

    #[error("Header line is not newline terminated")]
    UnterminatedHeader,

    #[error("Header is not valid JSON: {0}")]
    Header(#[from] serde_json::Error),

    #[error("Header line of {0} bytes does not fit the header region")]
    HeaderTooLarge(usize),

    #[error("Unsupported storage version: {0}")]
    UnsupportedVersion(u32),

    #[error("Payload decompression failed: {0}")]
    Decompress(#[source] io::Error),

    #[error("Decoded payload of {len} bytes is not a multiple of the {stride}-byte record")]
    PartialRecord { len: usize, stride: usize },

    #[error("Header declares {expected} ticks, payload holds {actual}")]
    CountMismatch { expected: u64, actual: u64 },

    #[error("Payload checksum mismatch")]
    ChecksumMismatch,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::NotFound(PathBuf::from("x")).kind(), ErrorKind::NotFound);
        assert_eq!(Error::NotLoaded("next_tick").kind(), ErrorKind::Usage);
        assert_eq!(
            Error::from(FormatError::UnsupportedVersion(7)).kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Error::from(io::Error::other("disk full")).kind(),
            ErrorKind::Io
        );
    }

    #[test]
    fn test_not_loaded_message() {
        let err = Error::NotLoaded("next_tick");
        assert_eq!(err.to_string(), "You should call `load` before `next_tick`");
    }
}
