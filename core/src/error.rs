use std::fmt::Display;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Message(String),
    /// Malformed JSON text or bytes, or a native value with no `Value` shape.
    Parsing(String),
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    /// (field name)
    MissingRequiredField(String),
    /// (type name)
    FailedToInitializeObject(String),
    Io(String),
}

impl Error {
    pub fn parsing(error: impl Display) -> Self {
        Self::Parsing(error.to_string())
    }

    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Message(msg) => formatter.write_str(msg),
            Error::Parsing(msg) => write!(formatter, "could not parse data: {}", msg),
            Error::TypeMismatch { expected, found } => {
                write!(formatter, "expected {} value, found {}", expected, found)
            }
            Error::IndexOutOfRange { index, len } => write!(
                formatter,
                "index {} is out of range for sequence of length {}",
                index, len
            ),
            Error::MissingRequiredField(name) => {
                write!(formatter, "missing required field `{}`", name)
            }
            Error::FailedToInitializeObject(name) => {
                write!(formatter, "failed to initialize `{}` from data", name)
            }
            Error::Io(msg) => write!(formatter, "i/o error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
