use thiserror::Error;

/// Builds an [`Error::Malformed`] tagged with the source location that detected it.
macro_rules! malformed_error {
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

pub(crate) use malformed_error;

/// Everything that can go wrong while resolving, parsing or describing a class.
#[derive(Error, Debug)]
pub enum Error {
    /// The assembled description could not be rendered as JSON.
    #[error("Failed to serialize API description: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A class referenced by name is not on the class path.
    #[error("Class not found on class path: {0}")]
    ClassNotFound(String),

    /// The input does not start with the class-file magic number.
    #[error("Not a class file (bad magic 0x{0:08X})")]
    NotAClassFile(u32),

    /// A read would have run past the end of the input.
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// The class file is structurally invalid.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// What was wrong
        message: String,
        /// Source file in which the problem was detected
        file: &'static str,
        /// Source line in which the problem was detected
        line: u32,
    },

    /// Filesystem I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A jar on the class path could not be read.
    #[error("Jar error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Invalid user-supplied settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
