//! Error-code translation.
//!
//! Every native return code in the crate funnels through [`check`]: negative
//! codes become an [`Error`] carrying the failing function and the mapped
//! [`ErrorCode`], non-negative codes pass through unchanged (they are often
//! payload, e.g. sample counts or byte lengths).

use libc::c_int;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reasons, mirroring the native enumeration.
///
/// `Disposed` is binding-local: it is raised when a session is used after
/// [`close`](crate::Encoder::close) and never comes out of a native call.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorCode {
    /// One or more invalid/out of range arguments.
    BadArg = -1,
    /// Not enough bytes allocated in the buffer.
    BufferTooSmall = -2,
    /// An internal error was detected.
    InternalError = -3,
    /// The compressed data passed is corrupted.
    InvalidPacket = -4,
    /// Invalid/unsupported request number.
    Unimplemented = -5,
    /// An encoder or decoder structure is invalid or already freed.
    InvalidState = -6,
    /// Memory allocation has failed.
    AllocFail = -7,
    /// An undefined native error code.
    Unknown = -8,
    /// The session was already closed on our side.
    Disposed = -100,
}

impl ErrorCode {
    fn from_raw(code: c_int) -> ErrorCode {
        match code {
            -1 => ErrorCode::BadArg,
            -2 => ErrorCode::BufferTooSmall,
            -3 => ErrorCode::InternalError,
            -4 => ErrorCode::InvalidPacket,
            -5 => ErrorCode::Unimplemented,
            -6 => ErrorCode::InvalidState,
            -7 => ErrorCode::AllocFail,
            _ => ErrorCode::Unknown,
        }
    }

    /// A human-readable description of the error code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::BadArg => "invalid argument",
            ErrorCode::BufferTooSmall => "buffer too small",
            ErrorCode::InternalError => "internal error",
            ErrorCode::InvalidPacket => "corrupted stream",
            ErrorCode::Unimplemented => "request not implemented",
            ErrorCode::InvalidState => "invalid state",
            ErrorCode::AllocFail => "memory allocation failed",
            ErrorCode::Unknown => "unknown error",
            ErrorCode::Disposed => "session already closed",
        }
    }
}

/// An error from a libopus call, tagged with the function that failed.
#[derive(Debug, thiserror::Error)]
#[error("{function}: {}", .code.description())]
pub struct Error {
    function: &'static str,
    code: ErrorCode,
}

impl Error {
    pub(crate) fn native(function: &'static str, code: c_int) -> Error {
        Error {
            function,
            code: ErrorCode::from_raw(code),
        }
    }

    pub(crate) fn disposed(function: &'static str) -> Error {
        Error {
            function,
            code: ErrorCode::Disposed,
        }
    }

    /// The name of the native function this error came from.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// The failure reason.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// A human-readable description of the failure.
    pub fn description(&self) -> &'static str {
        self.code.description()
    }

    /// True for the binding-local use-after-close error.
    pub fn is_disposed(&self) -> bool {
        self.code == ErrorCode::Disposed
    }
}

pub(crate) fn check(what: &'static str, code: c_int) -> Result<c_int> {
    if code < 0 {
        Err(Error::native(what, code))
    } else {
        Ok(code)
    }
}
