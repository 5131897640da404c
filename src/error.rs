/// Failure category of an [`AppError`].
///
/// Each kind maps to a process exit code for the one-shot CLI commands. The TUI
/// never exits on these; it shows the message and waits for the next input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable file, unreadable header, or required columns absent.
    MalformedInput,
    /// Forecast range violates `start < end` or the year bounds.
    InvalidRange,
    /// Too few historical points for a quadratic fit.
    InsufficientData,
    /// Anything else: solver failure, non-finite numbers, IO/terminal faults.
    Runtime,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::MalformedInput => 2,
            ErrorKind::InvalidRange | ErrorKind::InsufficientData => 3,
            ErrorKind::Runtime => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedInput, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::malformed("x").exit_code(), 2);
        assert_eq!(AppError::new(ErrorKind::InvalidRange, "x").exit_code(), 3);
        assert_eq!(AppError::new(ErrorKind::InsufficientData, "x").exit_code(), 3);
        assert_eq!(AppError::runtime("x").exit_code(), 4);
    }

    #[test]
    fn display_is_the_message() {
        let err = AppError::malformed("Missing required column: `year`");
        assert_eq!(err.to_string(), "Missing required column: `year`");
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
}
