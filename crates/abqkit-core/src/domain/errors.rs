use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AbqResult<T> = Result<T, AbqError>;
pub type ParserResult<T> = AbqResult<T>;
pub type ToolResult<T> = AbqResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbqErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl AbqErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

/// Crate-wide error carrying a category, a stable dotted code and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbqError {
    category: AbqErrorCategory,
    code: &'static str,
    message: String,
}

impl AbqError {
    pub fn new(category: AbqErrorCategory, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(AbqErrorCategory::InputValidationError, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(AbqErrorCategory::IoSystemError, code, message)
    }

    pub fn computation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(AbqErrorCategory::ComputationError, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(AbqErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> AbqErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.code, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for AbqError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.code,
            self.message
        )
    }
}

impl Error for AbqError {}
