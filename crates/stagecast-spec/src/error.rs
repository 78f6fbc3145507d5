//! Error and warning types for document validation and processing.

use thiserror::Error;

/// Error codes for document validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Mapping kind is neither surface-uv nor surface-projection nor a
    /// recognizable mode token
    UnknownMappingKind,
    /// E002: Opacity outside [0, 1] or not finite
    OpacityOutOfRange,
    /// E003: Route rect has non-positive width or height
    DegenerateRouteRect,
    /// E004: Duplicate node id inside a feed graph
    DuplicateGraphNodeId,
    /// E005: Render context source type is neither camera nor asset-store
    UnknownSourceType,
    /// E006: Render context resolution out of range
    InvalidResolution,
    /// E007: Surface UV channel is negative
    NegativeUvChannel,
    /// E008: Duplicate record id inside a document
    DuplicateRecordId,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnknownMappingKind => "E001",
            ErrorCode::OpacityOutOfRange => "E002",
            ErrorCode::DegenerateRouteRect => "E003",
            ErrorCode::DuplicateGraphNodeId => "E004",
            ErrorCode::UnknownSourceType => "E005",
            ErrorCode::InvalidResolution => "E006",
            ErrorCode::NegativeUvChannel => "E007",
            ErrorCode::DuplicateRecordId => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for document validation.
///
/// Warnings flag state the editing session repairs silently or tolerates;
/// they never fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Record has no name
    EmptyName,
    /// W002: Route references a source/destination id not in the graph
    DanglingRouteReference,
    /// W003: Graph node id is not an 8-char hex session id
    MalformedGraphNodeId,
    /// W004: Mapping references an unknown render context
    UnresolvedContextReference,
    /// W005: Mapping or destination references an unknown surface
    UnresolvedSurfaceReference,
    /// W006: Camera context without camera id / asset context without asset id
    MissingSourceIdentity,
    /// W007: Surface has no target binding
    EmptySurfaceTarget,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::EmptyName => "W001",
            WarningCode::DanglingRouteReference => "W002",
            WarningCode::MalformedGraphNodeId => "W003",
            WarningCode::UnresolvedContextReference => "W004",
            WarningCode::UnresolvedSurfaceReference => "W005",
            WarningCode::MissingSourceIdentity => "W006",
            WarningCode::EmptySurfaceTarget => "W007",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
    /// JSON path to the problematic field (e.g., "mappings[0].opacity").
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: WarningCode,
    pub message: String,
    pub path: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for document operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Document validation failed with one or more errors.
    #[error("validation failed with {0} error(s)")]
    ValidationFailed(usize),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of validating a record or document.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Absorbs another result's errors and warnings.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// True when there are no errors (warnings allowed).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}
