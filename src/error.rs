use thiserror::Error;

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type RenderResult<T> = Result<T, RenderError>;

/// Failure while turning a raw template document into a typed view tree.
///
/// These are fatal for the template load and are meant for operators, not end users.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Unknown view type '{view_type}': not registered in the type catalog")]
    UnknownViewType { view_type: String },

    #[error("Missing 'type' discriminant at {path}")]
    MissingDiscriminant { path: String },

    #[error("Missing required field '{field}' for view type '{view_type}'")]
    MissingField { view_type: String, field: String },

    #[error("Field '{field}' for view type '{view_type}' has the wrong shape: expected {expected}")]
    WrongShape {
        view_type: String,
        field: String,
        expected: String,
    },

    #[error("Invalid content_config for view type '{view_type}': {reason}")]
    InvalidContentConfig { view_type: String, reason: String },

    #[error("Invalid condition for view type '{view_type}': {reason}")]
    InvalidCondition { view_type: String, reason: String },

    #[error("Root view type mismatch: expected '{expected}', found '{found}'")]
    RootTypeMismatch { expected: String, found: String },

    #[error("Maximum nesting depth ({max_depth}) exceeded")]
    MaxNestingDepthExceeded { max_depth: usize },

    #[error("View type '{view_type}' is already registered; use register_override to replace it")]
    DuplicateViewType { view_type: String },

    #[error("Invalid view type '{view_type}': must look like 'namespace:name' in lowercase snake case")]
    InvalidDiscriminant { view_type: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for DecodeError {
    fn from(err: serde_yaml::Error) -> Self {
        DecodeError::Yaml(err.to_string())
    }
}

/// Failure while rendering a view tree against a context.
///
/// A render error aborts the whole render pass; no partial output is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Content config key not specified for view type {view_type}")]
    ContentKeyNotSpecified { view_type: String },

    #[error("Content with key {key} not found in view context for view type {view_type}")]
    ContentNotFound { view_type: String, key: String },

    #[error("Expected content of type {expected} for view type {view_type} and key {key} but found {found}")]
    TypeMismatch {
        view_type: String,
        key: String,
        expected: String,
        found: String,
    },

    #[error("Unable to evaluate condition for view type {view_type}: {reason}")]
    ConditionEvaluation { view_type: String, reason: String },
}

impl RenderError {
    /// Discriminant of the view that failed to render.
    pub fn view_type(&self) -> &str {
        match self {
            RenderError::ContentKeyNotSpecified { view_type }
            | RenderError::ContentNotFound { view_type, .. }
            | RenderError::TypeMismatch { view_type, .. }
            | RenderError::ConditionEvaluation { view_type, .. } => view_type,
        }
    }
}
