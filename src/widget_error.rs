use thiserror::Error;

/// Errors raised by a [`Container`](crate::Container) while resolving a class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Nothing is bound under the requested class name.
    #[error("no binding for class '{class}'")]
    BindingNotFound { class: String },

    /// The binding exists but building the instance failed.
    #[error("failed to resolve class '{class}': {reason}")]
    Resolution { class: String, reason: String },
}

/// Errors surfaced while invoking widgets or subscribers.
///
/// Unknown widget or group names are not errors; they resolve to `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The resolved instance does not answer to the requested method.
    #[error("call to undefined method {class}@{method}")]
    UndefinedMethod { class: String, method: String },
}

impl WidgetError {
    pub fn undefined_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UndefinedMethod {
            class: class.into(),
            method: method.into(),
        }
    }
}

/// Errors raised while loading or applying a declarations file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to apply declarations: {0}")]
    Apply(#[from] WidgetError),
}
