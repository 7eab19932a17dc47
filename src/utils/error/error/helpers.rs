//! Helper functions for creating and classifying errors

use super::types::GatewayError;

impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache(message.into())
    }

    pub fn invalid_prompt<S: Into<String>>(message: S) -> Self {
        Self::InvalidPrompt(message.into())
    }

    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error must stop the whole run rather than just the
    /// member or bill that hit it.
    ///
    /// Storage faults, unresolved template placeholders and gateway misuse
    /// abort. Provider faults (including exhausted retries) and validation
    /// problems only fail the unit.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Cache(_)
                | Self::InvalidPrompt(_)
                | Self::Usage(_)
                | Self::Config(_)
                | Self::Io(_)
        )
    }
}
