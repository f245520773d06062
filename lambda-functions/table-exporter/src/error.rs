use thiserror::Error;

/// Everything that can stop an export from being started.
///
/// Only `MissingConfig` and `Provider` are turned into a structured response;
/// the remaining variants surface as a failed invocation.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("TABLE_NAME and S3_BUCKET environment variables are required")]
    MissingConfig,

    #[error("{0}")]
    Provider(ExportError),

    #[error("malformed invocation identifier: {0:?}")]
    MalformedIdentifier(String),

    #[error("export request failed: {0}")]
    Unrecoverable(ExportError),

    #[error("failed to serialize export response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TriggerError {
    /// Whether this error is answered with a structured response rather than propagated.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingConfig | Self::Provider(_))
    }
}

/// Failure reported by a [`TableExporter`](crate::export::TableExporter).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// The service received the request and rejected it.
    #[error("An error occurred ({code}) when calling the ExportTableToPointInTime operation: {message}")]
    Service { code: String, message: String },

    /// The request never produced a service answer (timeout, network, malformed response).
    #[error("{0}")]
    Dispatch(String),
}

impl From<ExportError> for TriggerError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Service { .. } => Self::Provider(err),
            ExportError::Dispatch(_) => Self::Unrecoverable(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ExportError::Service {
            code: "TableNotFoundException".to_string(),
            message: "Table not found".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "An error occurred (TableNotFoundException) when calling the ExportTableToPointInTime operation: Table not found"
        );
    }

    #[test]
    fn test_export_error_classification() {
        let service = TriggerError::from(ExportError::Service {
            code: "AccessDeniedException".to_string(),
            message: "denied".to_string(),
        });
        assert!(matches!(service, TriggerError::Provider(_)));
        assert!(service.is_recoverable());

        let dispatch = TriggerError::from(ExportError::Dispatch("timed out".to_string()));
        assert!(matches!(dispatch, TriggerError::Unrecoverable(_)));
        assert!(!dispatch.is_recoverable());
    }

    #[test]
    fn test_missing_config_message() {
        assert_eq!(
            TriggerError::MissingConfig.to_string(),
            "TABLE_NAME and S3_BUCKET environment variables are required"
        );
        assert!(TriggerError::MissingConfig.is_recoverable());
        assert!(!TriggerError::MalformedIdentifier("bad".to_string()).is_recoverable());
    }
}
