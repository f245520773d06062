pub mod arn;
pub mod config;
pub mod error;
pub mod export;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub use arn::InvocationArn;
pub use config::{ExportTarget, Settings};
pub use error::{ExportError, TriggerError};
pub use export::{
    DynamoExporter, ExportDescription, ExportFormat, ExportRequest, ExportTableOutput,
    IncrementalExportSpecification, TableExporter,
};

/// What the hosting platform receives back from an invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    /// A response whose body is `message` encoded as a JSON string.
    pub fn message(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            body: serde_json::Value::String(message.into()).to_string(),
        }
    }

    /// Maps the outcome of an export attempt onto a response.
    ///
    /// Configuration and provider errors become 400 and 500 responses. Any other
    /// error is handed back so the runtime reports the invocation as failed.
    pub fn from_outcome(
        outcome: Result<ExportTableOutput, TriggerError>,
    ) -> Result<Self, TriggerError> {
        match outcome {
            Ok(output) => Ok(Self {
                status_code: 200,
                body: serde_json::to_string(&output)?,
            }),
            Err(err @ TriggerError::MissingConfig) => Ok(Self::message(400, err.to_string())),
            Err(TriggerError::Provider(err)) => {
                error!("Error exporting table: {}", err);
                Ok(Self::message(500, format!("Error exporting table: {}", err)))
            }
            Err(err) => Err(err),
        }
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// S3 prefix for exports started at `now`: the UTC calendar date followed by `/`.
pub fn export_prefix(now: DateTime<Utc>) -> String {
    format!("{}/", now.format("%Y-%m-%d"))
}

pub struct ExportTrigger<E, C = SystemClock> {
    exporter: E,
    clock: C,
}

impl<E: TableExporter> ExportTrigger<E> {
    pub fn new(exporter: E) -> Self {
        Self::with_clock(exporter, SystemClock)
    }
}

impl<E: TableExporter, C: Clock> ExportTrigger<E, C> {
    pub fn with_clock(exporter: E, clock: C) -> Self {
        Self { exporter, clock }
    }

    pub fn build_request(
        &self,
        target: &ExportTarget,
        invoked_function_arn: &str,
    ) -> Result<ExportRequest, TriggerError> {
        let invocation: InvocationArn = invoked_function_arn.parse()?;

        Ok(ExportRequest::builder()
            .table_arn(invocation.table_arn(&target.table_name))
            .export_format(ExportFormat::DynamodbJson)
            .s3_bucket(target.s3_bucket.as_str())
            .s3_prefix(export_prefix(self.clock.now()))
            .build())
    }

    /// Validates settings and starts one export. No response mapping happens here.
    pub async fn start_export(
        &self,
        settings: &Settings,
        invoked_function_arn: &str,
    ) -> Result<ExportTableOutput, TriggerError> {
        settings.log();
        let target = settings.validate()?;
        let request = self.build_request(&target, invoked_function_arn)?;

        let output = self.exporter.export_table(request).await?;

        if let Some(arn) = output
            .export_description
            .as_ref()
            .and_then(|d| d.export_arn.as_deref())
        {
            info!("Started export {}", arn);
        }

        Ok(output)
    }

    pub async fn handle(
        &self,
        settings: &Settings,
        invoked_function_arn: &str,
    ) -> Result<Response, TriggerError> {
        Response::from_outcome(self.start_export(settings, invoked_function_arn).await)
    }
}
