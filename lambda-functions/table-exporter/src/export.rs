use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::export_table_to_point_in_time::{
    ExportTableToPointInTimeError, ExportTableToPointInTimeOutput,
};
use aws_sdk_dynamodb::primitives::DateTime as AwsDateTime;
use aws_sdk_dynamodb::types;
use aws_sdk_dynamodb::Client as DynamoClient;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    #[default]
    DynamodbJson,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DynamodbJson => "DYNAMODB_JSON",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ExportFormat> for types::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::DynamodbJson => types::ExportFormat::DynamodbJson,
        }
    }
}

/// One point-in-time export, built fresh for every invocation.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(on(String, into))]
pub struct ExportRequest {
    pub table_arn: String,
    #[builder(default)]
    pub export_format: ExportFormat,
    pub s3_bucket: String,
    pub s3_prefix: String,
}

/// The job descriptor returned when an export is started.
///
/// Keys follow the service's wire names so the serialized body reads the same
/// as the raw API response. Timestamps serialize as RFC 3339 strings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ExportTableOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_description: Option<ExportDescription>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ExportDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_manifest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_sse_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_sse_kms_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billed_size_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental_export_specification: Option<IncrementalExportSpecification>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct IncrementalExportSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_from_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_to_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_view_type: Option<String>,
}

impl From<&types::IncrementalExportSpecification> for IncrementalExportSpecification {
    fn from(spec: &types::IncrementalExportSpecification) -> Self {
        Self {
            export_from_time: spec.export_from_time().and_then(to_chrono),
            export_to_time: spec.export_to_time().and_then(to_chrono),
            export_view_type: spec.export_view_type().map(|v| v.as_str().to_string()),
        }
    }
}

impl From<&types::ExportDescription> for ExportDescription {
    fn from(desc: &types::ExportDescription) -> Self {
        Self {
            export_arn: desc.export_arn().map(str::to_string),
            export_status: desc.export_status().map(|s| s.as_str().to_string()),
            start_time: desc.start_time().and_then(to_chrono),
            end_time: desc.end_time().and_then(to_chrono),
            export_manifest: desc.export_manifest().map(str::to_string),
            table_arn: desc.table_arn().map(str::to_string),
            table_id: desc.table_id().map(str::to_string),
            export_time: desc.export_time().and_then(to_chrono),
            client_token: desc.client_token().map(str::to_string),
            s3_bucket: desc.s3_bucket().map(str::to_string),
            s3_bucket_owner: desc.s3_bucket_owner().map(str::to_string),
            s3_prefix: desc.s3_prefix().map(str::to_string),
            s3_sse_algorithm: desc.s3_sse_algorithm().map(|a| a.as_str().to_string()),
            s3_sse_kms_key_id: desc.s3_sse_kms_key_id().map(str::to_string),
            failure_code: desc.failure_code().map(str::to_string),
            failure_message: desc.failure_message().map(str::to_string),
            export_format: desc.export_format().map(|f| f.as_str().to_string()),
            billed_size_bytes: desc.billed_size_bytes(),
            item_count: desc.item_count(),
            export_type: desc.export_type().map(|t| t.as_str().to_string()),
            incremental_export_specification: desc
                .incremental_export_specification()
                .map(IncrementalExportSpecification::from),
        }
    }
}

impl From<ExportTableToPointInTimeOutput> for ExportTableOutput {
    fn from(output: ExportTableToPointInTimeOutput) -> Self {
        Self {
            export_description: output.export_description().map(ExportDescription::from),
        }
    }
}

fn to_chrono(value: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(value.secs(), value.subsec_nanos())
}

/// Starts point-in-time exports. Implemented by [`DynamoExporter`] and mocked in tests.
#[allow(async_fn_in_trait)]
pub trait TableExporter {
    async fn export_table(&self, request: ExportRequest) -> Result<ExportTableOutput, ExportError>;
}

pub struct DynamoExporter {
    pub dynamo_client: DynamoClient,
}

impl DynamoExporter {
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::with_client(DynamoClient::new(&config))
    }

    pub fn with_client(dynamo_client: DynamoClient) -> Self {
        Self { dynamo_client }
    }
}

impl TableExporter for DynamoExporter {
    async fn export_table(&self, request: ExportRequest) -> Result<ExportTableOutput, ExportError> {
        info!(
            "Exporting {} to s3://{}/{} as {}",
            request.table_arn, request.s3_bucket, request.s3_prefix, request.export_format
        );

        let output = self
            .dynamo_client
            .export_table_to_point_in_time()
            .table_arn(request.table_arn)
            .export_format(request.export_format.into())
            .s3_bucket(request.s3_bucket)
            .s3_prefix(request.s3_prefix)
            .send()
            .await?;

        Ok(ExportTableOutput::from(output))
    }
}

impl From<SdkError<ExportTableToPointInTimeError, HttpResponse>> for ExportError {
    fn from(err: SdkError<ExportTableToPointInTimeError, HttpResponse>) -> Self {
        match err.as_service_error() {
            Some(service_err) => ExportError::Service {
                code: service_err.code().unwrap_or("Unknown").to_string(),
                message: service_err
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| service_err.to_string()),
            },
            None => ExportError::Dispatch(DisplayErrorContext(&err).to_string()),
        }
    }
}
