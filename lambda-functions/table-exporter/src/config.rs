use tracing::info;

use crate::error::TriggerError;

pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const S3_BUCKET_VAR: &str = "S3_BUCKET";

/// Raw settings as found in the environment. Nothing is checked here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub table_name: Option<String>,
    pub s3_bucket: Option<String>,
}

/// Validated settings: both values present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub table_name: String,
    pub s3_bucket: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            table_name: lookup(TABLE_NAME_VAR),
            s3_bucket: lookup(S3_BUCKET_VAR),
        }
    }

    pub fn log(&self) {
        info!("{}: {}", TABLE_NAME_VAR, display_setting(&self.table_name));
        info!("{}: {}", S3_BUCKET_VAR, display_setting(&self.s3_bucket));
    }

    pub fn validate(&self) -> Result<ExportTarget, TriggerError> {
        match (non_empty(&self.table_name), non_empty(&self.s3_bucket)) {
            (Some(table_name), Some(s3_bucket)) => Ok(ExportTarget {
                table_name: table_name.to_string(),
                s3_bucket: s3_bucket.to_string(),
            }),
            _ => Err(TriggerError::MissingConfig),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn display_setting(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<unset>")
}
