use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub passes: Option<usize>,
    pub books: Option<usize>,
    #[serde(alias = "shelf")]
    pub shelves: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub verify: Option<bool>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Durations accept either bare seconds or the CLI's `<n><unit>` form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(0) => Err(invalid_duration(field, ValidationError::DurationZero)),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => match parse_duration_arg(text) {
                Ok(duration) => Ok(duration),
                Err(AppError::Validation(source)) => Err(invalid_duration(field, source)),
                Err(other) => Err(other),
            },
        }
    }
}

fn invalid_duration(field: &str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidDuration {
        field: field.to_owned(),
        source,
    })
}
