use chrono::Local;
use serde::{Deserialize, Serialize};

/// Build metadata stamped at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub name: String,
    pub group: String,
    pub version: String,
    pub commit_hash: String,
    pub build_number: String,
    pub build_date: String,
    pub build_location: String,
}

impl BuildInfo {
    /// Missing build stamps are left empty, except the date which falls back
    /// to the current local time.
    pub fn from_build_env() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            group: option_env!("BUILD_GROUP").unwrap_or_default().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit_hash: option_env!("GIT_COMMIT").unwrap_or_default().to_string(),
            build_number: option_env!("BUILD_NUMBER").unwrap_or_default().to_string(),
            build_date: option_env!("BUILD_DATE")
                .map(str::to_string)
                .unwrap_or_else(|| Local::now().format("%Y-%m-%dT%H:%M:%S%z").to_string()),
            build_location: option_env!("BUILD_LOCATION").unwrap_or_default().to_string(),
        }
    }
}
