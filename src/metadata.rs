use serde::{Deserialize, Serialize};

pub const SDK_TYPE: &str = "statsig-console-rs";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client identity sent with every console request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsigMetadata {
    pub sdk_type: String,
    pub sdk_version: String,
}

impl StatsigMetadata {
    pub fn current() -> Self {
        Self {
            sdk_type: SDK_TYPE.to_string(),
            sdk_version: SDK_VERSION.to_string(),
        }
    }
}
