use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DefaultOnNull};

/// Success envelope for single-item endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Envelope for mutations, which may only acknowledge the request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiAckResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Success envelope for collection endpoints. An empty collection may come
/// back as `"data": null`.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiListResponse<T> {
    #[serde(default)]
    pub message: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A JSON value of any shape, used for default values, rule return values
/// and condition targets.
///
/// Conversion goes through `serde_json::Value`, so integers stay integers
/// and floats stay floats when a value is read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Map(m) => m.get(key),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => ConfigValue::Number(n),
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(a) => {
                ConfigValue::List(a.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(o) => ConfigValue::Map(
                o.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<ConfigValue> for serde_json::Value {
    fn from(v: ConfigValue) -> Self {
        match v {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Bool(b) => serde_json::Value::Bool(b),
            ConfigValue::Number(n) => serde_json::Value::Number(n),
            ConfigValue::String(s) => serde_json::Value::String(s),
            ConfigValue::List(l) => {
                serde_json::Value::Array(l.into_iter().map(serde_json::Value::from).collect())
            }
            ConfigValue::Map(m) => serde_json::Value::Object(
                m.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n.into())
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_core: bool,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetApp {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub gates: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub dynamic_configs: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub experiments: Vec<String>,
}

pub(crate) fn default_id_type() -> String {
    "userID".to_string()
}

pub(crate) fn default_enabled() -> bool {
    true
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicConfig {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_id_type")]
    pub id_type: String,
    pub last_modifier_name: Option<String>,
    pub last_modifier_email: Option<String>,
    pub creator_name: Option<String>,
    pub creator_email: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub target_apps: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tags: Vec<String>,
    pub team: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, rename = "holdoutIDs")]
    pub holdout_ids: Vec<String>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub rules: Vec<DynamicConfigRule>,
    #[serde(default)]
    pub default_value: ConfigValue,
}

impl DynamicConfig {
    pub fn new(name: String) -> Self {
        DynamicConfig {
            id: None,
            name,
            description: None,
            id_type: default_id_type(),
            last_modifier_name: None,
            last_modifier_email: None,
            creator_name: None,
            creator_email: None,
            target_apps: vec![],
            tags: vec![],
            team: None,
            holdout_ids: vec![],
            is_enabled: true,
            rules: vec![],
            default_value: ConfigValue::Null,
        }
    }
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicConfigRule {
    pub id: Option<String>,
    #[serde(rename = "baseID")]
    pub base_id: Option<String>,
    pub name: String,
    pub pass_percentage: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub conditions: Vec<DynamicConfigRuleCondition>,
    #[serde(default)]
    pub return_value: ConfigValue,
    /// `None` applies the rule in every environment.
    pub environments: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicConfigRuleCondition {
    pub r#type: String,
    pub operator: Option<String>,
    pub target_value: Option<ConfigValue>,
    pub field: Option<String>,
}
