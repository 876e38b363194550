use serde::{Deserialize, Serialize};

use crate::{
    models::{
        default_enabled, default_id_type, ConfigValue, DynamicConfig, DynamicConfigRule,
        DynamicConfigRuleCondition,
    },
    resources::Record,
};

/// `statsig_dynamic_config` record.
///
/// `id`, `last_modifier_*` and `creator_*` are computed by Statsig and
/// ignored when planned.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DynamicConfigModel {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_id_type")]
    pub id_type: String,
    #[serde(default)]
    pub last_modifier_name: Option<String>,
    #[serde(default)]
    pub last_modifier_email: Option<String>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub creator_email: Option<String>,
    #[serde(default)]
    pub target_apps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub holdout_ids: Vec<String>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub rules: Vec<DynamicConfigRuleModel>,
    pub default_value: ConfigValue,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DynamicConfigRuleModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub base_id: Option<String>,
    pub name: String,
    pub pass_percentage: f64,
    #[serde(default)]
    pub conditions: Vec<DynamicConfigRuleConditionModel>,
    pub return_value: ConfigValue,
    #[serde(default)]
    pub environments: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DynamicConfigRuleConditionModel {
    pub r#type: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub target_value: Option<ConfigValue>,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DynamicConfigsDataSourceModel {
    pub dynamic_configs: Vec<DynamicConfigModel>,
}

impl From<Vec<DynamicConfigModel>> for DynamicConfigsDataSourceModel {
    fn from(dynamic_configs: Vec<DynamicConfigModel>) -> Self {
        Self { dynamic_configs }
    }
}

impl From<&DynamicConfigRuleConditionModel> for DynamicConfigRuleCondition {
    fn from(condition: &DynamicConfigRuleConditionModel) -> Self {
        Self {
            r#type: condition.r#type.clone(),
            operator: condition.operator.clone(),
            target_value: condition.target_value.clone(),
            field: condition.field.clone(),
        }
    }
}

impl From<DynamicConfigRuleCondition> for DynamicConfigRuleConditionModel {
    fn from(condition: DynamicConfigRuleCondition) -> Self {
        Self {
            r#type: condition.r#type,
            operator: condition.operator,
            target_value: condition.target_value,
            field: condition.field,
        }
    }
}

impl From<&DynamicConfigRuleModel> for DynamicConfigRule {
    fn from(rule: &DynamicConfigRuleModel) -> Self {
        Self {
            id: rule.id.clone(),
            base_id: rule.base_id.clone(),
            name: rule.name.clone(),
            pass_percentage: rule.pass_percentage,
            conditions: rule.conditions.iter().map(Into::into).collect(),
            return_value: rule.return_value.clone(),
            environments: rule.environments.clone(),
        }
    }
}

impl From<DynamicConfigRule> for DynamicConfigRuleModel {
    fn from(rule: DynamicConfigRule) -> Self {
        Self {
            id: rule.id,
            base_id: rule.base_id,
            name: rule.name,
            pass_percentage: rule.pass_percentage,
            conditions: rule.conditions.into_iter().map(Into::into).collect(),
            return_value: rule.return_value,
            environments: rule.environments,
        }
    }
}

impl Record for DynamicConfigModel {
    type Entity = DynamicConfig;
    type Listing = DynamicConfigsDataSourceModel;

    const RESOURCE_TYPE: &'static str = "dynamic_config";
    const DATA_SOURCE_TYPE: &'static str = "dynamic_configs";

    fn to_entity(&self) -> DynamicConfig {
        DynamicConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            id_type: self.id_type.clone(),
            last_modifier_name: self.last_modifier_name.clone(),
            last_modifier_email: self.last_modifier_email.clone(),
            creator_name: self.creator_name.clone(),
            creator_email: self.creator_email.clone(),
            target_apps: self.target_apps.clone(),
            tags: self.tags.clone(),
            team: self.team.clone(),
            holdout_ids: self.holdout_ids.clone(),
            is_enabled: self.is_enabled,
            rules: self.rules.iter().map(Into::into).collect(),
            default_value: self.default_value.clone(),
        }
    }

    fn from_entity(config: DynamicConfig) -> Self {
        Self {
            id: config.id,
            name: config.name,
            description: config.description,
            id_type: config.id_type,
            last_modifier_name: config.last_modifier_name,
            last_modifier_email: config.last_modifier_email,
            creator_name: config.creator_name,
            creator_email: config.creator_email,
            target_apps: config.target_apps,
            tags: config.tags,
            team: config.team,
            holdout_ids: config.holdout_ids,
            is_enabled: config.is_enabled,
            rules: config.rules.into_iter().map(Into::into).collect(),
            default_value: config.default_value,
        }
    }

    /// Planned optional fields the server leaves out of its response are
    /// kept, everything else comes from the response.
    fn with_remote(self, remote: DynamicConfig) -> Self {
        let planned_description = self.description;
        let planned_team = self.team;
        let mut state = Self::from_entity(remote);
        if state.description.as_deref().map_or(true, str::is_empty) {
            state.description = planned_description;
        }
        if state.team.as_deref().map_or(true, str::is_empty) {
            state.team = planned_team;
        }
        state
    }
}
