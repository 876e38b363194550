use serde::{Deserialize, Serialize};

use crate::{models::TargetApp, resources::Record};

/// `statsig_target_app` record. Statsig references target apps by name,
/// the id is informational.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetAppModel {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub gates: Vec<String>,
    #[serde(default)]
    pub dynamic_configs: Vec<String>,
    #[serde(default)]
    pub experiments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetAppsDataSourceModel {
    pub target_apps: Vec<TargetAppModel>,
}

impl From<Vec<TargetAppModel>> for TargetAppsDataSourceModel {
    fn from(target_apps: Vec<TargetAppModel>) -> Self {
        Self { target_apps }
    }
}

impl Record for TargetAppModel {
    type Entity = TargetApp;
    type Listing = TargetAppsDataSourceModel;

    const RESOURCE_TYPE: &'static str = "target_app";
    const DATA_SOURCE_TYPE: &'static str = "target_apps";

    fn to_entity(&self) -> TargetApp {
        TargetApp {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            gates: self.gates.clone(),
            dynamic_configs: self.dynamic_configs.clone(),
            experiments: self.experiments.clone(),
        }
    }

    fn from_entity(app: TargetApp) -> Self {
        Self {
            id: app.id,
            name: app.name,
            description: app.description,
            gates: app.gates,
            dynamic_configs: app.dynamic_configs,
            experiments: app.experiments,
        }
    }
}
