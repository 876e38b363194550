use serde::{Deserialize, Serialize};

use crate::{models::Tag, resources::Record};

/// `statsig_tag` record. Tags cannot be changed or removed once created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagModel {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub is_core: bool,
}

/// `statsig_tags` data source record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagsDataSourceModel {
    pub tags: Vec<TagModel>,
}

impl From<Vec<TagModel>> for TagsDataSourceModel {
    fn from(tags: Vec<TagModel>) -> Self {
        Self { tags }
    }
}

impl Record for TagModel {
    type Entity = Tag;
    type Listing = TagsDataSourceModel;

    const RESOURCE_TYPE: &'static str = "tag";
    const DATA_SOURCE_TYPE: &'static str = "tags";

    fn to_entity(&self) -> Tag {
        Tag {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            is_core: self.is_core,
        }
    }

    fn from_entity(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            description: tag.description,
            is_core: tag.is_core,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tag_model_defaults() {
        let model: TagModel =
            serde_json::from_value(json!({"name": "billing", "description": "Billing team"}))
                .expect("should parse");
        assert_eq!(None, model.id);
        assert!(!model.is_core);

        let tag = model.to_entity();
        assert_eq!(
            json!({"name": "billing", "description": "Billing team", "isCore": false}),
            serde_json::to_value(&tag).expect("should encode")
        );
        assert_eq!(model, TagModel::from_entity(tag));
    }
}
