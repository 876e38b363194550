//! Declarative records and the resources that reconcile them.
//!
//! A record is the snake_case shape the host engine plans and stores. Each
//! resource translates a record into its wire entity, performs one console
//! call, and translates the response back into the record to store.
use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{event, Level};

use crate::{
    client::Client,
    entity::Entity,
    error::{Error, ErrorKind},
};

pub mod dynamic_config;
pub mod tag;
pub mod target_app;

pub use dynamic_config::{
    DynamicConfigModel, DynamicConfigRuleConditionModel, DynamicConfigRuleModel,
    DynamicConfigsDataSourceModel,
};
pub use tag::{TagModel, TagsDataSourceModel};
pub use target_app::{TargetAppModel, TargetAppsDataSourceModel};

pub type TagResource = Resource<TagModel>;
pub type TargetAppResource = Resource<TargetAppModel>;
pub type DynamicConfigResource = Resource<DynamicConfigModel>;

pub type TagsDataSource = DataSource<TagModel>;
pub type TargetAppsDataSource = DataSource<TargetAppModel>;
pub type DynamicConfigsDataSource = DataSource<DynamicConfigModel>;

/// Error reported back to the host engine for a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{summary}: {detail}")]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
    pub kind: ErrorKind,
}

impl Diagnostic {
    pub fn from_error(summary: impl Into<String>, err: &Error) -> Self {
        Self {
            summary: summary.into(),
            detail: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// A declarative record backed by one console entity.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + Sized {
    type Entity: Entity;
    type Listing: From<Vec<Self>> + Serialize;

    /// Resource type name, without the provider prefix.
    const RESOURCE_TYPE: &'static str;
    /// Data source type name, without the provider prefix.
    const DATA_SOURCE_TYPE: &'static str;

    fn to_entity(&self) -> Self::Entity;

    fn from_entity(entity: Self::Entity) -> Self;

    /// Key of the remote entity this record was stored from.
    fn remote_key(&self) -> String {
        self.to_entity().key().to_string()
    }

    /// The record to store after a create or update returned `remote`.
    fn with_remote(self, remote: Self::Entity) -> Self {
        Self::from_entity(remote)
    }
}

pub struct Resource<R: Record> {
    client: Arc<Client>,
    record: PhantomData<R>,
}

impl<R: Record> Resource<R> {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            record: PhantomData,
        }
    }

    pub async fn create(&self, plan: R) -> Result<R, Diagnostic> {
        let created = self
            .client
            .create(&plan.to_entity())
            .await
            .map_err(|e| self.diagnostic("creating", &e))?;
        event!(
            Level::TRACE,
            "{} created with name {} and id {:?}",
            R::RESOURCE_TYPE,
            created.name(),
            created.id()
        );
        Ok(plan.with_remote(created))
    }

    pub async fn read(&self, state: &R) -> Result<R, Diagnostic> {
        let remote = self
            .client
            .get::<R::Entity>(&state.remote_key())
            .await
            .map_err(|e| self.diagnostic("reading", &e))?;
        Ok(R::from_entity(remote))
    }

    pub async fn update(&self, plan: R, state: &R) -> Result<R, Diagnostic> {
        let updated = self
            .client
            .update(&state.remote_key(), &plan.to_entity())
            .await
            .map_err(|e| self.diagnostic("updating", &e))?;
        Ok(plan.with_remote(updated))
    }

    pub async fn delete(&self, state: &R) -> Result<(), Diagnostic> {
        self.client
            .delete::<R::Entity>(&state.remote_key())
            .await
            .map_err(|e| self.diagnostic("deleting", &e))
    }

    /// Builds the state of an existing remote entity, addressed by name or id.
    pub async fn import_state(&self, key: &str) -> Result<R, Diagnostic> {
        let remote = self
            .client
            .get::<R::Entity>(key)
            .await
            .map_err(|e| self.diagnostic("importing", &e))?;
        Ok(R::from_entity(remote))
    }

    fn diagnostic(&self, action: &str, err: &Error) -> Diagnostic {
        event!(
            Level::ERROR,
            "error {} {}: {}",
            action,
            R::RESOURCE_TYPE,
            err
        );
        Diagnostic::from_error(format!("Error {} {}", action, R::Entity::KIND), err)
    }
}

pub struct DataSource<R: Record> {
    client: Arc<Client>,
    record: PhantomData<R>,
}

impl<R: Record> DataSource<R> {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            record: PhantomData,
        }
    }

    pub async fn read(&self) -> Result<R::Listing, Diagnostic> {
        let entities = self.client.list::<R::Entity>().await.map_err(|e| {
            Diagnostic::from_error(format!("Unable to read statsig {}", R::DATA_SOURCE_TYPE), &e)
        })?;
        let records: Vec<R> = entities.into_iter().map(R::from_entity).collect();
        Ok(R::Listing::from(records))
    }
}
