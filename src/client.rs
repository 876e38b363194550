use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{event, Level};

use crate::{
    entity::{item_path, Entity, Lookup},
    error::{Error, Result},
    http::{QueryParams, StatsigHttpClient},
    models::{ApiAckResponse, ApiListResponse, ApiResponse},
};

/// Only the first page is ever requested.
const PAGE: &str = "1";
const PAGE_SIZE: &str = "100";

/// Options to use when creating the client, they will override default values, if they exist.
///
/// The default value for api_url is https://statsigapi.net/console/v1
#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    pub api_url: Option<String>,
}

/// Statsig console client. Every call is a single request with no retries
/// and no local state, so one instance is shared by every resource.
pub struct Client {
    http_client: StatsigHttpClient,
}

impl Client {
    pub fn new(api_key: &str, options: ConsoleOptions) -> Result<Arc<Self>> {
        let http_client = StatsigHttpClient::new(api_key, options.api_url)?;
        Ok(Arc::new(Self { http_client }))
    }

    pub async fn list<E: Entity>(&self) -> Result<Vec<E>> {
        self.list_internal()
            .await
            .map_err(|e| e.context(format!("unable to list {}s", E::KIND)))
    }

    /// First entity of the collection page matching `predicate`.
    pub async fn find<E, P>(&self, predicate: P) -> Result<Option<E>>
    where
        E: Entity,
        P: Fn(&E) -> bool,
    {
        let entities: Vec<E> = self.list().await?;
        Ok(entities.into_iter().find(|e| predicate(e)))
    }

    /// Fetches one entity by name, or by id for kinds addressed by id.
    pub async fn get<E: Entity>(&self, key: &str) -> Result<E> {
        match E::LOOKUP {
            Lookup::Direct => self
                .get_direct(key)
                .await
                .map_err(|e| e.context(format!("unable to read {}", E::KIND))),
            Lookup::Scan => self
                .find(|e: &E| e.matches(key))
                .await?
                .ok_or_else(|| Error::NotFound {
                    kind: E::KIND,
                    key: key.to_string(),
                }),
        }
    }

    pub async fn create<E: Entity>(&self, entity: &E) -> Result<E> {
        let mut body = entity.clone();
        body.clear_server_fields();

        let response = self
            .http_client
            .post(E::COLLECTION, Some(&body))
            .await
            .and_then(|r| decode::<ApiResponse<E>>(&r))
            .map_err(|e| e.context(format!("unable to create {}", E::KIND)))?;

        event!(
            Level::DEBUG,
            "{} '{}' created with id {:?}",
            E::KIND,
            response.data.name(),
            response.data.id()
        );
        Ok(response.data)
    }

    /// Replaces the fields of the entity at `key`. Kinds the console API
    /// cannot update fail before any request is made.
    pub async fn update<E: Entity>(&self, key: &str, entity: &E) -> Result<E> {
        if !E::CAPABILITIES.updatable {
            return Err(Error::Unsupported {
                kind: E::KIND,
                operation: "update",
            });
        }

        let mut body = entity.clone();
        body.clear_server_fields();

        let response = self
            .http_client
            .patch(&item_path::<E>(key)?, Some(&body))
            .await
            .and_then(|r| decode::<ApiAckResponse<E>>(&r))
            .map_err(|e| e.context(format!("unable to update {}", E::KIND)))?;

        match response.data {
            Some(updated) => Ok(updated),
            // Some endpoints only acknowledge the patch.
            None => self.get(entity.key()).await,
        }
    }

    pub async fn delete<E: Entity>(&self, key: &str) -> Result<()> {
        if !E::CAPABILITIES.deletable {
            return Err(Error::Unsupported {
                kind: E::KIND,
                operation: "delete",
            });
        }

        self.http_client
            .delete(&item_path::<E>(key)?, None)
            .await
            .map_err(|e| e.context(format!("unable to delete {}", E::KIND)))?;
        event!(Level::DEBUG, "{} '{}' deleted", E::KIND, key);
        Ok(())
    }
}

// Private methods
impl Client {
    async fn list_internal<E: Entity>(&self) -> Result<Vec<E>> {
        let query = QueryParams::from([
            ("page".to_string(), PAGE.to_string()),
            ("limit".to_string(), PAGE_SIZE.to_string()),
        ]);
        let response = self.http_client.get(E::COLLECTION, Some(&query)).await?;
        let parsed = decode::<ApiListResponse<E>>(&response)?;
        event!(
            Level::DEBUG,
            "fetched {} {}s from statsig",
            parsed.data.len(),
            E::KIND
        );
        Ok(parsed.data)
    }

    async fn get_direct<E: Entity>(&self, key: &str) -> Result<E> {
        let response = self.http_client.get(&item_path::<E>(key)?, None).await?;
        Ok(decode::<ApiResponse<E>>(&response)?.data)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        event!(Level::ERROR, "error parsing statsig response: {}", e);
        Error::Decode(e)
    })
}
