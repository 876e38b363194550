use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    error::{Error, Result},
    models::{DynamicConfig, Tag, TargetApp},
};

/// Only used to percent-encode path segments.
const SEGMENT_BASE: &str = "http://statsig.invalid/";

/// Which mutations the console API accepts for an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub updatable: bool,
    pub deletable: bool,
}

/// How a single entity is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// `GET <collection>/<key>`
    Direct,
    /// List the collection and match locally, for APIs without a get-by-name endpoint.
    Scan,
}

/// A remote-owned object living under one console API collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: &'static str;
    const COLLECTION: &'static str;
    const CAPABILITIES: Capabilities;
    const LOOKUP: Lookup;

    fn id(&self) -> Option<&str>;

    fn name(&self) -> &str;

    /// Path segment addressing this entity under its collection.
    fn key(&self) -> &str {
        self.name()
    }

    fn matches(&self, key: &str) -> bool {
        self.name() == key || self.id() == Some(key)
    }

    /// Drops fields the server assigns, so they are never sent back.
    fn clear_server_fields(&mut self);
}

/// `<collection>/<key>`, with the key encoded as a single path segment.
pub(crate) fn item_path<E: Entity>(key: &str) -> Result<String> {
    let mut url = Url::parse(SEGMENT_BASE)?;
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("cannot build a path for {} '{}'", E::KIND, key)))?
        .clear()
        .push(E::COLLECTION)
        .push(key);
    Ok(url.path().trim_start_matches('/').to_string())
}

impl Entity for Tag {
    const KIND: &'static str = "tag";
    const COLLECTION: &'static str = "tags";
    const CAPABILITIES: Capabilities = Capabilities {
        updatable: false,
        deletable: false,
    };
    const LOOKUP: Lookup = Lookup::Scan;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clear_server_fields(&mut self) {
        self.id = None;
    }
}

impl Entity for TargetApp {
    const KIND: &'static str = "target app";
    const COLLECTION: &'static str = "target_apps";
    const CAPABILITIES: Capabilities = Capabilities {
        updatable: true,
        deletable: true,
    };
    const LOOKUP: Lookup = Lookup::Direct;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clear_server_fields(&mut self) {
        self.id = None;
    }
}

impl Entity for DynamicConfig {
    const KIND: &'static str = "dynamic config";
    const COLLECTION: &'static str = "dynamic_configs";
    const CAPABILITIES: Capabilities = Capabilities {
        updatable: true,
        deletable: true,
    };
    const LOOKUP: Lookup = Lookup::Direct;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Addressed by id once the server has assigned one.
    fn key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.name,
        }
    }

    fn clear_server_fields(&mut self) {
        self.id = None;
        self.last_modifier_name = None;
        self.last_modifier_email = None;
        self.creator_name = None;
        self.creator_email = None;
    }
}
