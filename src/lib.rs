//! Implements a client for the statsig console API and the declarative
//! resources built on it: tags, target apps and dynamic configs.
//!
//! The console api key is read from the provider configuration, or from the
//! STATSIG_CONSOLE_KEY environment variable when it is not set explicitly.
//!
//! Reference: https://docs.statsig.com/console-api/introduction
mod client;
mod entity;
mod error;
mod http;

pub mod metadata;
pub mod models;
pub mod provider;
pub mod resources;

pub use crate::client::{Client, ConsoleOptions};
pub use crate::entity::{Capabilities, Entity, Lookup};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::http::{QueryParams, StatsigHttpClient, REQUEST_TIMEOUT};
pub use crate::provider::{Provider, ProviderConfig};
