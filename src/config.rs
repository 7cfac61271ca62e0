use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use snafu::ResultExt;

use crate::error::{Error, InvalidConfigSnafu, InvalidEndpointSnafu, Result};
use crate::storage::constants::{
    DEFAULT_HADOOP_ROOT, DEFAULT_HADOOP_URL, DEFAULT_STAGING_DIR,
    HADOOP_ATOMIC_WRITE_DIR_PROPERTY, HADOOP_ROOT_PROPERTY, HADOOP_URL_PROPERTY,
    HADOOP_USER_PROPERTY,
};

/// A read-only source of named configuration values.
pub trait PropertySource {
    fn property(&self, key: &str) -> Option<String>;

    /// Look up `key`, treating blank values as unset.
    fn property_or(&self, key: &str, default: &str) -> String {
        self.property(key)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn property(&self, key: &str) -> Option<String> {
        (**self).property(key)
    }
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Properties read from the process environment.
///
/// `water.connectors.hadoop.url` is looked up as `WATER_CONNECTORS_HADOOP_URL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProperties;

impl EnvProperties {
    pub fn env_key(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl PropertySource for EnvProperties {
    fn property(&self, key: &str) -> Option<String> {
        env::var(Self::env_key(key)).ok()
    }
}

/// Properties loaded from a flat JSON object, e.g.
/// `{"water.connectors.hadoop.url": "webhdfs://namenode:9870"}`.
#[derive(Debug, Clone, Default)]
pub struct JsonProperties {
    values: HashMap<String, String>,
}

impl JsonProperties {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).context(InvalidConfigSnafu { path })
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        let values = serde_json::from_str(content)?;
        Ok(Self { values })
    }
}

impl PropertySource for JsonProperties {
    fn property(&self, key: &str) -> Option<String> {
        self.values.property(key)
    }
}

/// Two property sources where `primary` shadows `fallback`.
#[derive(Debug, Clone)]
pub struct Layered<A, B> {
    pub primary: A,
    pub fallback: B,
}

impl<A: PropertySource, B: PropertySource> PropertySource for Layered<A, B> {
    fn property(&self, key: &str) -> Option<String> {
        self.primary
            .property(key)
            .or_else(|| self.fallback.property(key))
    }
}

/// Client protocol selected by an endpoint URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointScheme {
    /// Native HDFS RPC (`hdfs://`).
    Hdfs,
    /// WebHDFS REST (`webhdfs://`, `swebhdfs://`, `http://`, `https://`).
    WebHdfs,
    /// A local directory standing in for the cluster (`file://`).
    Fs,
}

impl FromStr for EndpointScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hdfs" => Ok(Self::Hdfs),
            "webhdfs" | "swebhdfs" | "http" | "https" => Ok(Self::WebHdfs),
            "file" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedScheme {
                scheme: s.to_string(),
            }),
        }
    }
}

/// Connection URL of the storage cluster, fixed for a connector's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> Result<(&str, &str)> {
        self.0
            .split_once("://")
            .filter(|(scheme, _)| !scheme.is_empty())
            .ok_or_else(|| {
                InvalidEndpointSnafu {
                    endpoint: self.0.clone(),
                }
                .build()
            })
    }

    pub fn scheme(&self) -> Result<EndpointScheme> {
        self.split()?.0.parse()
    }

    /// Everything after `scheme://`: `host:port` for cluster URLs, a directory for `file://`.
    pub fn location(&self) -> &str {
        self.0
            .split_once("://")
            .map(|(_, location)| location)
            .unwrap_or(&self.0)
    }

    /// HTTP form of a WebHDFS endpoint.
    pub fn http_url(&self) -> String {
        match self.split() {
            Ok((scheme, location)) if scheme.eq_ignore_ascii_case("webhdfs") => {
                format!("http://{location}")
            }
            Ok((scheme, location)) if scheme.eq_ignore_ascii_case("swebhdfs") => {
                format!("https://{location}")
            }
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the cluster endpoint, falling back to `hdfs://localhost:8020`.
pub fn resolve_endpoint(properties: &dyn PropertySource) -> Endpoint {
    Endpoint::new(properties.property_or(HADOOP_URL_PROPERTY, DEFAULT_HADOOP_URL))
}

/// Everything needed to open a connector against one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub endpoint: Endpoint,
    /// Remote directory all paths are relative to.
    pub root: String,
    pub user: Option<String>,
    /// Staging directory the client writes to before moving a file into place.
    /// Defaults to a hidden directory under `root`, see [`staging_dir`](Self::staging_dir).
    pub atomic_write_dir: Option<String>,
}

impl ConnectorConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            root: DEFAULT_HADOOP_ROOT.to_string(),
            user: None,
            atomic_write_dir: None,
        }
    }

    pub fn from_properties(properties: &dyn PropertySource) -> Self {
        let optional = |key: &str| {
            properties
                .property(key)
                .filter(|value| !value.trim().is_empty())
        };

        Self {
            endpoint: resolve_endpoint(properties),
            root: properties.property_or(HADOOP_ROOT_PROPERTY, DEFAULT_HADOOP_ROOT),
            user: optional(HADOOP_USER_PROPERTY),
            atomic_write_dir: optional(HADOOP_ATOMIC_WRITE_DIR_PROPERTY),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_properties(&EnvProperties)
    }

    /// Absolute staging directory for uploads: `atomic_write_dir` when set,
    /// otherwise `.connector-staging` under `root`.
    pub fn staging_dir(&self) -> String {
        match &self.atomic_write_dir {
            Some(dir) => dir.clone(),
            None => format!(
                "{}/{DEFAULT_STAGING_DIR}",
                self.root.trim_end_matches('/')
            ),
        }
    }
}
