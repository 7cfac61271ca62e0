use assert_cmd::prelude::*;
use hdfs_connector::config::ConnectorConfig;
use hdfs_connector::error::Result;
use hdfs_connector::storage::constants::HADOOP_URL_PROPERTY;
use hdfs_connector::storage::{MemoryBackend, OpenDalBackend, StorageBackend, StorageConnector};
use libtest_mimic::{Failed, Trial};
use rand::prelude::*;
use std::collections::HashMap;
use std::env;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Set to run the suite against a live cluster as well, e.g. `webhdfs://127.0.0.1:9870`.
const TEST_CLUSTER_URL_ENV: &str = "HADOOP_TEST_URL";
const TEST_ROOT: &str = "/behavior";

pub static TEST_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

/// A connector plus the label its trials are reported under.
pub struct TestTarget<B> {
    pub label: &'static str,
    pub connector: StorageConnector<B>,
}

pub fn memory_target() -> TestTarget<MemoryBackend> {
    TestTarget {
        label: "memory",
        connector: StorageConnector::new(MemoryBackend::new()),
    }
}

/// A local directory served through the same OpenDAL path as a real cluster,
/// with every other setting left at its default.
pub fn fs_target(cluster_dir: &Path) -> Result<TestTarget<OpenDalBackend>> {
    let root = cluster_dir.join("cluster");
    let properties: HashMap<String, String> = HashMap::from([(
        HADOOP_URL_PROPERTY.to_string(),
        format!("file://{}", root.display()),
    )]);
    let config = ConnectorConfig::from_properties(&properties);

    Ok(TestTarget {
        label: "fs",
        connector: StorageConnector::connect(&config)?,
    })
}

pub fn env_target() -> Result<Option<TestTarget<OpenDalBackend>>> {
    let Ok(url) = env::var(TEST_CLUSTER_URL_ENV) else {
        return Ok(None);
    };
    let properties = HashMap::from([(HADOOP_URL_PROPERTY.to_string(), url)]);
    let config = ConnectorConfig::from_properties(&properties);

    Ok(Some(TestTarget {
        label: "cluster",
        connector: StorageConnector::connect(&config)?,
    }))
}

pub struct Fixture {
    root: &'static str,
}

impl Fixture {
    pub const fn new() -> Self {
        Self { root: TEST_ROOT }
    }

    pub fn new_dir_path(&self) -> String {
        format!("{}/dir-{}", self.root, Uuid::new_v4())
    }

    pub fn new_file_path(&self) -> String {
        format!("{}/file-{}.bin", self.root, Uuid::new_v4())
    }

    /// Random content with a size drawn from `range`.
    pub fn new_content(&self, range: std::ops::Range<usize>) -> Vec<u8> {
        let mut rng = rand::rng();
        let size = rng.random_range(range);
        let mut content = vec![0; size];
        rng.fill_bytes(&mut content);
        content
    }

    /// A local file holding `content`, removed when dropped.
    pub fn new_local_file(&self, content: &[u8]) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content)?;
        file.flush()?;
        Ok(file)
    }

    pub async fn cleanup<B: StorageBackend>(&self, connector: &StorageConnector<B>) {
        let _ = connector.delete_folder(self.root).await;
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub static TEST_FIXTURE: Fixture = Fixture::new();

/// Upload `content` to `remote_path` through a throwaway local file.
pub async fn stage_file<B: StorageBackend>(
    connector: &StorageConnector<B>,
    remote_path: &str,
    content: &[u8],
) -> Result<()> {
    let local = TEST_FIXTURE.new_local_file(content)?;
    connector.upload(local.path(), remote_path, true).await
}

pub async fn read_remote<B: StorageBackend>(
    connector: &StorageConnector<B>,
    remote_path: &str,
) -> Result<Vec<u8>> {
    connector.download(remote_path).await?.read_to_end().await
}

pub fn build_async_trial<B, F, Fut>(name: &str, target: &TestTarget<B>, f: F) -> Trial
where
    B: StorageBackend,
    F: FnOnce(StorageConnector<B>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>>,
{
    let handle = TEST_RUNTIME.handle().clone();
    let connector = target.connector.clone();

    Trial::test(format!("behavior::{}::{name}", target.label), move || {
        handle
            .block_on(f(connector))
            .map_err(|err| Failed::from(err.to_string()))
    })
}

#[macro_export]
macro_rules! async_trials {
    ($target:ident, $($test:ident),*) => {
        vec![$(build_async_trial(stringify!($test), $target, $test),)*]
    };
}

/// A connector binary invocation pointed at `cluster_dir` with a clean environment.
pub fn connector_cmd(cluster_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hdfs-connector").unwrap();
    cmd.env_clear()
        .env("RUST_LOG", "info")
        .env(
            "WATER_CONNECTORS_HADOOP_URL",
            format!("file://{}", cluster_dir.join("cli").display()),
        );
    cmd
}
