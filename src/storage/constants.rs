// Buffer related constants
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

// Progress is printed every this many buffers
pub const PROGRESS_UPDATE_INTERVAL: u64 = 16;

// Endpoint configuration
pub const HADOOP_URL_PROPERTY: &str = "water.connectors.hadoop.url";
pub const HADOOP_ROOT_PROPERTY: &str = "water.connectors.hadoop.root";
pub const HADOOP_USER_PROPERTY: &str = "water.connectors.hadoop.user";
pub const HADOOP_ATOMIC_WRITE_DIR_PROPERTY: &str = "water.connectors.hadoop.atomic-write-dir";
pub const DEFAULT_HADOOP_URL: &str = "hdfs://localhost:8020";
pub const DEFAULT_HADOOP_ROOT: &str = "/";

// Staging directory under the root used when no atomic-write-dir is configured
pub const DEFAULT_STAGING_DIR: &str = ".connector-staging";
