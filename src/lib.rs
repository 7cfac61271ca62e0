//! File-operation connector for Hadoop-compatible distributed storage.
//!
//! [`StorageConnector`](storage::StorageConnector) offers upload, download,
//! append, delete, existence checks and directory management over any
//! [`StorageBackend`](storage::StorageBackend). The production backend talks
//! to the cluster through OpenDAL; [`MemoryBackend`](storage::MemoryBackend)
//! stands in for it in tests.
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
