use crate::*;
use futures::TryStreamExt;
use hdfs_connector::error::{Error, Result};
use hdfs_connector::storage::{StorageBackend, StorageConnector};

pub fn tests<B: StorageBackend>(target: &TestTarget<B>, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        target,
        test_download_missing_file_is_not_found,
        test_download_directory_is_rejected,
        test_download_streams_large_file
    ));
}

async fn test_download_missing_file_is_not_found<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path();

    let result = connector.download(&path).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
    Ok(())
}

async fn test_download_directory_is_rejected<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    connector.create_folder(&dir).await?;

    let result = connector.download(&dir).await;
    assert!(matches!(result, Err(Error::PathIsDirectory { .. })));
    Ok(())
}

async fn test_download_streams_large_file<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path();
    let content = vec![0x42; 3 * 1024 * 1024 + 17];
    stage_file(&connector, &path, &content).await?;

    let reader = connector.download(&path).await?;
    assert_eq!(reader.path(), path);
    let chunks: Vec<_> = reader.try_collect().await?;

    assert!(!chunks.is_empty());
    assert_eq!(chunks.concat(), content);
    Ok(())
}
