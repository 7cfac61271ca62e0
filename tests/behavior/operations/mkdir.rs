use crate::*;
use hdfs_connector::error::{Error, Result};
use hdfs_connector::storage::{StorageBackend, StorageConnector};

pub fn tests<B: StorageBackend>(target: &TestTarget<B>, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        target,
        test_exists_toggles_with_folder,
        test_create_existing_folder,
        test_create_nested_folders,
        test_create_folder_over_file,
        test_root_always_exists
    ));
}

async fn test_exists_toggles_with_folder<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();

    assert!(!connector.exists(&dir).await?);
    connector.create_folder(&dir).await?;
    assert!(connector.exists(&dir).await?);
    connector.delete_folder(&dir).await?;
    assert!(!connector.exists(&dir).await?);
    Ok(())
}

async fn test_create_existing_folder<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();

    connector.create_folder(&dir).await?;
    connector.create_folder(&dir).await?;
    assert!(connector.exists(&dir).await?);
    Ok(())
}

async fn test_create_nested_folders<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let nested = format!("{base}/a/b/c/d");

    connector.create_folder(&nested).await?;

    assert!(connector.exists(&base).await?);
    assert!(connector.exists(&format!("{base}/a/b")).await?);
    assert!(connector.exists(&nested).await?);
    // Directories cannot be downloaded
    assert!(matches!(
        connector.download(&format!("{base}/a")).await,
        Err(Error::PathIsDirectory { .. })
    ));
    Ok(())
}

async fn test_create_folder_over_file<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path();
    stage_file(&connector, &path, b"file").await?;

    let result = connector.create_folder(&path).await;
    assert!(matches!(result, Err(Error::AlreadyExists { .. })));

    let result = connector.create_folder(&format!("{path}/child")).await;
    assert!(matches!(result, Err(Error::PathTraversalConflict { .. })));
    Ok(())
}

async fn test_root_always_exists<B: StorageBackend>(connector: StorageConnector<B>) -> Result<()> {
    assert!(connector.exists("/").await?);
    connector.create_folder("/").await?;
    Ok(())
}
