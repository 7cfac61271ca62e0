use crate::*;
use hdfs_connector::error::{Error, Result};
use hdfs_connector::storage::{StorageBackend, StorageConnector};

pub fn tests<B: StorageBackend>(target: &TestTarget<B>, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        target,
        test_append_concatenates,
        test_append_in_several_writes,
        test_append_requires_existing_file
    ));
}

async fn test_append_concatenates<B: StorageBackend>(connector: StorageConnector<B>) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path();
    let head = TEST_FIXTURE.new_content(1..256 * 1024);
    let tail = TEST_FIXTURE.new_content(1..256 * 1024);
    stage_file(&connector, &path, &head).await?;

    let mut writer = connector.append_to_file(&path).await?;
    writer.write(tail.clone()).await?;
    assert_eq!(writer.close().await?, tail.len() as u64);

    assert_eq!(read_remote(&connector, &path).await?, [head, tail].concat());
    Ok(())
}

async fn test_append_in_several_writes<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path();
    stage_file(&connector, &path, b"2024-01-01 start\n").await?;

    let mut writer = connector.append_to_file(&path).await?;
    writer.write(&b"2024-01-02 running\n"[..]).await?;
    writer.write(&b"2024-01-03 done\n"[..]).await?;
    writer.close().await?;

    assert_eq!(
        read_remote(&connector, &path).await?,
        b"2024-01-01 start\n2024-01-02 running\n2024-01-03 done\n"
    );
    Ok(())
}

async fn test_append_requires_existing_file<B: StorageBackend>(
    connector: StorageConnector<B>,
) -> Result<()> {
    let missing = TEST_FIXTURE.new_file_path();
    let dir = TEST_FIXTURE.new_dir_path();
    connector.create_folder(&dir).await?;

    for path in [&missing, &dir] {
        let result = connector.append_to_file(path).await;
        assert!(
            matches!(result, Err(Error::NotFound { .. })),
            "{path} should be NotFound"
        );
    }
    assert!(!connector.exists(&missing).await?);
    Ok(())
}
