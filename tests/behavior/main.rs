use libtest_mimic::Arguments;
use libtest_mimic::Trial;
use hdfs_connector::error::Result;

mod utils;

pub use utils::*;

fn main() -> Result<()> {
    let args = Arguments::from_args();

    let cluster_dir = tempfile::tempdir()?;
    let memory = memory_target();
    let local = fs_target(cluster_dir.path())?;
    let remote = env_target()?;

    let mut tests = Vec::new();

    operations::register(&memory, &mut tests);
    operations::register(&local, &mut tests);
    if let Some(remote) = &remote {
        operations::register(remote, &mut tests);
    }
    operations::cli::tests(cluster_dir.path(), &mut tests);

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let conclusion = libtest_mimic::run(&args, tests);

    TEST_RUNTIME.block_on(TEST_FIXTURE.cleanup(&local.connector));
    if let Some(remote) = &remote {
        TEST_RUNTIME.block_on(TEST_FIXTURE.cleanup(&remote.connector));
    }

    conclusion.exit()
}
