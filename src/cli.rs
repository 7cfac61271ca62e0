use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{self, AsyncRead};

use crate::config::{ConnectorConfig, EnvProperties, JsonProperties, Layered};
use crate::error::Result;
use crate::storage::constants::{DEFAULT_BUFFER_SIZE, HADOOP_URL_PROPERTY, PROGRESS_UPDATE_INTERVAL};
use crate::storage::utils::progress::ConsoleProgressReporter;
use crate::storage::utils::size::format_size;
use crate::storage::{OpenDalBackend, StorageConnector};

#[derive(Parser, Debug)]
#[command(name = "hdfs-connector")]
#[command(about = "File operations against a Hadoop-compatible storage cluster")]
#[command(version)]
pub struct Args {
    /// Storage cluster URL (hdfs://, webhdfs://, file://), overrides every other source
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// JSON file with connector properties
    #[arg(long, global = true, env = "HDFS_CONNECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a local file
    Put {
        local: PathBuf,
        remote: String,
        /// Replace an existing remote file
        #[arg(short = 'f', long)]
        overwrite: bool,
    },
    /// Copy a local file into the cluster (same as put)
    Cp {
        local: PathBuf,
        remote: String,
        /// Replace an existing remote file
        #[arg(short = 'f', long)]
        overwrite: bool,
    },
    /// Download a remote file
    Get { remote: String, local: PathBuf },
    /// Print a remote file to stdout
    Cat { remote: String },
    /// Append a local file (or stdin) to an existing remote file
    Append {
        remote: String,
        local: Option<PathBuf>,
    },
    /// Delete a remote file
    Rm { remote: String },
    /// Create a remote directory and its parents
    Mkdir { remote: String },
    /// Delete a remote directory and its contents
    Rmdir { remote: String },
    /// Print whether a remote path exists
    Exists { remote: String },
}

/// Resolve configuration with precedence: `--url`, environment, `--config` file.
pub fn load_config(args: &Args) -> Result<ConnectorConfig> {
    let mut overrides = HashMap::new();
    if let Some(url) = &args.url {
        overrides.insert(HADOOP_URL_PROPERTY.to_string(), url.clone());
    }
    let file = match &args.config {
        Some(path) => JsonProperties::load(path)?,
        None => JsonProperties::default(),
    };

    let properties = Layered {
        primary: overrides,
        fallback: Layered {
            primary: EnvProperties,
            fallback: file,
        },
    };
    Ok(ConnectorConfig::from_properties(&properties))
}

pub async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let connector = StorageConnector::connect(&config)?;

    match args.command {
        Command::Put {
            local,
            remote,
            overwrite,
        } => put(&connector, local, &remote, overwrite, "Upload").await,
        Command::Cp {
            local,
            remote,
            overwrite,
        } => put(&connector, local, &remote, overwrite, "Copy").await,
        Command::Get { remote, local } => get(&connector, &remote, local).await,
        Command::Cat { remote } => {
            let reader = connector.download(&remote).await?;
            reader.copy_to(&mut io::stdout(), |_| {}).await?;
            Ok(())
        }
        Command::Append { remote, local } => match local {
            Some(path) => append(&connector, &remote, fs::File::open(path).await?).await,
            None => append(&connector, &remote, io::stdin()).await,
        },
        Command::Rm { remote } => {
            connector.delete_file(&remote).await?;
            println!("Deleted: {remote}");
            Ok(())
        }
        Command::Mkdir { remote } => {
            connector.create_folder(&remote).await?;
            println!("Created directory: {remote}");
            Ok(())
        }
        Command::Rmdir { remote } => {
            connector.delete_folder(&remote).await?;
            println!("Deleted directory: {remote}");
            Ok(())
        }
        Command::Exists { remote } => {
            println!("{}", connector.exists(&remote).await?);
            Ok(())
        }
    }
}

async fn put(
    connector: &StorageConnector<OpenDalBackend>,
    local: PathBuf,
    remote: &str,
    overwrite: bool,
    verb: &str,
) -> Result<()> {
    connector.upload(&local, remote, overwrite).await?;
    let size = fs::metadata(&local).await?.len();
    println!(
        "✅ {verb}: {} → {remote} ({})",
        local.display(),
        format_size(size)
    );
    Ok(())
}

async fn get(
    connector: &StorageConnector<OpenDalBackend>,
    remote: &str,
    local: PathBuf,
) -> Result<()> {
    let reader = connector.download(remote).await?;
    if let Some(parent) = local.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut file = fs::File::create(&local).await?;

    let mut reporter = ConsoleProgressReporter::new(
        format!("Downloading {remote}"),
        None,
        DEFAULT_BUFFER_SIZE as u64 * PROGRESS_UPDATE_INTERVAL,
    );
    let total_bytes = reader
        .copy_to(&mut file, |bytes| reporter.maybe_report(bytes))
        .await?;
    reporter.finish(total_bytes);

    println!(
        "✅ Download: {remote} → {} ({})",
        local.display(),
        format_size(total_bytes)
    );
    Ok(())
}

async fn append<R: AsyncRead + Unpin>(
    connector: &StorageConnector<OpenDalBackend>,
    remote: &str,
    source: R,
) -> Result<()> {
    let mut writer = connector.append_to_file(remote).await?;
    let appended = match writer.write_from(source).await {
        Ok(bytes) => bytes,
        Err(e) => return Err(writer.abort_after(e).await),
    };
    writer.close().await?;
    println!("Appended {} to {remote}", format_size(appended));
    Ok(())
}
