// Storage operation traits and implementations
pub mod append;
pub mod delete;
pub mod download;
pub mod mkdir;
pub mod stat;
pub mod upload;

pub use append::Appender;
pub use delete::Deleter;
pub use download::Downloader;
pub use mkdir::Mkdirer;
pub use stat::Stater;
pub use upload::Uploader;
