//! CLI error types.

use sitemap_config::ConfigError;

use crate::feed::FeedError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Feed(#[from] FeedError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
