//! `sitemap render` command implementation.

use std::io::Write;

use clap::Args;
use sitemap_index::ResourceKind;

use super::{SourceArgs, render_options};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Resource kind to render (pages, posts, authors, tags). Renders the
    /// root sitemap index when omitted.
    #[arg(short, long)]
    kind: Option<ResourceKind>,
}

impl RenderArgs {
    /// Execute the render command, writing one document to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or feed loading fails, or stdout
    /// cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let (config, mut manager, _) = self.source.load(None)?;
        let options = render_options(&config);

        let document: String = match self.kind {
            Some(kind) => manager.get_sitemap_document(kind, &options).to_string(),
            None => manager.get_index_document(&options),
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
