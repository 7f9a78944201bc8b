//! `sitemap build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use sitemap_index::{INDEX_FILE_NAME, RenderOptions, ResourceKind, SitemapManager};

use super::{SourceArgs, render_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory to write sitemap files to (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Writes `sitemap.xml` plus one `sitemap-{kind}.xml` per resource kind.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or feed loading fails, or a file
    /// cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (config, mut manager, added) = self.source.load(self.output_dir)?;
        let out_dir = &config.output_resolved.dir;

        output.info(&format!("Site URL: {}", config.site.url));
        output.info(&format!("Output directory: {}", out_dir.display()));
        if added == 0 {
            output.warning("Feed produced no sitemap entries");
        }

        let written = write_documents(&mut manager, &render_options(&config), out_dir)?;

        output.success(&format!("Wrote {written} sitemap files ({added} URLs)"));
        Ok(())
    }
}

/// Write the root index and every per-kind sitemap into `out_dir`.
///
/// Returns the number of files written.
fn write_documents(
    manager: &mut SitemapManager,
    options: &RenderOptions,
    out_dir: &Path,
) -> Result<usize, CliError> {
    std::fs::create_dir_all(out_dir)?;

    let index_path = out_dir.join(INDEX_FILE_NAME);
    std::fs::write(&index_path, manager.get_index_document(options))?;
    tracing::info!(path = %index_path.display(), "Wrote sitemap index");

    for kind in ResourceKind::ALL {
        let path = out_dir.join(kind.file_name());
        let document = manager.get_sitemap_document(kind, options);
        std::fs::write(&path, document.as_bytes())?;
        tracing::info!(path = %path.display(), entries = manager.index(kind).len(), "Wrote sitemap");
    }

    Ok(ResourceKind::ALL.len() + 1)
}

#[cfg(test)]
mod tests {
    use sitemap_index::{Entity, NodeSettings};

    use super::*;

    #[test]
    fn test_write_documents() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("public");
        let mut manager = SitemapManager::new("https://example.com", &NodeSettings::default());
        manager.add_url(
            ResourceKind::Posts,
            "https://example.com/hello/",
            &Entity::new("1").with_updated_at("2024-06-01"),
        );

        let written = write_documents(&mut manager, &RenderOptions::default(), &out_dir).unwrap();

        assert_eq!(written, 5);
        let index = std::fs::read_to_string(out_dir.join("sitemap.xml")).unwrap();
        assert!(index.contains("<loc>https://example.com/sitemap-posts.xml</loc>"));

        let posts = std::fs::read_to_string(out_dir.join("sitemap-posts.xml")).unwrap();
        assert!(posts.contains("<loc>https://example.com/hello/</loc>"));

        let tags = std::fs::read_to_string(out_dir.join("sitemap-tags.xml")).unwrap();
        assert!(!tags.contains("<url>"));
    }
}
