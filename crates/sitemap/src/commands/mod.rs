//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use sitemap_config::{CliSettings, Config};
use sitemap_index::{NodeSettings, RenderOptions, SitemapManager};

use crate::error::CliError;
use crate::feed::Feed;

pub(crate) use build::BuildArgs;
pub(crate) use render::RenderArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// JSON feed of entities grouped by resource kind.
    #[arg(short, long)]
    input: PathBuf,

    /// Path to configuration file (default: auto-discover sitemap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Public site URL (overrides config).
    #[arg(long, env = "SITEMAP_SITE_URL")]
    site_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration and feed, and index the feed.
    fn load(
        &self,
        output_dir: Option<PathBuf>,
    ) -> Result<(Config, SitemapManager, usize), CliError> {
        let cli_settings = CliSettings {
            site_url: self.site_url.clone(),
            output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let feed = Feed::load(&self.input)?;
        let mut manager = SitemapManager::new(config.site.url.clone(), &node_settings(&config));
        let added = feed.populate(&mut manager);
        tracing::info!(records = feed.len(), added, "Loaded feed");

        Ok((config, manager, added))
    }
}

/// Node construction settings from configuration.
fn node_settings(config: &Config) -> NodeSettings {
    NodeSettings {
        site_url: Some(config.site.url.clone()),
        publication_name: config.news.publication_name.clone(),
        publication_language: config.news.language.clone(),
    }
}

/// Render options from configuration.
fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        xml_declaration: config.render.xml_declaration,
        stylesheet: config.stylesheet_href(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use sitemap_index::{DEFAULT_PUBLICATION_LANGUAGE, DEFAULT_PUBLICATION_NAME};

    use super::*;

    #[test]
    fn test_config_news_defaults_match_index_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.toml");
        std::fs::write(&path, "").unwrap();
        let config = Config::load(Some(Path::new(&path)), None).unwrap();

        let settings = node_settings(&config);
        assert_eq!(settings.publication_name, DEFAULT_PUBLICATION_NAME);
        assert_eq!(settings.publication_language, DEFAULT_PUBLICATION_LANGUAGE);
    }

    #[test]
    fn test_settings_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.toml");
        std::fs::write(
            &path,
            r#"
[site]
url = "https://blog.example.com"

[render]
stylesheet = "sitemap.xsl"

[news]
publication_name = "Example Times"
"#,
        )
        .unwrap();
        let config = Config::load(Some(Path::new(&path)), None).unwrap();

        assert_eq!(
            node_settings(&config),
            NodeSettings {
                site_url: Some("https://blog.example.com".to_owned()),
                publication_name: "Example Times".to_owned(),
                publication_language: "en".to_owned(),
            }
        );
        assert_eq!(
            render_options(&config),
            RenderOptions {
                xml_declaration: true,
                stylesheet: Some("https://blog.example.com/sitemap.xsl".to_owned()),
            }
        );
    }
}
