//! `${VAR}` substitution in configuration values.
//!
//! `${VAR}` must be set; `${VAR:-fallback}` uses the fallback when it is not.
//! A bare `$VAR` is left alone so URLs containing `$` survive untouched.

use std::borrow::Cow;
use std::env::VarError;

use crate::ConfigError;

/// Substitute environment references in `value`.
///
/// `field` names the config key in the error message.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })
}

fn lookup(name: &str) -> Result<Option<String>, VarError> {
    std::env::var(name).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_site_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SITEMAP_TEST_HOST", "blog.example.com");
        }
        let result = expand_env("https://${SITEMAP_TEST_HOST}/", "site.url").unwrap();
        assert_eq!(result, "https://blog.example.com/");
        unsafe {
            std::env::remove_var("SITEMAP_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SITEMAP_UNSET_TEST");
        }
        let result =
            expand_env("${SITEMAP_UNSET_TEST:-http://localhost:2368}", "site.url").unwrap();
        assert_eq!(result, "http://localhost:2368");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SITEMAP_MISSING_TEST");
        }
        let err = expand_env("${SITEMAP_MISSING_TEST}", "site.url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("SITEMAP_MISSING_TEST"));
        assert!(err.to_string().contains("site.url"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("https://example.com/$path", "site.url").unwrap();
        assert_eq!(result, "https://example.com/$path");
    }
}
