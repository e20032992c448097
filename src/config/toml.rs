//! TOML configuration file support

use crate::config::Config;
use crate::error::Result;
use std::path::Path;

/// Load a configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse a configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config = toml::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadrature::BuiltinIntegrand;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config(
            r#"
            [domain]
            lower = 0.0
            upper = 1.0
            epsilon = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.domain.lower, 0.0);
        assert_eq!(config.domain.upper, 1.0);
        assert_eq!(config.integrand, BuiltinIntegrand::DampedOscillation);
        assert_eq!(config.guard.max_depth, 40);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            integrand = "rectified-cosine"

            [domain]
            lower = -3.14
            upper = 3.14
            epsilon = 0.01

            [guard]
            max_depth = 16
            min_width = 1e-6
            strict = true

            [workers]
            threads = 4

            [output]
            show_leaves = true
            "#,
        )
        .unwrap();

        assert_eq!(config.integrand, BuiltinIntegrand::RectifiedCosine);
        assert_eq!(config.guard.max_depth, 16);
        assert!(config.guard.strict);
        assert_eq!(config.workers.threads, 4);
        assert!(config.output.show_leaves);
        assert!(!config.output.quiet);
    }

    #[test]
    fn test_reject_missing_domain() {
        assert!(parse_config("[workers]\nthreads = 2\n").is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/quadpool.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
