//! TOML configuration loading.

use std::path::Path;

use palaver_types::config::AppConfig;

/// Load configuration from a TOML file, falling back to defaults.
///
/// A missing file is the normal first-run case and yields the default
/// config quietly. An unreadable or malformed file is logged at warn
/// and also yields the defaults, so a typo in the config never blocks
/// startup.
pub async fn load_config(path: &Path) -> AppConfig {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return AppConfig::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
            return AppConfig::default();
        }
    };

    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.toml")).await;
        assert_eq!(config.memory.url, "redis://127.0.0.1:6379");
        assert_eq!(config.memory.session_ttl_seconds, 300);
    }

    #[tokio::test]
    async fn test_valid_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[memory]\nurl = \"redis://example:6380\"\nsession_ttl_seconds = 600\n\n[llm]\nregion = \"eu-west-1\""
        )
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.memory.url, "redis://example:6380");
        assert_eq!(config.memory.session_ttl_seconds, 600);
        assert_eq!(config.llm.region, "eu-west-1");
        // Unset sections keep their defaults.
        assert_eq!(config.llm.max_tokens, 4096);
    }

    #[tokio::test]
    async fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not { toml").unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.memory.session_ttl_seconds, 300);
    }
}
