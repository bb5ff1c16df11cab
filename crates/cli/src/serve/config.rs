//! Server configuration assembled at process start.

/// Origins allowed when none are configured.
pub(crate) const DEFAULT_ALLOWED_ORIGINS: &[&str] =
    &["https://duel.tools", "https://staging.duel.tools"];

/// Everything `start_server` needs. Built once from CLI flags / env vars
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) database_url: String,
    /// Exact-match `Origin` values that get `Access-Control-Allow-Origin`.
    pub(crate) allowed_origins: Vec<String>,
}

impl ServeConfig {
    /// An empty `allowed_origins` falls back to [`DEFAULT_ALLOWED_ORIGINS`].
    /// Blank entries (e.g. from a trailing comma) are dropped.
    pub(crate) fn new(
        host: String,
        port: u16,
        database_url: String,
        allowed_origins: Vec<String>,
    ) -> Self {
        let mut allowed_origins: Vec<String> = allowed_origins
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if allowed_origins.is_empty() {
            allowed_origins = DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect();
        }
        Self {
            host,
            port,
            database_url,
            allowed_origins,
        }
    }

    pub(crate) fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &[&str]) -> ServeConfig {
        ServeConfig::new(
            "127.0.0.1".to_string(),
            9000,
            "sqlite::memory:".to_string(),
            origins.iter().map(|o| o.to_string()).collect(),
        )
    }

    #[test]
    fn empty_origin_list_uses_defaults() {
        assert_eq!(
            config(&[]).allowed_origins,
            vec!["https://duel.tools", "https://staging.duel.tools"]
        );
    }

    #[test]
    fn configured_origins_replace_defaults() {
        let c = config(&["http://localhost:5173", " ", "https://duel.tools "]);
        assert_eq!(
            c.allowed_origins,
            vec!["http://localhost:5173", "https://duel.tools"]
        );
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        assert_eq!(config(&[]).bind_addr(), "127.0.0.1:9000");
    }
}
