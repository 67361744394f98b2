//! Configuration integration tests

#[cfg(test)]
mod tests {
    use folio_gateway::config::{CHAT_RATE_LIMIT, CONTACT_RATE_WINDOW_MS, Config};
    use folio_gateway::utils::error::GatewayError;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_bounds_clamp_and_default() {
        assert_eq!(CHAT_RATE_LIMIT.parse(Some("2")), 5);
        assert_eq!(CHAT_RATE_LIMIT.parse(Some("500")), 100);
        assert_eq!(CHAT_RATE_LIMIT.parse(Some("seven")), 20);
        assert_eq!(CHAT_RATE_LIMIT.parse(None), 20);
        assert_eq!(CONTACT_RATE_WINDOW_MS.parse(Some("-5")), 60_000);
    }

    #[tokio::test]
    async fn test_file_then_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9100\nrate_limits:\n  contact_limit: 3\nanalytics:\n  salt: file-salt"
        )
        .unwrap();

        let mut config = Config::from_file(file.path()).await.unwrap();
        config.apply_overrides(env(&[("CONTACT_RATE_LIMIT", "50"), ("ANALYTICS_SALT", "env-salt")]));
        config.finalize().unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.rate_limits.contact_limit, 20);
        assert_eq!(config.analytics.salt, "env-salt");
        assert_eq!(config.rate_limits.contact_policy().limit, 20);
    }

    #[test]
    fn test_policies_reflect_settings() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("CHAT_RATE_WINDOW_MS", "120000")]));
        config.finalize().unwrap();

        let policy = config.rate_limits.chat_policy();
        assert_eq!(policy.limit, 20);
        assert_eq!(policy.window_ms(), 120_000);
        assert_eq!(policy.window_secs(), 120);
    }

    #[test]
    fn test_invalid_sections_are_rejected() {
        let mut config = Config::default();
        config.chat.temperature = 3.0;
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
