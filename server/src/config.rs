// Configuration for the synthesis server

use std::{path::PathBuf, str::FromStr, time::Duration};

use tts_core::{AudioStore, Voice};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub audio_dir: PathBuf,
    pub audio_ttl_secs: u64,
    pub audio_sweep_interval_secs: u64,
    pub provider_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Global request budget; no limiter is installed when unset
    pub rate_limit_per_minute: Option<u32>,
    /// Upper bound on text characters; unbounded when unset
    pub max_text_length: Option<usize>,
    pub default_voice: Voice,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            audio_dir: AudioStore::default_dir(),
            audio_ttl_secs: 3600,
            audio_sweep_interval_secs: 300,
            provider_timeout_secs: 30,
            request_timeout_secs: 60,
            rate_limit_per_minute: None,
            max_text_length: None,
            default_voice: Voice::default(),
            cors_allowed_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; unset or unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        }

        fn optional<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|v| v.trim().parse().ok())
        }

        let defaults = Self::default();

        let audio_dir = lookup("AUDIO_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.audio_dir);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            port: parsed(&lookup, "PORT", defaults.port),
            audio_dir,
            audio_ttl_secs: parsed(&lookup, "AUDIO_TTL_SECS", defaults.audio_ttl_secs),
            audio_sweep_interval_secs: parsed(
                &lookup,
                "AUDIO_SWEEP_INTERVAL_SECS",
                defaults.audio_sweep_interval_secs,
            ),
            provider_timeout_secs: parsed(&lookup, "PROVIDER_TIMEOUT_SECS", defaults.provider_timeout_secs),
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            rate_limit_per_minute: optional::<u32>(&lookup, "RATE_LIMIT_PER_MINUTE").filter(|n| *n > 0),
            max_text_length: optional(&lookup, "MAX_TEXT_LENGTH"),
            default_voice: parsed(&lookup, "DEFAULT_VOICE", defaults.default_voice),
            cors_allowed_origins,
        }
    }

    pub fn audio_store(&self) -> AudioStore {
        AudioStore::new(self.audio_dir.clone(), Duration::from_secs(self.audio_ttl_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.audio_sweep_interval_secs.max(1))
    }

    /// Milliseconds between limiter refills for the configured per-minute budget.
    ///
    /// The governor takes a replenish interval, not a rate.
    pub fn rate_limit_refill_ms(&self) -> Option<u64> {
        self.rate_limit_per_minute
            .map(|per_minute| (60_000 / per_minute.max(1) as u64).max(1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.provider_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.default_voice, Voice::DefaultMale);
        assert!(cfg.cors_allowed_origins.is_none());
        assert!(cfg.audio_dir.ends_with("ai-audio-tool"));
        assert!(cfg.rate_limit_per_minute.is_none());
        assert!(cfg.rate_limit_refill_ms().is_none());
        assert!(cfg.max_text_length.is_none());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let cfg = config_from(&[
            ("PORT", "8085"),
            ("PROVIDER_TIMEOUT_SECS", "not-a-number"),
            ("DEFAULT_VOICE", "accent-uk-male"),
            ("AUDIO_DIR", "/var/tmp/tts"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
        ]);
        assert_eq!(cfg.port, 8085);
        assert_eq!(cfg.provider_timeout_secs, 30);
        assert_eq!(cfg.default_voice, Voice::AccentUkMale);
        assert_eq!(cfg.audio_dir, PathBuf::from("/var/tmp/tts"));
        assert_eq!(
            cfg.cors_allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn test_limits_are_opt_in() {
        let cfg = config_from(&[("RATE_LIMIT_PER_MINUTE", "120"), ("MAX_TEXT_LENGTH", "5000")]);
        assert_eq!(cfg.rate_limit_per_minute, Some(120));
        assert_eq!(cfg.max_text_length, Some(5000));

        let cfg = config_from(&[("RATE_LIMIT_PER_MINUTE", "0"), ("MAX_TEXT_LENGTH", "lots")]);
        assert!(cfg.rate_limit_per_minute.is_none());
        assert!(cfg.max_text_length.is_none());
    }

    #[test]
    fn test_rate_limit_refill_interval() {
        let refill = |n: &str| config_from(&[("RATE_LIMIT_PER_MINUTE", n)]).rate_limit_refill_ms();
        assert_eq!(refill("60"), Some(1000));
        assert_eq!(refill("120"), Some(500));
        assert_eq!(refill("600"), Some(100));
        assert_eq!(refill("1"), Some(60_000));
        assert_eq!(refill("120000"), Some(1));
    }

    #[test]
    fn test_sweep_interval_never_zero() {
        let cfg = config_from(&[("AUDIO_SWEEP_INTERVAL_SECS", "0")]);
        assert_eq!(cfg.sweep_interval(), Duration::from_secs(1));
    }
}
