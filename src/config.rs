use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::cache::DEFAULT_TTL_SECS;
use crate::fetcher::FetchConfig;
use crate::sources::github_jobs::DEFAULT_ENDPOINT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// When unset, subscriptions are only logged.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub sender: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub cache_ttl: Duration,
    pub fetch: FetchConfig,
    pub github_jobs_url: String,
    pub mail: MailConfig,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS as u64),
            fetch: FetchConfig::default(),
            github_jobs_url: DEFAULT_ENDPOINT.to_string(),
            mail: MailConfig {
                api_url: None,
                api_key: None,
                sender: "alerts@localhost".to_string(),
            },
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // `|`-separated, since User-Agent strings contain commas and spaces.
        let user_agents = match get("FETCH_USER_AGENTS") {
            Some(list) => list
                .split('|')
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.fetch.user_agents.clone(),
        };

        let fetch = FetchConfig {
            retries: parse_or(&get, "FETCH_RETRIES", defaults.fetch.retries)?,
            backoff_base: parse_or(&get, "FETCH_BACKOFF_BASE", defaults.fetch.backoff_base)?,
            timeout: secs_or(&get, "FETCH_TIMEOUT_SECS", defaults.fetch.timeout)?,
            pacing_min: secs_or(&get, "FETCH_PACING_MIN_SECS", defaults.fetch.pacing_min)?,
            pacing_max: secs_or(&get, "FETCH_PACING_MAX_SECS", defaults.fetch.pacing_max)?,
            user_agents,
            ..defaults.fetch
        };

        Ok(AppConfig {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&get, "PORT", defaults.port)?,
            cache_ttl: secs_or(&get, "CACHE_TTL_SECS", defaults.cache_ttl)?,
            fetch,
            github_jobs_url: get("GITHUB_JOBS_URL").unwrap_or(defaults.github_jobs_url),
            mail: MailConfig {
                api_url: get("MAIL_API_URL"),
                api_key: get("MAIL_API_KEY"),
                sender: get("MAIL_SENDER").unwrap_or(defaults.mail.sender),
            },
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
        })
    }

    pub fn cache_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.cache_ttl)
            .unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_TTL_SECS))
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => match value.parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

fn secs_or<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secs: f64 = parse_or(get, key, default.as_secs_f64())?;
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::Invalid {
        key,
        value: secs.to_string(),
        reason: e.to_string(),
    })
}
