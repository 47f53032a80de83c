use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use log::{info, warn};
use rand::seq::SliceRandom;
use crate::delay_manager;

/// Browser identities rotated across requests unless configured otherwise.
pub const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Retry, pacing and timeout policy for [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub retries: u32,
    pub backoff_base: f64,
    /// Length of one backoff step; attempt `i` waits `backoff_unit * backoff_base^i`.
    pub backoff_unit: Duration,
    pub timeout: Duration,
    pub pacing_min: Duration,
    pub pacing_max: Duration,
    /// One is picked at random per request. Empty means reqwest's default.
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            retries: 3,
            backoff_base: 1.5,
            backoff_unit: Duration::from_secs(1),
            timeout: Duration::from_secs(15),
            pacing_min: Duration::from_secs(1),
            pacing_max: Duration::from_secs(3),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("giving up on {url} after {attempts} attempt(s): {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Blocking page fetcher with jittered pacing and exponential backoff.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Fetcher { client, config })
    }

    fn pick_user_agent(&self) -> Option<&str> {
        self.config
            .user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    /// Fetches `url` and returns the response body.
    ///
    /// Every attempt is preceded by a random pacing delay. Network errors and
    /// non-2xx statuses are retried with exponential backoff; once `retries`
    /// attempts are spent the last error is returned.
    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let attempts = self.config.retries.max(1);
        let mut attempt = 0;

        loop {
            delay_manager::random_pacing_delay(self.config.pacing_min, self.config.pacing_max);

            match self.try_once(url) {
                Ok(body) => return Ok(body),
                Err(e) if attempt + 1 < attempts => {
                    warn!("Attempt {}/{} for {} failed: {}", attempt + 1, attempts, url, e);
                    delay_manager::backoff_delay(self.config.backoff_base, attempt, self.config.backoff_unit);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }

    fn try_once(&self, url: &str) -> Result<String, reqwest::Error> {
        info!("Fetching: {}", url);
        let mut request = self.client.get(url);
        if let Some(ua) = self.pick_user_agent() {
            request = request.header(USER_AGENT, ua);
        }
        let resp = request.send()?.error_for_status()?;
        resp.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Answers one connection per scripted response, in order, and hands
    /// back the raw requests it saw.
    fn scripted_server(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 8192];
                let n = stream.read(&mut buf).unwrap();
                requests.push(String::from_utf8_lossy(&buf[..n]).to_string());
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });
        (format!("http://{}/internships", addr), handle)
    }

    fn quick_config(retries: u32) -> FetchConfig {
        FetchConfig {
            retries,
            backoff_unit: Duration::ZERO,
            timeout: Duration::from_secs(2),
            pacing_min: Duration::ZERO,
            pacing_max: Duration::ZERO,
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.retries, 3);
        assert_eq!(config.backoff_base, 1.5);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.user_agents.len(), DEFAULT_USER_AGENTS.len());
    }

    #[test]
    fn test_unreachable_host_exhausts_retries() {
        let fetcher = Fetcher::new(quick_config(2)).unwrap();
        // Port 1 on loopback is closed, so every attempt is refused immediately.
        let err = fetcher.fetch("http://127.0.0.1:1/internships").unwrap_err();
        match err {
            FetchError::Exhausted { url, attempts, .. } => {
                assert_eq!(url, "http://127.0.0.1:1/internships");
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_server_error_is_retried_until_success() {
        let (url, server) = scripted_server(vec![
            http_response("500 Internal Server Error", "busy"),
            http_response("200 OK", "<html>listings</html>"),
        ]);
        let fetcher = Fetcher::new(quick_config(3)).unwrap();

        assert_eq!(fetcher.fetch(&url).unwrap(), "<html>listings</html>");
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_persistent_not_found_exhausts_retries() {
        let (url, server) = scripted_server(vec![
            http_response("404 Not Found", "gone"),
            http_response("404 Not Found", "gone"),
        ]);
        let fetcher = Fetcher::new(quick_config(2)).unwrap();

        let err = fetcher.fetch(&url).unwrap_err();
        match err {
            FetchError::Exhausted { attempts, source, .. } => {
                assert_eq!(attempts, 2);
                assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_configured_user_agent_is_sent() {
        let (url, server) = scripted_server(vec![http_response("200 OK", "ok")]);
        let config = FetchConfig {
            user_agents: vec!["InternBot/2.0".to_string()],
            ..quick_config(1)
        };
        Fetcher::new(config).unwrap().fetch(&url).unwrap();

        let requests = server.join().unwrap();
        assert!(requests[0].to_lowercase().contains("user-agent: internbot/2.0"));
    }

    #[test]
    fn test_empty_user_agent_list_still_fetches() {
        let (url, server) = scripted_server(vec![http_response("200 OK", "ok")]);
        let config = FetchConfig { user_agents: Vec::new(), ..quick_config(1) };
        assert_eq!(Fetcher::new(config).unwrap().fetch(&url).unwrap(), "ok");
        server.join().unwrap();
    }

    #[test]
    fn test_zero_retries_still_tries_once() {
        let fetcher = Fetcher::new(quick_config(0)).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/").unwrap_err();
        assert!(matches!(err, FetchError::Exhausted { attempts: 1, .. }));
    }
}
