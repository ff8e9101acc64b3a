use crate::config::Config;
use crate::errors::LoadError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::{path::PathBuf, time::Duration};
use tokio::{fs, task::JoinSet};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum DataSource {
    Local(PathBuf),
    Remote { base_url: String, client: Client },
}

/// Reads the pre-generated JSON documents. Failures never escape `load`:
/// they are logged and reported as an absent dataset.
#[derive(Debug, Clone)]
pub struct Loader {
    source: DataSource,
    timeout: Duration,
}

impl Loader {
    pub fn new(source: DataSource, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        let source = match &config.data_url {
            Some(base_url) => DataSource::Remote {
                base_url: base_url.clone(),
                client: Client::new(),
            },
            None => DataSource::Local(config.data_dir.clone()),
        };
        Self::new(source, config.load_timeout)
    }

    pub async fn fetch<T: DeserializeOwned>(&self, name: &str) -> Result<T, LoadError> {
        let bytes = tokio::time::timeout(self.timeout, self.read_bytes(name))
            .await
            .map_err(|_| LoadError::Timeout {
                name: name.to_string(),
                elapsed: self.timeout,
            })??;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(LoadError::Empty(name.to_string()));
        }
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
            name: name.to_string(),
            source,
        })
    }

    pub async fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        match self.fetch(name).await {
            Ok(doc) => Some(doc),
            Err(err) if err.is_missing() => {
                debug!("dataset not available yet: {err}");
                None
            }
            Err(err) => {
                warn!("dataset unavailable: {err}");
                None
            }
        }
    }

    /// Loads `{prefix}/{year}.json` for every year concurrently. Results come
    /// back in increasing year order whatever order the reads finish in;
    /// missing years are left out. Dropping the future aborts pending reads.
    pub async fn load_years<T>(
        &self,
        prefix: &str,
        years: impl IntoIterator<Item = i32>,
    ) -> Vec<(i32, T)>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut set = JoinSet::new();
        for year in years {
            let loader = self.clone();
            let name = format!("{prefix}/{year}.json");
            set.spawn(async move { (year, loader.load::<T>(&name).await) });
        }

        let mut found = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((year, Some(doc))) => found.push((year, doc)),
                Ok((_, None)) => {}
                Err(err) => warn!("per-year load task failed: {err}"),
            }
        }
        found.sort_by_key(|(year, _)| *year);
        found
    }

    async fn read_bytes(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        match &self.source {
            DataSource::Local(dir) => match fs::read(dir.join(name)).await {
                Ok(bytes) => Ok(bytes),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    Err(LoadError::Missing(name.to_string()))
                }
                Err(source) => Err(LoadError::Io {
                    name: name.to_string(),
                    source,
                }),
            },
            DataSource::Remote { base_url, client } => {
                let url = format!("{base_url}/{name}");
                let http = |source: reqwest::Error| LoadError::Http {
                    name: name.to_string(),
                    source,
                };
                let resp = client.get(&url).send().await.map_err(http)?;
                match resp.status() {
                    StatusCode::NOT_FOUND => Err(LoadError::Missing(name.to_string())),
                    status if !status.is_success() => Err(LoadError::Status {
                        name: name.to_string(),
                        status: status.as_u16(),
                    }),
                    _ => Ok(resp.bytes().await.map_err(http)?.to_vec()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PagelleDoc, QuickStats};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("aperipoker_{tag}_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(path.join("pagelle")).unwrap();
        path
    }

    fn local(dir: &std::path::Path) -> Loader {
        Loader::new(DataSource::Local(dir.to_path_buf()), Duration::from_secs(2))
    }

    /// Answers every connection with `response`; an empty response means the
    /// connection is accepted and then left hanging.
    fn http_stub(response: &'static str) -> Loader {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                if response.is_empty() {
                    held.push(stream);
                } else {
                    let _ = stream.write_all(response.as_bytes());
                }
            }
        });

        let source = DataSource::Remote {
            base_url: format!("http://{addr}"),
            client: Client::new(),
        };
        Loader::new(source, Duration::from_millis(300))
    }

    #[tokio::test]
    async fn missing_document_is_absent() {
        let dir = scratch_dir("missing");
        let loaded: Option<QuickStats> = local(&dir).load("stats.json").await;
        assert!(loaded.is_none());
        let err = local(&dir).fetch::<QuickStats>("stats.json").await.unwrap_err();
        assert!(err.is_missing());
    }

    #[tokio::test]
    async fn malformed_or_empty_document_is_absent() {
        let dir = scratch_dir("malformed");
        std::fs::write(dir.join("stats.json"), "{ not json").unwrap();
        std::fs::write(dir.join("classifica.json"), "  \n").unwrap();
        let loader = local(&dir);

        assert!(matches!(
            loader.fetch::<QuickStats>("stats.json").await,
            Err(LoadError::Json { .. })
        ));
        assert!(matches!(
            loader.fetch::<QuickStats>("classifica.json").await,
            Err(LoadError::Empty(_))
        ));
        assert!(loader.load::<QuickStats>("stats.json").await.is_none());
    }

    #[tokio::test]
    async fn reads_valid_document() {
        let dir = scratch_dir("valid");
        std::fs::write(
            dir.join("stats.json"),
            r#"{"totalMessages": 1200, "totalMembers": 9, "mostActive": "Anna"}"#,
        )
        .unwrap();
        let stats: QuickStats = local(&dir).load("stats.json").await.unwrap();
        assert_eq!(stats.total_messages, 1200);
        assert_eq!(stats.last_update, "");
    }

    #[tokio::test]
    async fn remote_not_found_is_missing() {
        let loader = http_stub("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = loader.fetch::<QuickStats>("stats.json").await.unwrap_err();
        assert!(err.is_missing());
        assert!(loader.load::<QuickStats>("stats.json").await.is_none());
    }

    #[tokio::test]
    async fn remote_server_error_keeps_status() {
        let loader = http_stub(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        assert!(matches!(
            loader.fetch::<QuickStats>("stats.json").await,
            Err(LoadError::Status { status: 500, .. })
        ));
        assert!(loader.load::<QuickStats>("stats.json").await.is_none());
    }

    #[tokio::test]
    async fn remote_document_is_read() {
        let loader = http_stub(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 22\r\nConnection: close\r\n\r\n{\"totalMessages\": 321}",
        );
        let stats: QuickStats = loader.load("stats.json").await.unwrap();
        assert_eq!(stats.total_messages, 321);
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let loader = http_stub("");
        assert!(matches!(
            loader.fetch::<QuickStats>("stats.json").await,
            Err(LoadError::Timeout { .. })
        ));
        assert!(loader.load::<QuickStats>("stats.json").await.is_none());
    }

    #[tokio::test]
    async fn per_year_results_come_back_in_year_order() {
        let dir = scratch_dir("years");
        for year in [2026, 2019, 2022] {
            std::fs::write(
                dir.join(format!("pagelle/{year}.json")),
                format!(r#"{{"year": {year}, "weeks": []}}"#),
            )
            .unwrap();
        }
        std::fs::write(dir.join("pagelle/2023.json"), "garbage").unwrap();

        let found: Vec<(i32, PagelleDoc)> = local(&dir).load_years("pagelle", 2019..=2026).await;
        let years: Vec<_> = found.iter().map(|(year, _)| *year).collect();
        assert_eq!(years, [2019, 2022, 2026]);
        assert!(found.iter().all(|(year, doc)| doc.year == Some(*year)));
    }
}
