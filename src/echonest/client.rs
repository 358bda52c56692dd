//! HTTP client for the Echo Nest v4 API.

use super::models::{ArtistProfileResponse, Envelope, ResponseStatus, SongListResponse};
use super::{AudioSummary, EnrichmentError, ExternalArtist, MetadataProvider, SongMatch};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ECHO_NEST_BASE_URL: &str = "http://developer.echonest.com/api/v4";

/// Echo Nest status code for "the requested resource could not be found".
const STATUS_NOT_FOUND: i64 = 5;

#[derive(Clone, Debug)]
pub struct EchoNestConfig {
    pub base_url: String,
    /// Without a key every lookup fails with [`EnrichmentError::MissingApiKey`].
    pub api_key: Option<String>,
    pub timeout_sec: u64,
}

impl Default for EchoNestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ECHO_NEST_BASE_URL.to_string(),
            api_key: None,
            timeout_sec: 10,
        }
    }
}

pub struct EchoNestClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EchoNestClient {
    pub fn new(config: EchoNestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .context("Failed to create Echo Nest HTTP client")?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_url(&self, path: &str, api_key: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/{}?api_key={}&format=json",
            self.base_url,
            path,
            urlencoding::encode(api_key)
        );
        for (name, value) in query {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Fetches an endpoint and returns the raw body.
    ///
    /// Error statuses are not rejected here since the API reports failures
    /// in the JSON body, which the parse functions turn into typed errors.
    async fn get_body(&self, path: &str, query: &[(&str, &str)]) -> Result<String, EnrichmentError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EnrichmentError::MissingApiKey)?;
        let url = self.build_url(path, api_key, query);

        debug!("Echo Nest request: {} {:?}", path, query);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Echo Nest {} answered with HTTP status {}", path, status);
        }
        Ok(body)
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, EnrichmentError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.response)
        .map_err(|e| EnrichmentError::InvalidResponse(e.to_string()))
}

fn api_error(status: ResponseStatus) -> EnrichmentError {
    EnrichmentError::Api {
        code: status.code,
        message: status.message,
    }
}

pub(crate) fn parse_artist_profile(name: &str, body: &str) -> Result<ExternalArtist, EnrichmentError> {
    let response: ArtistProfileResponse = parse_envelope(body)?;
    match response.status.code {
        0 => {}
        STATUS_NOT_FOUND => return Err(EnrichmentError::NoArtistMatch(name.to_string())),
        _ => return Err(api_error(response.status)),
    }
    response
        .artist
        .map(ExternalArtist::from)
        .ok_or_else(|| EnrichmentError::NoArtistMatch(name.to_string()))
}

pub(crate) fn parse_song_search(body: &str) -> Result<Vec<SongMatch>, EnrichmentError> {
    let response: SongListResponse = parse_envelope(body)?;
    if response.status.code != 0 {
        return Err(api_error(response.status));
    }
    Ok(response.songs.into_iter().map(SongMatch::from).collect())
}

pub(crate) fn parse_song_profile(song_id: &str, body: &str) -> Result<AudioSummary, EnrichmentError> {
    let response: SongListResponse = parse_envelope(body)?;
    match response.status.code {
        0 => {}
        STATUS_NOT_FOUND => return Err(EnrichmentError::MissingAudioSummary(song_id.to_string())),
        _ => return Err(api_error(response.status)),
    }
    response
        .songs
        .into_iter()
        .next()
        .and_then(|song| song.audio_summary)
        .map(AudioSummary::from)
        .ok_or_else(|| EnrichmentError::MissingAudioSummary(song_id.to_string()))
}

#[async_trait]
impl MetadataProvider for EchoNestClient {
    async fn get_artist(&self, name: &str) -> Result<ExternalArtist, EnrichmentError> {
        let body = self.get_body("artist/profile", &[("name", name)]).await?;
        parse_artist_profile(name, &body)
    }

    async fn search_songs(
        &self,
        artist: &str,
        title: &str,
        results: usize,
    ) -> Result<Vec<SongMatch>, EnrichmentError> {
        let results = results.to_string();
        let body = self
            .get_body(
                "song/search",
                &[
                    ("artist", artist),
                    ("title", title),
                    ("results", &results),
                    ("bucket", "audio_summary"),
                ],
            )
            .await?;
        parse_song_search(&body)
    }

    async fn get_audio_summary(&self, song_id: &str) -> Result<AudioSummary, EnrichmentError> {
        let body = self
            .get_body("song/profile", &[("id", song_id), ("bucket", "audio_summary")])
            .await?;
        parse_song_profile(song_id, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREEP_SEARCH: &str = r#"{
        "response": {
            "status": {"version": "4.2", "code": 0, "message": "Success"},
            "songs": [{
                "id": "SO042",
                "title": "Creep",
                "artist_id": "AR001",
                "artist_name": "Radiohead",
                "audio_summary": {
                    "key": 7,
                    "mode": 0,
                    "tempo": 91.0,
                    "loudness": -8.2,
                    "energy": 0.41,
                    "danceability": 0.52
                }
            }]
        }
    }"#;

    fn client(base_url: &str, api_key: Option<&str>) -> EchoNestClient {
        EchoNestClient::new(EchoNestConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            timeout_sec: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_trailing_slash_removal() {
        let client = client("http://localhost:8080/api/v4/", Some("KEY"));
        assert_eq!(client.base_url(), "http://localhost:8080/api/v4");
    }

    #[test]
    fn test_build_url_encodes_query() {
        let client = client("http://localhost:8080/api/v4", Some("KEY"));
        let url = client.build_url(
            "song/search",
            "KEY",
            &[("artist", "Simon & Garfunkel"), ("title", "The Boxer")],
        );
        assert_eq!(
            url,
            "http://localhost:8080/api/v4/song/search?api_key=KEY&format=json\
             &artist=Simon%20%26%20Garfunkel&title=The%20Boxer"
        );
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        assert!(!client("http://localhost", Some("")).has_api_key());
        assert!(client("http://localhost", Some("KEY")).has_api_key());
    }

    #[tokio::test]
    async fn test_lookup_without_api_key_fails_before_any_request() {
        // Port 9 is discard, nothing should ever be sent there
        let client = client("http://127.0.0.1:9", None);
        let result = client.get_artist("Radiohead").await;
        assert!(matches!(result, Err(EnrichmentError::MissingApiKey)));
    }

    #[test]
    fn test_parse_artist_profile() {
        let body = r#"{"response": {
            "status": {"version": "4.2", "code": 0, "message": "Success"},
            "artist": {"id": "AR001", "name": "Radiohead"}
        }}"#;
        let artist = parse_artist_profile("Radiohead", body).unwrap();
        assert_eq!(
            artist,
            ExternalArtist {
                id: "AR001".to_string(),
                name: "Radiohead".to_string()
            }
        );
    }

    #[test]
    fn test_parse_artist_profile_not_found() {
        let body = r#"{"response": {
            "status": {"version": "4.2", "code": 5, "message": "The Identifier specified does not exist: Nobody"}
        }}"#;
        let result = parse_artist_profile("Nobody", body);
        assert!(matches!(result, Err(EnrichmentError::NoArtistMatch(name)) if name == "Nobody"));
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"response": {
            "status": {"version": "4.2", "code": 1, "message": "Invalid key: Unknown"}
        }}"#;
        match parse_song_search(body) {
            Err(EnrichmentError::Api { code, message }) => {
                assert_eq!(code, 1);
                assert_eq!(message, "Invalid key: Unknown");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_song_search() {
        let songs = parse_song_search(CREEP_SEARCH).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "SO042");
        assert_eq!(songs[0].artist_name, "Radiohead");

        let summary = songs[0].audio_summary.as_ref().unwrap();
        assert_eq!(summary.key, Some(7));
        assert_eq!(summary.tempo, Some(91.0));
        assert_eq!(summary.is_major(), Some(false));
    }

    #[test]
    fn test_parse_song_search_without_results() {
        let body = r#"{"response": {"status": {"code": 0, "message": "Success"}, "songs": []}}"#;
        assert!(parse_song_search(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_song_profile() {
        let summary = parse_song_profile("SO042", CREEP_SEARCH).unwrap();
        assert_eq!(summary.loudness, Some(-8.2));

        let no_summary = r#"{"response": {
            "status": {"code": 0, "message": "Success"},
            "songs": [{"id": "SO042", "title": "Creep"}]
        }}"#;
        assert!(matches!(
            parse_song_profile("SO042", no_summary),
            Err(EnrichmentError::MissingAudioSummary(id)) if id == "SO042"
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_song_search("<html>Bad Gateway</html>"),
            Err(EnrichmentError::InvalidResponse(_))
        ));
    }
}
