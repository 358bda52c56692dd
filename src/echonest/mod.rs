//! Echo Nest metadata lookups.
//!
//! The [`MetadataProvider`] trait is what the songlist enrichment step talks
//! to. [`EchoNestClient`] implements it against the Echo Nest v4 HTTP API.

mod client;
mod models;

pub use client::{EchoNestClient, EchoNestConfig, DEFAULT_ECHO_NEST_BASE_URL};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a metadata lookup.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("No Echo Nest API key configured")]
    MissingApiKey,

    #[error("No artist found matching {0:?}")]
    NoArtistMatch(String),

    #[error("No song found matching {artist:?} - {title:?}")]
    NoSongMatch { artist: String, title: String },

    #[error("No audio summary available for song {0}")]
    MissingAudioSummary(String),

    #[error("Echo Nest API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Metadata lookup timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnrichmentError::Timeout
        } else {
            EnrichmentError::Http(err)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExternalArtist {
    pub id: String,
    pub name: String,
}

/// Musical attributes of a song as computed by the provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioSummary {
    /// Pitch class, 0 = C.
    pub key: Option<i32>,
    /// 1 = major, 0 = minor.
    pub mode: Option<i32>,
    pub tempo: Option<f64>,
    pub loudness: Option<f64>,
}

impl AudioSummary {
    pub fn is_major(&self) -> Option<bool> {
        self.mode.map(|mode| mode == 1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongMatch {
    pub id: String,
    pub title: String,
    pub artist_name: String,
    /// Present when the search was asked for the audio summary bucket.
    pub audio_summary: Option<AudioSummary>,
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Looks up an artist by name.
    async fn get_artist(&self, name: &str) -> Result<ExternalArtist, EnrichmentError>;

    /// Searches songs by artist name and title, best match first.
    async fn search_songs(
        &self,
        artist: &str,
        title: &str,
        results: usize,
    ) -> Result<Vec<SongMatch>, EnrichmentError>;

    async fn get_audio_summary(&self, song_id: &str) -> Result<AudioSummary, EnrichmentError>;
}
