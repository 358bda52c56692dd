//! Echo Nest v4 response bodies.
//!
//! Every body is wrapped as `{"response": {"status": {...}, ...}}`. Fields we
//! don't use are ignored.

use super::{AudioSummary, ExternalArtist, SongMatch};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
}

#[derive(Debug, Deserialize)]
pub struct ResponseStatus {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtistProfileResponse {
    pub status: ResponseStatus,
    pub artist: Option<EchoNestArtist>,
}

#[derive(Debug, Deserialize)]
pub struct EchoNestArtist {
    pub id: String,
    pub name: String,
}

/// Body of both `song/search` and `song/profile`.
#[derive(Debug, Deserialize)]
pub struct SongListResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub songs: Vec<EchoNestSong>,
}

#[derive(Debug, Deserialize)]
pub struct EchoNestSong {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist_name: String,
    pub audio_summary: Option<EchoNestAudioSummary>,
}

#[derive(Debug, Deserialize)]
pub struct EchoNestAudioSummary {
    pub key: Option<i32>,
    pub mode: Option<i32>,
    pub tempo: Option<f64>,
    pub loudness: Option<f64>,
}

impl From<EchoNestArtist> for ExternalArtist {
    fn from(artist: EchoNestArtist) -> Self {
        ExternalArtist {
            id: artist.id,
            name: artist.name,
        }
    }
}

impl From<EchoNestAudioSummary> for AudioSummary {
    fn from(summary: EchoNestAudioSummary) -> Self {
        AudioSummary {
            key: summary.key,
            mode: summary.mode,
            tempo: summary.tempo,
            loudness: summary.loudness,
        }
    }
}

impl From<EchoNestSong> for SongMatch {
    fn from(song: EchoNestSong) -> Self {
        SongMatch {
            id: song.id,
            title: song.title,
            artist_name: song.artist_name,
            audio_summary: song.audio_summary.map(AudioSummary::from),
        }
    }
}
