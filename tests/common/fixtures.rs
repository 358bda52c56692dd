//! Test data and a fake metadata provider
//!
//! The store is seeded through the manager, so artists and songs go through
//! the same enrichment step as in production.

use super::constants::*;
use async_trait::async_trait;
use songlister_server::echonest::{
    AudioSummary, EnrichmentError, ExternalArtist, MetadataProvider, SongMatch,
};
use songlister_server::songlist::{NewArtist, NewSong, NewUser, Song, SonglistManager};

/// Answers lookups from the constants in [`super::constants`].
pub struct FakeEchoNest;

#[async_trait]
impl MetadataProvider for FakeEchoNest {
    async fn get_artist(&self, name: &str) -> Result<ExternalArtist, EnrichmentError> {
        let id = match name {
            ARTIST_1_NAME => ARTIST_1_ECHONEST_ID,
            ARTIST_2_NAME => ARTIST_2_ECHONEST_ID,
            _ => return Err(EnrichmentError::NoArtistMatch(name.to_string())),
        };
        Ok(ExternalArtist {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    async fn search_songs(
        &self,
        artist: &str,
        title: &str,
        results: usize,
    ) -> Result<Vec<SongMatch>, EnrichmentError> {
        Ok(SONGS
            .iter()
            .filter(|(a, t, ..)| *a == artist && *t == title)
            .take(results)
            .map(|(a, t, id, key, mode, tempo, loudness)| SongMatch {
                id: id.to_string(),
                title: t.to_string(),
                artist_name: a.to_string(),
                audio_summary: Some(AudioSummary {
                    key: Some(*key),
                    mode: Some(*mode),
                    tempo: Some(*tempo),
                    loudness: Some(*loudness),
                }),
            })
            .collect())
    }

    async fn get_audio_summary(&self, song_id: &str) -> Result<AudioSummary, EnrichmentError> {
        Err(EnrichmentError::MissingAudioSummary(song_id.to_string()))
    }
}

/// Two users, two artists, five songs, two of which belong to user 2.
/// Returns the songs in insertion order.
pub async fn seed_test_data(manager: &SonglistManager) -> anyhow::Result<Vec<Song>> {
    manager.create_user(NewUser::new(
        Some(OTHER_USER_EMAIL.to_string()),
        Some("Other".to_string()),
        None,
        None,
        None,
        None,
    ))?;
    let index_user = manager.create_user(NewUser::new(
        Some(INDEX_USER_EMAIL.to_string()),
        Some(INDEX_USER_FIRST_NAME.to_string()),
        Some("Yorke".to_string()),
        Some(51.75),
        Some(-1.25),
        None,
    ))?;
    anyhow::ensure!(
        index_user.id == INDEX_USER_ID,
        "index user got id {}",
        index_user.id
    );

    let radiohead = manager
        .create_artist(NewArtist::new(ARTIST_1_NAME, None, None))
        .await?;
    let portishead = manager
        .create_artist(NewArtist::new(ARTIST_2_NAME, None, None))
        .await?;

    let mut songs = Vec::with_capacity(SONGS.len());
    for (artist_name, title, ..) in SONGS.iter() {
        let artist = if *artist_name == ARTIST_1_NAME {
            &radiohead
        } else {
            &portishead
        };
        songs.push(manager.create_song(NewSong::new(*title, artist)).await?);
    }

    for index in INDEX_USER_SONGS {
        manager.claim_song(index_user.id, songs[index].id)?;
    }

    Ok(songs)
}
