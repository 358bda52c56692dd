//! Second phase of Artist and Song creation: fill in external metadata.

use super::models::{NewArtist, NewSong};
use crate::echonest::{EnrichmentError, MetadataProvider};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct Enricher {
    provider: Arc<dyn MetadataProvider>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(provider: Arc<dyn MetadataProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    async fn bounded<T>(
        &self,
        lookup: impl Future<Output = Result<T, EnrichmentError>>,
    ) -> Result<T, EnrichmentError> {
        tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| EnrichmentError::Timeout)?
    }

    /// Sets the artist's `echonest_id` from a lookup by name.
    pub async fn enrich_artist(&self, mut artist: NewArtist) -> Result<NewArtist, EnrichmentError> {
        let external = self.bounded(self.provider.get_artist(&artist.name)).await?;
        debug!("Artist {} resolved to {}", artist.name, external.id);
        artist.echonest_id = Some(external.id);
        Ok(artist)
    }

    /// Overwrites the song's external id and audio attributes with the best
    /// search match, whatever the caller put there.
    pub async fn enrich_song(&self, mut song: NewSong) -> Result<NewSong, EnrichmentError> {
        let result = self
            .bounded(async {
                let best = self
                    .provider
                    .search_songs(&song.artist_name, &song.name, 1)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| EnrichmentError::NoSongMatch {
                        artist: song.artist_name.clone(),
                        title: song.name.clone(),
                    })?;
                let summary = match best.audio_summary.clone() {
                    Some(summary) => summary,
                    None => self.provider.get_audio_summary(&best.id).await?,
                };
                Ok::<_, EnrichmentError>((best, summary))
            })
            .await;
        let (best, summary) = result?;

        debug!("Song match: {}", best.title);
        debug!("Audio summary: {:?}", summary);

        song.echonest_id = Some(best.id);
        song.key = summary.key;
        song.tempo = summary.tempo;
        song.loudness = summary.loudness;
        song.major_key = summary.is_major();
        Ok(song)
    }
}
