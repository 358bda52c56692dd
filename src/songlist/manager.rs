use super::enrichment::Enricher;
use super::models::*;
use super::store::{is_unique_violation, SqliteSonglistStore};
use super::trait_def::{SonglistStore, StoreCounts};
use crate::echonest::{EchoNestClient, EchoNestConfig, EnrichmentError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SonglistError {
    #[error("Enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type SonglistResult<T> = Result<T, SonglistError>;

/// What the index page shows: one user's songs next to every song.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSongs {
    pub user: User,
    pub user_songs: Vec<Song>,
    pub all_songs: Vec<Song>,
}

fn found<T>(value: Option<T>, entity: &'static str, id: i64) -> SonglistResult<T> {
    value.ok_or(SonglistError::NotFound { entity, id })
}

fn conflict_or_storage(err: anyhow::Error, conflict: impl FnOnce() -> String) -> SonglistError {
    if is_unique_violation(&err) {
        SonglistError::Conflict(conflict())
    } else {
        SonglistError::Storage(err)
    }
}

/// Entry point for creating and reading songlist records.
///
/// Artists and songs go through the [`Enricher`] before they are stored, so
/// a failed lookup leaves nothing behind.
pub struct SonglistManager {
    store: Arc<dyn SonglistStore>,
    enricher: Enricher,
}

impl SonglistManager {
    pub fn new(store: Arc<dyn SonglistStore>, enricher: Enricher) -> Self {
        Self { store, enricher }
    }

    /// Opens the SQLite store at `db_path` and enriches through Echo Nest.
    pub fn open<P: AsRef<Path>>(
        db_path: P,
        echonest: EchoNestConfig,
        enrichment_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let store = SqliteSonglistStore::new(db_path)?;
        let client = EchoNestClient::new(echonest)?;
        if !client.has_api_key() {
            warn!("No Echo Nest API key configured, artist and song creation will fail");
        }
        Ok(Self::new(
            Arc::new(store),
            Enricher::new(Arc::new(client), enrichment_timeout),
        ))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    pub fn create_user(&self, user: NewUser) -> SonglistResult<User> {
        let created = self.store.insert_user(&user).map_err(|e| {
            conflict_or_storage(e, || {
                format!(
                    "a user with email {:?} or image url {:?} already exists",
                    user.email, user.image_url
                )
            })
        })?;
        info!("Created user {} {}", created.id, created);
        Ok(created)
    }

    pub fn create_group(&self, group: NewGroup) -> SonglistResult<Group> {
        self.get_user(group.user_id)?;
        let created = self.store.insert_group(&group)?;
        info!("Created group {} {}", created.id, created);
        Ok(created)
    }

    pub async fn create_artist(&self, artist: NewArtist) -> SonglistResult<Artist> {
        let artist = self.enricher.enrich_artist(artist).await?;
        let created = self.store.insert_artist(&artist)?;
        info!("Created artist {} {}", created.id, created);
        Ok(created)
    }

    pub async fn create_song(&self, song: NewSong) -> SonglistResult<Song> {
        self.get_artist(song.artist_id)?;
        let song = self.enricher.enrich_song(song).await?;
        if let Some(genre) = &song.genre {
            debug!("Dropping genre {:?} of song {}", genre, song.name);
        }
        let created = self.store.insert_song(&song)?;
        info!("Created song {} {}", created.id, created);
        Ok(created)
    }

    pub fn create_venue(&self, venue: NewVenue) -> SonglistResult<Venue> {
        let created = self.store.insert_venue(&venue)?;
        info!("Created venue {} {}", created.id, created);
        Ok(created)
    }

    pub fn create_performance(&self, performance: NewPerformance) -> SonglistResult<Performance> {
        if let Some(user_id) = performance.user_id {
            self.get_user(user_id)?;
        }
        if let Some(venue_id) = performance.venue_id {
            self.get_venue(venue_id)?;
        }
        let created = self.store.insert_performance(&performance)?;
        info!("Created performance {} {}", created.id, created);
        Ok(created)
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Records that the user performs the song. Claiming twice is a no-op.
    pub fn claim_song(&self, user_id: i64, song_id: i64) -> SonglistResult<()> {
        self.get_user(user_id)?;
        self.get_song(song_id)?;
        self.store.add_user_song(user_id, song_id)?;
        debug!("User {} claimed song {}", user_id, song_id);
        Ok(())
    }

    /// Appends the song to the group, returns its position.
    pub fn add_song_to_group(&self, group_id: i64, song_id: i64) -> SonglistResult<usize> {
        self.get_group(group_id)?;
        self.get_song(song_id)?;
        let position = self.store.add_group_song(group_id, song_id).map_err(|e| {
            conflict_or_storage(e, || {
                format!("song {} is already in group {}", song_id, group_id)
            })
        })?;
        debug!("Song {} added to group {} at {}", song_id, group_id, position);
        Ok(position)
    }

    pub fn get_user_songs(&self, user_id: i64) -> SonglistResult<Vec<Song>> {
        Ok(self.store.get_user_songs(user_id)?)
    }

    pub fn get_song_users(&self, song_id: i64) -> SonglistResult<Vec<User>> {
        Ok(self.store.get_song_users(song_id)?)
    }

    pub fn get_user_groups(&self, user_id: i64) -> SonglistResult<Vec<Group>> {
        Ok(self.store.get_user_groups(user_id)?)
    }

    pub fn get_group_songs(&self, group_id: i64) -> SonglistResult<Vec<Song>> {
        Ok(self.store.get_group_songs(group_id)?)
    }

    pub fn get_song_groups(&self, song_id: i64) -> SonglistResult<Vec<Group>> {
        Ok(self.store.get_song_groups(song_id)?)
    }

    pub fn get_artist_songs(&self, artist_id: i64) -> SonglistResult<Vec<Song>> {
        Ok(self.store.get_artist_songs(artist_id)?)
    }

    pub fn get_user_performances(&self, user_id: i64) -> SonglistResult<Vec<Performance>> {
        Ok(self.store.get_user_performances(user_id)?)
    }

    pub fn get_venue_performances(&self, venue_id: i64) -> SonglistResult<Vec<Performance>> {
        Ok(self.store.get_venue_performances(venue_id)?)
    }

    pub fn get_all_songs(&self) -> SonglistResult<Vec<Song>> {
        Ok(self.store.get_all_songs()?)
    }

    pub fn get_index_songs(&self, user_id: i64) -> SonglistResult<IndexSongs> {
        let user = self.get_user(user_id)?;
        let user_songs = self.store.get_user_songs(user_id)?;
        let all_songs = self.store.get_all_songs()?;
        Ok(IndexSongs {
            user,
            user_songs,
            all_songs,
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn get_user(&self, id: i64) -> SonglistResult<User> {
        found(self.store.get_user(id)?, "User", id)
    }

    pub fn find_user_by_email(&self, email: &str) -> SonglistResult<Option<User>> {
        Ok(self.store.get_user_by_email(email)?)
    }

    pub fn get_group(&self, id: i64) -> SonglistResult<Group> {
        found(self.store.get_group(id)?, "Group", id)
    }

    pub fn get_artist(&self, id: i64) -> SonglistResult<Artist> {
        found(self.store.get_artist(id)?, "Artist", id)
    }

    pub fn get_song(&self, id: i64) -> SonglistResult<Song> {
        found(self.store.get_song(id)?, "Song", id)
    }

    pub fn get_venue(&self, id: i64) -> SonglistResult<Venue> {
        found(self.store.get_venue(id)?, "Venue", id)
    }

    pub fn get_performance(&self, id: i64) -> SonglistResult<Performance> {
        found(self.store.get_performance(id)?, "Performance", id)
    }

    pub fn get_counts(&self) -> SonglistResult<StoreCounts> {
        Ok(self.store.get_counts()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::songlist::enrichment::tests::MockProvider;
    use tempfile::TempDir;

    fn create_tmp_manager() -> (SonglistManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteSonglistStore::new(temp_dir.path().join("test.db")).unwrap();
        let enricher = Enricher::new(
            Arc::new(MockProvider::with_radiohead()),
            Duration::from_secs(5),
        );
        (SonglistManager::new(Arc::new(store), enricher), temp_dir)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser::new(Some(email.to_string()), None, None, None, None, None)
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let (manager, _temp_dir) = create_tmp_manager();
        manager.create_user(new_user("ed@example.com")).unwrap();

        let result = manager.create_user(new_user("ed@example.com"));
        assert!(matches!(result, Err(SonglistError::Conflict(_))));
        assert_eq!(manager.get_counts().unwrap().users, 1);
    }

    #[tokio::test]
    async fn artist_and_song_are_enriched_then_stored() {
        let (manager, _temp_dir) = create_tmp_manager();

        let artist = manager
            .create_artist(NewArtist::new("Radiohead", None, None))
            .await
            .unwrap();
        assert_eq!(artist.echonest_id.as_deref(), Some("AR001"));

        let song = manager
            .create_song(NewSong {
                tempo: Some(999.0),
                key: Some(1),
                ..NewSong::new("Creep", &artist)
            })
            .await
            .unwrap();
        let stored = manager.get_song(song.id).unwrap();
        assert_eq!(stored.echonest_id.as_deref(), Some("SO042"));
        assert_eq!(stored.tempo, Some(91.0));
        assert_eq!(stored.key, Some(7));
        assert_eq!(stored.major_key, Some(false));
    }

    #[tokio::test]
    async fn failed_enrichment_stores_nothing() {
        let (manager, _temp_dir) = create_tmp_manager();

        let result = manager
            .create_artist(NewArtist::new("Nobody", None, None))
            .await;
        assert!(matches!(
            result,
            Err(SonglistError::Enrichment(EnrichmentError::NoArtistMatch(_)))
        ));

        let artist = manager
            .create_artist(NewArtist::new("Radiohead", None, None))
            .await
            .unwrap();
        let result = manager
            .create_song(NewSong::new("Unknown Song", &artist))
            .await;
        assert!(matches!(
            result,
            Err(SonglistError::Enrichment(EnrichmentError::NoSongMatch { .. }))
        ));

        let counts = manager.get_counts().unwrap();
        assert_eq!(counts.artists, 1);
        assert_eq!(counts.songs, 0);
    }

    #[tokio::test]
    async fn group_membership() {
        let (manager, _temp_dir) = create_tmp_manager();
        let user = manager.create_user(new_user("ed@example.com")).unwrap();
        let group = manager
            .create_group(NewGroup::new(&user, Some("Encore".to_string())))
            .unwrap();
        let artist = manager
            .create_artist(NewArtist::new("Radiohead", None, None))
            .await
            .unwrap();
        let song = manager
            .create_song(NewSong::new("Creep", &artist))
            .await
            .unwrap();

        assert_eq!(manager.add_song_to_group(group.id, song.id).unwrap(), 0);
        assert_eq!(manager.get_group_songs(group.id).unwrap(), vec![song.clone()]);
        assert_eq!(manager.get_song_groups(song.id).unwrap(), vec![group.clone()]);

        assert!(matches!(
            manager.add_song_to_group(group.id, song.id),
            Err(SonglistError::Conflict(_))
        ));
        assert!(matches!(
            manager.add_song_to_group(group.id, 404),
            Err(SonglistError::NotFound { entity: "Song", id: 404 })
        ));
    }

    #[test]
    fn group_needs_existing_owner() {
        let (manager, _temp_dir) = create_tmp_manager();
        let ghost = User {
            id: 12,
            uuid: "ghost".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            latitude: None,
            longitude: None,
            image_url: None,
            created: chrono::Utc::now(),
            updated: chrono::Utc::now(),
        };
        assert!(matches!(
            manager.create_group(NewGroup::new(&ghost, None)),
            Err(SonglistError::NotFound { entity: "User", id: 12 })
        ));
    }

    #[tokio::test]
    async fn index_songs_lists_user_songs_and_all_songs() {
        let (manager, _temp_dir) = create_tmp_manager();
        manager.create_user(new_user("first@example.com")).unwrap();
        let user = manager.create_user(new_user("second@example.com")).unwrap();
        assert_eq!(user.id, 2);

        let artist = manager
            .create_artist(NewArtist::new("Radiohead", None, None))
            .await
            .unwrap();
        let mut songs = vec![];
        for _ in 0..5 {
            songs.push(
                manager
                    .create_song(NewSong::new("Creep", &artist))
                    .await
                    .unwrap(),
            );
        }
        manager.claim_song(user.id, songs[1].id).unwrap();
        manager.claim_song(user.id, songs[3].id).unwrap();

        let index = manager.get_index_songs(2).unwrap();
        assert_eq!(index.user, user);
        assert_eq!(index.user_songs, vec![songs[1].clone(), songs[3].clone()]);
        assert_eq!(index.all_songs, songs);

        assert!(matches!(
            manager.get_index_songs(3),
            Err(SonglistError::NotFound { entity: "User", id: 3 })
        ));
    }

    #[test]
    fn performance_links_user_and_venue() {
        let (manager, _temp_dir) = create_tmp_manager();
        let user = manager.create_user(new_user("ed@example.com")).unwrap();
        let venue = manager
            .create_venue(NewVenue::new("The Roxy", None, None, None))
            .unwrap();

        let mut performance = NewPerformance::new("Late show", chrono::Utc::now());
        performance.set_user(&user);
        performance.set_venue(&venue);
        let performance = manager.create_performance(performance).unwrap();

        assert_eq!(
            manager.get_user_performances(user.id).unwrap(),
            vec![performance.clone()]
        );
        assert_eq!(
            manager.get_venue_performances(venue.id).unwrap(),
            vec![performance]
        );
    }
}
