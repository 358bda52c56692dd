use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{
    get_styles, print_empty_list, print_error, print_key_value, print_list_item,
    print_section_footer, print_section_header, print_success,
};

use songlister_server::config::DEFAULT_DB_PATH;
use songlister_server::echonest::{EchoNestConfig, DEFAULT_ECHO_NEST_BASE_URL};
use songlister_server::songlist::{
    NewArtist, NewGroup, NewPerformance, NewSong, NewUser, NewVenue, Song, SonglistManager,
    DEFAULT_ENRICHMENT_TIMEOUT,
};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the SQLite database file.
    #[clap(value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub path: PathBuf,

    /// Echo Nest API key used to enrich new artists and songs.
    #[clap(long, env = "ECHO_NEST_API_KEY", hide_env_values = true)]
    pub echonest_api_key: Option<String>,

    /// Base URL of the Echo Nest API.
    #[clap(long, default_value = DEFAULT_ECHO_NEST_BASE_URL)]
    pub echonest_base_url: String,
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Creates a user. Fails if the email is already taken.
    AddUser {
        #[clap(long)]
        email: Option<String>,
        #[clap(long)]
        first_name: Option<String>,
        #[clap(long)]
        last_name: Option<String>,
        #[clap(long)]
        latitude: Option<f64>,
        #[clap(long)]
        longitude: Option<f64>,
        #[clap(long)]
        image_url: Option<String>,
    },

    /// Creates a group owned by the given user.
    AddGroup { user_id: i64, name: Option<String> },

    /// Creates an artist, looking up its Echo Nest id by name.
    AddArtist {
        name: String,
        #[clap(long)]
        songsterr_id: Option<String>,
        #[clap(long)]
        rdio_id: Option<String>,
    },

    /// Creates a song of the given artist. Key, tempo, loudness and mode
    /// always come from the Echo Nest audio summary.
    AddSong {
        artist_id: i64,
        name: String,
        #[clap(long)]
        file_url: Option<String>,
        #[clap(long)]
        songsterr_id: Option<String>,
        #[clap(long)]
        rdio_id: Option<String>,
        #[clap(long)]
        genre: Option<String>,
    },

    /// Creates a venue.
    AddVenue {
        name: String,
        #[clap(long)]
        latitude: Option<f64>,
        #[clap(long)]
        longitude: Option<f64>,
        #[clap(long)]
        fb_id: Option<String>,
    },

    /// Creates a performance, start is an RFC 3339 date time.
    AddPerformance {
        name: String,
        #[clap(value_parser = parse_datetime)]
        start: DateTime<Utc>,
        #[clap(long)]
        user_id: Option<i64>,
        #[clap(long)]
        venue_id: Option<i64>,
    },

    /// Marks a song as performed by a user.
    Claim { user_id: i64, song_id: i64 },

    /// Appends a song to a group.
    GroupAdd { group_id: i64, song_id: i64 },

    /// Shows a user with their songs, groups and performances.
    ShowUser { id: i64 },

    /// Shows a group and its songs in order.
    ShowGroup { id: i64 },

    /// Shows an artist and their songs.
    ShowArtist { id: i64 },

    /// Shows a song with its users and groups.
    ShowSong { id: i64 },

    /// Shows a venue and its performances.
    ShowVenue { id: i64 },

    /// Lists all songs.
    Songs,

    /// Shows how many records of each kind are stored.
    Counts,

    /// Shows the path of the current songlist db.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PROMPT: &str = ">> ";

fn print_songs(title: &str, songs: &[Song]) {
    print_section_header(title);
    if songs.is_empty() {
        print_empty_list("no songs");
    }
    for song in songs {
        print_list_item(&format!("[{}] {} - {}", song.id, song.artist_name, song.name));
    }
    print_section_footer();
}

fn print_list<T: std::fmt::Display>(title: &str, items: &[T], id: impl Fn(&T) -> i64) {
    print_section_header(title);
    if items.is_empty() {
        print_empty_list("none");
    }
    for item in items {
        print_list_item(&format!("[{}] {}", id(item), item));
    }
    print_section_footer();
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn run_command(
    command: InnerCommand,
    manager: &SonglistManager,
    runtime: &Runtime,
    db_path: &str,
) -> Result<CommandExecutionResult> {
    match command {
        InnerCommand::AddUser {
            email,
            first_name,
            last_name,
            latitude,
            longitude,
            image_url,
        } => {
            let user = manager.create_user(NewUser::new(
                email, first_name, last_name, latitude, longitude, image_url,
            ))?;
            print_success(&format!("Created user {} {}", user.id, user));
        }
        InnerCommand::AddGroup { user_id, name } => {
            let user = manager.get_user(user_id)?;
            let group = manager.create_group(NewGroup::new(&user, name))?;
            print_success(&format!("Created group {} {}", group.id, group));
        }
        InnerCommand::AddArtist {
            name,
            songsterr_id,
            rdio_id,
        } => {
            let artist = runtime.block_on(manager.create_artist(NewArtist::new(
                name,
                songsterr_id,
                rdio_id,
            )))?;
            print_success(&format!(
                "Created artist {} {} ({})",
                artist.id,
                artist,
                opt(&artist.echonest_id)
            ));
        }
        InnerCommand::AddSong {
            artist_id,
            name,
            file_url,
            songsterr_id,
            rdio_id,
            genre,
        } => {
            let artist = manager.get_artist(artist_id)?;
            let song = NewSong {
                file_url,
                songsterr_id,
                rdio_id,
                genre,
                ..NewSong::new(name, &artist)
            };
            let song = runtime.block_on(manager.create_song(song))?;
            print_success(&format!("Created song {} {}", song.id, song));
            print_key_value("Echo Nest id", &opt(&song.echonest_id));
            print_key_value("Key", &opt(&song.key));
            print_key_value("Major", &opt(&song.major_key));
            print_key_value("Tempo", &opt(&song.tempo));
            print_key_value("Loudness", &opt(&song.loudness));
        }
        InnerCommand::AddVenue {
            name,
            latitude,
            longitude,
            fb_id,
        } => {
            let venue = manager.create_venue(NewVenue::new(name, latitude, longitude, fb_id))?;
            print_success(&format!("Created venue {} {}", venue.id, venue));
        }
        InnerCommand::AddPerformance {
            name,
            start,
            user_id,
            venue_id,
        } => {
            let mut performance = NewPerformance::new(name, start);
            if let Some(user_id) = user_id {
                performance.set_user(&manager.get_user(user_id)?);
            }
            if let Some(venue_id) = venue_id {
                performance.set_venue(&manager.get_venue(venue_id)?);
            }
            let performance = manager.create_performance(performance)?;
            print_success(&format!(
                "Created performance {} {}",
                performance.id, performance
            ));
        }
        InnerCommand::Claim { user_id, song_id } => {
            manager.claim_song(user_id, song_id)?;
            print_success(&format!("User {} claimed song {}", user_id, song_id));
        }
        InnerCommand::GroupAdd { group_id, song_id } => {
            let position = manager.add_song_to_group(group_id, song_id)?;
            print_success(&format!(
                "Song {} added to group {} at position {}",
                song_id, group_id, position
            ));
        }
        InnerCommand::ShowUser { id } => {
            let user = manager.get_user(id)?;
            print_section_header(&user.to_string());
            print_key_value("Id", &user.id.to_string());
            print_key_value("UUID", &user.uuid);
            print_key_value("Email", &opt(&user.email));
            print_key_value("Image", &opt(&user.image_url));
            print_key_value("Latitude", &opt(&user.latitude));
            print_key_value("Longitude", &opt(&user.longitude));
            print_key_value("Created", &user.created.to_rfc3339());
            print_section_footer();
            print_songs("Songs", &manager.get_user_songs(id)?);
            print_list("Groups", &manager.get_user_groups(id)?, |g| g.id);
            print_list("Performances", &manager.get_user_performances(id)?, |p| p.id);
        }
        InnerCommand::ShowGroup { id } => {
            let group = manager.get_group(id)?;
            print_section_header(&group.to_string());
            print_key_value("Owner", &group.user_id.to_string());
            print_section_footer();
            print_songs("Songs", &manager.get_group_songs(id)?);
        }
        InnerCommand::ShowArtist { id } => {
            let artist = manager.get_artist(id)?;
            print_section_header(&artist.to_string());
            print_key_value("Echo Nest id", &opt(&artist.echonest_id));
            print_key_value("Songsterr id", &opt(&artist.songsterr_id));
            print_key_value("Rdio id", &opt(&artist.rdio_id));
            print_section_footer();
            print_songs("Songs", &manager.get_artist_songs(id)?);
        }
        InnerCommand::ShowSong { id } => {
            let song = manager.get_song(id)?;
            print_section_header(&song.to_string());
            print_key_value("Echo Nest id", &opt(&song.echonest_id));
            print_key_value("File", &opt(&song.file_url));
            print_key_value("Key", &opt(&song.key));
            print_key_value("Major", &opt(&song.major_key));
            print_key_value("Tempo", &opt(&song.tempo));
            print_key_value("Loudness", &opt(&song.loudness));
            print_section_footer();
            print_list("Users", &manager.get_song_users(id)?, |u| u.id);
            print_list("Groups", &manager.get_song_groups(id)?, |g| g.id);
        }
        InnerCommand::ShowVenue { id } => {
            let venue = manager.get_venue(id)?;
            print_section_header(&venue.to_string());
            print_key_value("Latitude", &opt(&venue.latitude));
            print_key_value("Longitude", &opt(&venue.longitude));
            print_key_value("Facebook id", &opt(&venue.fb_id));
            print_section_footer();
            print_list("Performances", &manager.get_venue_performances(id)?, |p| {
                p.id
            });
        }
        InnerCommand::Songs => {
            print_songs("All songs", &manager.get_all_songs()?);
        }
        InnerCommand::Counts => {
            let counts = manager.get_counts()?;
            print_section_header("Counts");
            print_key_value("Users", &counts.users.to_string());
            print_key_value("Groups", &counts.groups.to_string());
            print_key_value("Artists", &counts.artists.to_string());
            print_key_value("Songs", &counts.songs.to_string());
            print_key_value("Venues", &counts.venues.to_string());
            print_key_value("Performances", &counts.performances.to_string());
            print_section_footer();
        }
        InnerCommand::Where => {
            println!("{}", db_path);
        }
        InnerCommand::Exit => return Ok(CommandExecutionResult::Exit),
    }
    Ok(CommandExecutionResult::Ok)
}

fn execute_command(
    line: String,
    manager: &SonglistManager,
    runtime: &Runtime,
    db_path: &str,
) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => {
            println!("{} {}", PROMPT, &line);
            match run_command(cli.command, manager, runtime, db_path) {
                Ok(result) => result,
                Err(err) => CommandExecutionResult::Error(format!("{:#}", err)),
            }
        }
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            CommandExecutionResult::Ok
        }
    }
}

#[derive(rustyline_derive::Hinter)]
struct SonglistHelper {
    commands_names: Vec<String>,
}

impl SonglistHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        SonglistHelper { commands_names }
    }
}

impl Completer for SonglistHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for SonglistHelper {}
impl Validator for SonglistHelper {}
impl Helper for SonglistHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let echonest = EchoNestConfig {
        base_url: cli_args.echonest_base_url.clone(),
        api_key: cli_args.echonest_api_key.clone(),
        ..Default::default()
    };
    let manager = SonglistManager::open(&cli_args.path, echonest, DEFAULT_ENRICHMENT_TIMEOUT)?;
    let db_path = cli_args.path.display().to_string();

    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<SonglistHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(SonglistHelper::new()));

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &manager, &runtime, &db_path) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => print_error(&err),
                }
            }
            Err(_) => break,
        }
    }

    Ok(())
}
