use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotdump::{
    Res,
    cli::{self, Context},
    config::{self, Config},
    fatal,
    types::{Direction, TimeRange, TopItemType},
    utils::{self, OutputTarget, TimeZoneArg},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// File to write output to, `-` for standard output
    #[clap(
        long,
        short = 'o',
        global = true,
        default_value = "output.json"
    )]
    output: OutputTarget,

    /// Keep only the `items` array of the response
    #[clap(long, global = true, overrides_with = "full")]
    trim: bool,

    /// Write the whole response (default)
    #[clap(long, global = true, overrides_with = "trim")]
    full: bool,

    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    /// `--trim` unless `--full` was given as well.
    fn wants_trim(&self) -> bool {
        self.trim && !self.full
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth(AuthOptions),

    /// Get the current user's top artists or tracks
    GetTop(GetTopOptions),

    /// Get tracks from the current user's recently played tracks
    GetRecentlyPlayed(RecentlyPlayedOptions),

    /// Get a low-level audio analysis for a track
    AnalyzeTrack(AnalyzeTrackOptions),

    /// Get catalog information for one or more artists
    GetArtists(IdsOptions),

    /// Get catalog information for one or more tracks
    GetTracks(IdsOptions),

    /// Get audio features for one or more tracks
    GetAudioFeatures(AudioFeaturesOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Force authorization flow
    #[clap(long, conflicts_with = "check")]
    pub force: bool,

    /// Check if auth credentials are saved
    #[clap(long)]
    pub check: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GetTopOptions {
    /// The type of entity to return
    #[clap(value_enum, ignore_case = true, default_value = "artists")]
    pub item_type: TopItemType,

    /// The maximum number of items to return
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(0..=50))]
    pub limit: u32,

    /// The index of the first item to return
    #[clap(long, default_value_t = 0)]
    pub offset: u32,

    /// Over what time frame the affinities are computed
    #[clap(long, value_enum, default_value = "medium")]
    pub time_range: TimeRange,
}

#[derive(Parser, Debug, Clone)]
pub struct RecentlyPlayedOptions {
    /// Whether to get items before or after the timestamp
    #[clap(value_enum, ignore_case = true)]
    pub direction: Direction,

    /// Time to start getting items from (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[clap(value_parser = utils::parse_datetime)]
    pub timestamp: NaiveDateTime,

    /// The maximum number of items to return
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,

    /// Time zone of the timestamp: local, utc, a zone name like America/Tijuana or an offset like -07:00
    #[clap(long, default_value = "local", value_parser = utils::parse_time_zone)]
    pub time_zone: TimeZoneArg,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeTrackOptions {
    /// Spotify track ID. Use '-' if providing a file with IDs
    pub track_id: String,

    /// A newline-delimited .txt or .csv file with one track ID per line
    #[clap(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct IdsOptions {
    /// Spotify ID; can be repeated
    #[clap(long = "id", required = true, action = ArgAction::Append, num_args = 1)]
    pub ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AudioFeaturesOptions {
    /// Spotify track ID(s). Use '-' if providing a file with IDs
    #[clap(long = "id", required = true, action = ArgAction::Append, num_args = 1)]
    pub ids: Vec<String>,

    /// A newline-delimited .txt or .csv file with one track ID per line
    #[clap(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        fatal!("Cannot load environment. Err: {}", e);
    }

    if let Err(e) = run(cli).await {
        fatal!("{}", e);
    }
}

async fn run(cli: Cli) -> Res<()> {
    let config = Config::from_env()?;

    if let Command::Auth(opt) = &cli.command {
        return cli::auth(&config, opt.force, opt.check).await;
    }

    let trim = cli.wants_trim();
    let ctx = Context::resolve(&config, cli.output, trim).await?;

    match cli.command {
        Command::GetTop(opt) => {
            cli::get_top(&ctx, opt.item_type, opt.limit, opt.offset, opt.time_range).await
        }
        Command::GetRecentlyPlayed(opt) => {
            cli::get_recently_played(&ctx, opt.direction, opt.timestamp, opt.limit, opt.time_zone)
                .await
        }
        Command::AnalyzeTrack(opt) => {
            cli::analyze_track(&ctx, &opt.track_id, opt.file.as_deref()).await
        }
        Command::GetArtists(opt) => cli::get_artists(&ctx, &opt.ids).await,
        Command::GetTracks(opt) => cli::get_tracks(&ctx, &opt.ids).await,
        Command::GetAudioFeatures(opt) => {
            cli::get_audio_features(&ctx, &opt.ids, opt.file.as_deref()).await
        }
        Command::Auth(_) | Command::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_to_output_json() {
        let cli = Cli::try_parse_from(["spotdump", "get-tracks", "--id", "abc"]).unwrap();
        assert_eq!(cli.output, OutputTarget::File(PathBuf::from("output.json")));
        assert!(!cli.wants_trim());
    }

    #[test]
    fn dash_output_and_trim_are_global() {
        let cli =
            Cli::try_parse_from(["spotdump", "get-top", "tracks", "-o", "-", "--trim"]).unwrap();
        assert_eq!(cli.output, OutputTarget::Stdout);
        assert!(cli.wants_trim());
        match cli.command {
            Command::GetTop(opt) => {
                assert_eq!(opt.item_type, TopItemType::Tracks);
                assert_eq!(opt.limit, 20);
                assert_eq!(opt.offset, 0);
                assert_eq!(opt.time_range, TimeRange::Medium);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn full_overrides_trim() {
        let cli = Cli::try_parse_from(["spotdump", "get-top", "--trim", "--full"]).unwrap();
        assert!(!cli.wants_trim());
    }

    #[test]
    fn repeated_ids_keep_order() {
        let cli =
            Cli::try_parse_from(["spotdump", "get-artists", "--id", "b", "--id", "a"]).unwrap();
        match cli.command {
            Command::GetArtists(opt) => assert_eq!(opt.ids, vec!["b", "a"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn top_limit_is_bounded() {
        assert!(Cli::try_parse_from(["spotdump", "get-top", "--limit", "51"]).is_err());
        assert!(
            Cli::try_parse_from(["spotdump", "get-recently-played", "before", "2022-08-10", "--limit", "0"])
                .is_err()
        );
    }

    #[test]
    fn recently_played_parses_timestamp_and_zone() {
        let cli = Cli::try_parse_from([
            "spotdump",
            "get-recently-played",
            "after",
            "2022-08-10",
            "--time-zone",
            "-07:00",
        ])
        .unwrap();
        match cli.command {
            Command::GetRecentlyPlayed(opt) => {
                assert_eq!(opt.direction, Direction::After);
                assert_eq!(opt.timestamp.to_string(), "2022-08-10 00:00:00");
                assert!(matches!(opt.time_zone, TimeZoneArg::Fixed(_)));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn recently_played_accepts_zone_names() {
        let cli = Cli::try_parse_from([
            "spotdump",
            "get-recently-played",
            "before",
            "2022-08-10T18:30:00",
            "--time-zone",
            "America/Tijuana",
        ])
        .unwrap();
        match cli.command {
            Command::GetRecentlyPlayed(opt) => {
                assert_eq!(opt.time_zone, TimeZoneArg::Named(chrono_tz::America::Tijuana));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(
            Cli::try_parse_from([
                "spotdump",
                "get-recently-played",
                "before",
                "2022-08-10",
                "--time-zone",
                "Mars/Olympus_Mons",
            ])
            .is_err()
        );
    }

    #[test]
    fn auth_force_conflicts_with_check() {
        assert!(Cli::try_parse_from(["spotdump", "auth", "--force", "--check"]).is_err());
    }

    #[test]
    fn analyze_track_accepts_file() {
        let cli =
            Cli::try_parse_from(["spotdump", "analyze-track", "-", "--file", "ids.txt"]).unwrap();
        match cli.command {
            Command::AnalyzeTrack(opt) => {
                assert_eq!(opt.track_id, "-");
                assert_eq!(opt.file, Some(PathBuf::from("ids.txt")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
