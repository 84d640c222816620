use clap::{value_parser, Arg, ArgAction, Command};
use dondisco::configuration::{create_config, ConfigFolder};
use dondisco::startup::{run_health, run_recommend, run_session};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Command::new("dondisco")
        .about("🎵 Discover your next favorite artist from up to three you already love 🎵")
        .subcommand(
            Command::new("recommend")
                .about("🔥 Get recommendations for the given artists")
                .arg(
                    Arg::new("artists")
                        .help("Reference artists (up to 3)")
                        .required(true)
                        .num_args(1..),
                )
                .arg(
                    Arg::new("pages")
                        .long("pages")
                        .help("Number of 5-artist pages to fetch")
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the session state as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("session").about("🎧 Start an interactive recommendation session"),
        )
        .subcommand(Command::new("health").about("🩺 Check that the recommendation backend is up"))
        .subcommand(
            Command::new("config").about("🛠️ Create or update configuration file for dondisco"),
        )
        .get_matches();

    let cfg_folder = ConfigFolder::new()?;

    match args.subcommand() {
        Some(("recommend", sub)) => {
            let artists = sub
                .get_many::<String>("artists")
                .unwrap_or_default()
                .cloned()
                .collect();
            let pages = sub.get_one::<usize>("pages").copied().unwrap_or(1);
            run_recommend(cfg_folder, artists, pages, sub.get_flag("json")).await
        }
        Some(("session", _)) => {
            println!("\x1b[1m\x1b[34mStarting a recommendation session...\x1b[0m");
            run_session(cfg_folder).await
        }
        Some(("health", _)) => run_health(cfg_folder).await,
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring dondisco...\x1b[0m");
            create_config(cfg_folder)
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mdondisco recommend <artist>...\x1b[0m - 🔥 One-shot recommendations");
    println!("  \x1b[1m\x1b[32mdondisco session\x1b[0m              - 🎧 Interactive session");
    println!("  \x1b[1m\x1b[32mdondisco health\x1b[0m               - 🩺 Check the backend");
    println!("  \x1b[1m\x1b[32mdondisco config\x1b[0m               - 🛠️  Create or update configuration file");
    println!("\x1b[33mUse these commands to find new music you'll love!\x1b[0m\n");
}
