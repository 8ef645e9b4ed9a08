use clap::{Parser, Subcommand};
use closet_cli::cmd::{
    self, config::ConfigSubcommand, custom::CustomSubcommand, dark_mode::DarkModeArg,
    favorite::FavoriteSubcommand, item::ItemSubcommand, FilterArgs,
};
use closet_cli::{root, shell};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "closet",
    about = "Personal wardrobe catalog with outfit suggestions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Wardrobe directory (default: ~/.closet)
    #[arg(long, global = true, env = "CLOSET_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage wardrobe items
    Item {
        #[command(subcommand)]
        subcommand: ItemSubcommand,
    },

    /// Compose a random outfit from matching items
    Suggest {
        #[command(flatten)]
        filters: FilterArgs,
        /// Save the suggestion to favorites
        #[arg(long)]
        save: bool,
    },

    /// Manage favorite outfits
    Favorite {
        #[command(subcommand)]
        subcommand: FavoriteSubcommand,
    },

    /// Manage hand-built outfits
    Custom {
        #[command(subcommand)]
        subcommand: CustomSubcommand,
    },

    /// Show or change the dark mode preference
    DarkMode {
        #[arg(value_enum)]
        mode: Option<DarkModeArg>,
    },

    /// Ask the outfit assistant a question
    Chat { message: String },

    /// Interactive session
    Shell,

    /// Inspect and validate config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Chat { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = root::resolve_root(cli.root.as_deref()).and_then(|root| match cli.command {
        Commands::Item { subcommand } => cmd::item::run(&root, subcommand, cli.json),
        Commands::Suggest { filters, save } => cmd::suggest::run(&root, &filters, save, cli.json),
        Commands::Favorite { subcommand } => cmd::favorite::run(&root, subcommand, cli.json),
        Commands::Custom { subcommand } => cmd::custom::run(&root, subcommand, cli.json),
        Commands::DarkMode { mode } => cmd::dark_mode::run(&root, mode, cli.json),
        Commands::Chat { message } => cmd::chat::run(&root, &message, cli.json),
        Commands::Shell => shell::run(&root),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
