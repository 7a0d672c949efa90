//! Formation Planner CLI
//!
//! Drives the formation board from the terminal: list formations, browse and
//! create cards on the card service, run board session scripts and export
//! the saved formation as a PNG.

#[cfg(feature = "cli")]
use anyhow::{bail, Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use fp_core::api::create::{validate_upload, Preset};
#[cfg(feature = "cli")]
use fp_core::data_uri::{mime_for_path, DataUri};
#[cfg(feature = "cli")]
use fp_core::export::MAX_EXPORT_SCALE;
#[cfg(feature = "cli")]
use fp_core::{
    CardApi, CreateCardRequest, ExportCanvas, FileStore, FormationExporter, FormationName,
    HttpCardApi, PlannerApp, PlannerConfig,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "formation-planner")]
#[command(about = "Arrange player cards on a six-a-side formation board", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// List the formations and their slots
    Formations,

    /// List the cards stored on the card service
    Cards {
        /// Print the raw metadata as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Create a card on the card service
    Create {
        /// Start from a preset player (salah, ronaldo, messi)
        #[arg(long)]
        preset: Option<String>,

        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        club: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        overall: Option<i32>,
        #[arg(long)]
        pac: Option<i32>,
        #[arg(long)]
        dri: Option<i32>,
        #[arg(long)]
        sho: Option<i32>,
        #[arg(long)]
        def: Option<i32>,
        #[arg(long)]
        pas: Option<i32>,
        #[arg(long)]
        phy: Option<i32>,
        #[arg(long)]
        card_type: Option<String>,

        /// Player photo (PNG, JPG or WEBP, up to 5 MB)
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Directory the generated card image is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Run a board session script
    Session {
        /// Script file; reads stdin when omitted
        #[arg(long)]
        script: Option<PathBuf>,

        /// Answer yes to confirmation prompts
        #[arg(long, default_value = "false")]
        yes: bool,
    },

    /// Render the saved formation to a PNG
    Export {
        /// Store file holding the saved formation
        #[arg(long)]
        store: Option<PathBuf>,

        /// Canvas layout (standard, compact)
        #[arg(long)]
        canvas: Option<String>,

        /// Pixel density, 1 to 4
        #[arg(long)]
        scale: Option<u32>,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check that the card service is up
    Health,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PlannerConfig::from_env()?;

    match cli.command {
        Commands::Formations => {
            for formation in FormationName::ALL {
                for line in fp_cli::report::formation_lines(formation) {
                    println!("{line}");
                }
            }
        }

        Commands::Cards { json } => {
            let api = HttpCardApi::from_config(&config)?;
            println!("🔍 Fetching cards from {}...", api.api_url());
            let entries = api.get_cards()?;

            if json {
                let metadata: Vec<_> = entries.iter().map(|e| &e.metadata).collect();
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                let mut sidebar = fp_core::app::Sidebar::new();
                sidebar.apply(Ok(entries), &fp_core::FormationBoard::default());
                for line in fp_cli::sidebar_lines(&sidebar) {
                    println!("{line}");
                }
            }
        }

        Commands::Create {
            preset,
            name,
            position,
            club,
            country,
            overall,
            pac,
            dri,
            sho,
            def,
            pas,
            phy,
            card_type,
            photo,
            out,
        } => {
            let mut request = match preset.as_deref() {
                Some(preset) => Preset::from_name(preset)
                    .with_context(|| format!("unknown preset '{preset}'"))?
                    .request(),
                None => blank_request(),
            };

            if let Some(v) = name {
                request.name = v;
            }
            if let Some(v) = position {
                request.position = v;
            }
            if let Some(v) = club {
                request.club = v;
            }
            if let Some(v) = country {
                request.country = v;
            }
            if let Some(v) = card_type {
                request.card_type = v;
            }
            for (slot, value) in [
                (&mut request.overall, overall),
                (&mut request.pac, pac),
                (&mut request.dri, dri),
                (&mut request.sho, sho),
                (&mut request.def, def),
                (&mut request.pas, pas),
                (&mut request.phy, phy),
            ] {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            if let Some(path) = photo {
                request.image = Some(read_photo(&path)?);
            }

            let request = request.normalized();
            request.validate()?;

            println!("🔨 Creating card...");
            println!("   Name:     {}", request.name);
            println!("   Position: {}", request.position);
            println!("   Overall:  {}", request.overall);

            let api = HttpCardApi::from_config(&config)?;
            let created = api.create_card(&request)?;
            let image = DataUri::parse(created.image.as_str())?;

            std::fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            let filename = if created.filename.is_empty() {
                format!("web_{}.png", request.name)
            } else {
                created.filename.clone()
            };
            let path = out.join(filename);
            std::fs::write(&path, &image.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("\n✅ Card created: {}", path.display());
        }

        Commands::Session { script, yes } => {
            let text = match &script {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read script {}", path.display()))?,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let commands = fp_cli::parse_script(&text)?;

            let api = HttpCardApi::from_config(&config)?;
            let store = FileStore::open(&config.store_path)?;
            let mut session =
                fp_cli::Session::new(PlannerApp::new(config.clone(), api, store), yes);

            println!("⚽ Session with {} commands", commands.len());
            for command in &commands {
                println!("\n> {command:?}");
                match session.run(command) {
                    Ok(lines) => lines.iter().for_each(|line| println!("   {line}")),
                    Err(err) => println!("   ❌ {err:#}"),
                }
            }
        }

        Commands::Export { store, canvas, scale, out } => {
            let store_path = store.unwrap_or_else(|| config.store_path.clone());
            let canvas: ExportCanvas = match canvas {
                Some(name) => name.parse()?,
                None => config.export_canvas,
            };
            let scale = scale.unwrap_or(config.export_scale);
            if !(1..=MAX_EXPORT_SCALE).contains(&scale) {
                bail!("--scale must be between 1 and {MAX_EXPORT_SCALE}");
            }
            let out = out.unwrap_or_else(|| config.export_dir.clone());

            println!("🖼️  Exporting saved formation...");
            println!("   Store:  {}", store_path.display());
            println!("   Canvas: {canvas} x{scale}");

            let store = FileStore::open(&store_path)?;
            let saved = fp_core::storage::load_saved_formation(&store)?;
            let image = FormationExporter::new(canvas, scale).export_cards(
                saved.formation,
                &saved.placed_cards(),
                chrono::Utc::now(),
            )?;
            let path = image.write_to_dir(&out)?;

            println!("\n✅ Exported {} ({}x{}, {:?})", path.display(), image.width, image.height, image.strategy);
        }

        Commands::Health => {
            let api = HttpCardApi::from_config(&config)?;
            let health = api.health()?;
            if health.success {
                println!("✅ {} (version {})", health.message, health.version);
            } else {
                bail!("❌ Card service reported unhealthy: {}", health.message);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[cfg(feature = "cli")]
fn blank_request() -> CreateCardRequest {
    CreateCardRequest {
        name: String::new(),
        position: String::new(),
        club: String::new(),
        country: String::new(),
        overall: 0,
        pac: 0,
        dri: 0,
        sho: 0,
        def: 0,
        pas: 0,
        phy: 0,
        card_type: "GOLD".to_string(),
        image: None,
    }
}

#[cfg(feature = "cli")]
fn read_photo(path: &Path) -> Result<String> {
    let Some(mime) = mime_for_path(path) else {
        bail!("Unsupported photo {}, use PNG, JPG or WEBP", path.display());
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read photo {}", path.display()))?;
    validate_upload(mime, bytes.len() as u64)?;
    Ok(DataUri::encode(mime, &bytes))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("formation-planner is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
