//! # Barrow Main Entry Point
//!
//! Loads the setting data, connects to Ollama (degrading to template
//! descriptions when unavailable), and runs the interactive tile loop.

use clap::Parser;
use log::{info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use barrow::{
    BarrowResult, EncounterAssembler, EncounterOutcome, EncounterRequest, OllamaClient,
    OllamaConfig, ReplCommand, SelectionPolicy,
};

/// Command line arguments for the Barrow encounter generator.
#[derive(Parser, Debug)]
#[command(name = "barrow")]
#[command(about = "A randomized tabletop encounter generator with LLM-flavored descriptions")]
#[command(version)]
struct Args {
    /// Number of player characters
    #[arg(short, long, default_value_t = barrow::config::DEFAULT_PLAYERS)]
    players: u32,

    /// Average party level
    #[arg(short, long, default_value_t = barrow::config::DEFAULT_LEVEL)]
    level: u32,

    /// Setting name (directory under the data dir)
    #[arg(long, default_value = barrow::config::DEFAULT_SETTING)]
    setting: String,

    /// Directory holding per-setting data files
    #[arg(long, default_value = barrow::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Random seed for reproducible encounters
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ollama model for descriptions
    #[arg(long, default_value = barrow::config::DEFAULT_MODEL)]
    model: String,

    /// Ollama server URL
    #[arg(long, default_value = barrow::config::DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Skip Ollama entirely and use template descriptions
    #[arg(long)]
    no_describe: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> BarrowResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Barrow v{}", barrow::VERSION);

    let assembler = build_assembler(&args);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Encounter RNG seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    run_repl(&args, &assembler, &mut rng)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();
}

/// Loads the setting and wires up the description source.
fn build_assembler(args: &Args) -> EncounterAssembler {
    let assembler =
        EncounterAssembler::load_setting(&args.data_dir, &args.setting, SelectionPolicy::current());

    if args.no_describe {
        info!("Descriptions: template only (--no-describe)");
        return assembler;
    }

    let config = OllamaConfig {
        base_url: args.ollama_url.clone(),
        model: args.model.clone(),
        ..OllamaConfig::default()
    };
    match OllamaClient::connect(config) {
        Ok(client) => assembler.with_describer(Box::new(client)),
        Err(e) => {
            warn!("Ollama not available: {}. Using template descriptions.", e);
            assembler
        }
    }
}

/// The interactive tile loop. Exits cleanly on `quit` or end of input.
fn run_repl(args: &Args, assembler: &EncounterAssembler, rng: &mut StdRng) -> BarrowResult<()> {
    println!("Barrow Encounter Generator v{}", barrow::VERSION);
    println!(
        "Party: {} PCs, average level {}. Setting: {}.",
        args.players, args.level, args.setting
    );
    print_tiles(assembler);
    println!("Enter a tile name ('skull <tile>' for hard mode, 'help' for commands).");

    let stdin = std::io::stdin();
    loop {
        print!("\ntile> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // End of input behaves like quit.
            break;
        }

        let command = match ReplCommand::parse(&line) {
            Some(command) => command,
            None => continue,
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(),
            ReplCommand::Tiles => print_tiles(assembler),
            ReplCommand::Generate { tile, hard } => {
                generate_one(args, assembler, &tile, hard, rng);
            }
        }
    }

    info!("Session ended");
    Ok(())
}

/// Resolves the tile name and prints one assembled encounter.
fn generate_one(
    args: &Args,
    assembler: &EncounterAssembler,
    tile_input: &str,
    hard: bool,
    rng: &mut StdRng,
) {
    let registry = assembler.tiles();
    let tile_name = match registry.resolve_tile_name(tile_input) {
        Some(name) => name,
        None => {
            let matches = registry.matching_tiles(tile_input);
            if matches.len() > 1 {
                // Ambiguity is never silently broken; reject this request.
                println!(
                    "Ambiguous tile name '{}'; matches: {}",
                    tile_input,
                    matches.join(", ")
                );
                return;
            }
            // Unknown tiles proceed as synthesized generic rooms.
            println!("Unknown tile '{}'; treating it as a dark passage.", tile_input);
            tile_input.to_string()
        }
    };

    let request = EncounterRequest::new(tile_name, args.players, args.level, hard);
    match assembler.assemble(&request, rng) {
        EncounterOutcome::Quiet { tile } => {
            println!("No encounter in {}, just eerie silence.", tile.name);
        }
        EncounterOutcome::Encounter(encounter) => {
            println!("\n{}", encounter);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <tile>         generate an encounter (name or unambiguous part)");
    println!("  skull <tile>   hard-mode encounter (also: <tile>!)");
    println!("  tiles          list known tiles");
    println!("  help           show this text");
    println!("  quit           exit");
}

fn print_tiles(assembler: &EncounterAssembler) {
    println!("Available tiles: {}", assembler.tiles().tile_names().join(", "));
}
