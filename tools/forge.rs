/// Forge: generate characters from a lore directory and print them as JSON.
///
/// Usage: forge [--lore-dir <dir>] [--seed <n>] [--count <n>] [--pretty] [field=value ...]
///
/// Overrides use the same fields as the bulk request: comma-separated values
/// are handed out per character, e.g. `forge --count 3 race=nord,khajiit`.

use character_forge::core::forge::{CharacterForge, ForgeResponse};
use character_forge::core::request::BulkRequest;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "forge", about = "Generate lore-consistent characters")]
struct Args {
    /// Directory holding the .ron lore tables.
    #[arg(long, default_value = "lore_data")]
    lore_dir: PathBuf,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of characters to generate.
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Field overrides as `field=value`.
    #[arg(value_parser = parse_override)]
    overrides: Vec<(String, String)>,
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", raw)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let forge = match CharacterForge::builder().lore_dir(&args.lore_dir).build() {
        Ok(forge) => forge,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let count = args.count.to_string();
    let params = std::iter::once(("count".to_string(), count)).chain(args.overrides);
    let request = BulkRequest::parse(params);
    tracing::info!(count = request.count(), lore_dir = %args.lore_dir.display(), "forging characters");

    let responses = forge.generate_bulk(&request, &mut rng);
    let failed = responses.iter().filter(|r| r.error().is_some()).count();

    let rendered = if responses.len() == 1 {
        render(&responses[0], args.pretty)
    } else if args.pretty {
        serde_json::to_string_pretty(&responses)
    } else {
        serde_json::to_string(&responses)
    };

    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("ERROR: could not serialize output: {}", e);
            process::exit(1);
        }
    }

    if failed > 0 {
        tracing::warn!(failed, "some characters could not be generated");
        process::exit(1);
    }
}

fn render(response: &ForgeResponse, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        response.to_json_pretty()
    } else {
        response.to_json()
    }
}
