use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdv_draw::config::{AppConfig, Command};
use pdv_draw::display::{print_report, write_report_to_file};
use pdv_draw::parser::load_lists;
use pdv_draw::web::{self, AppState};
use pdv_draw::{DrawError, JsonFileStore, SessionContext, SessionError};

fn make_rng(config: &AppConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let store = Arc::new(JsonFileStore::open(&config.store_path)?);
    info!(store = %store.path().display(), "opened draw store");

    let (mut ctx, restored) = SessionContext::open(store, config.input_ttl)?;

    let args: Vec<String> = std::env::args().collect();
    match Command::parse(&args) {
        // Check if we should run in web mode
        Command::Web { port } => {
            println!("Starting web server on port {}...", port);
            println!("Access the API at http://localhost:{}/api/session", port);
            if restored {
                println!(
                    "📂 Lists recovered from storage (valid for {} minute(s))",
                    config.input_ttl.num_minutes()
                );
            }

            let state = AppState::new(ctx, make_rng(&config));
            web::start_server(port, state).await?;
        }
        Command::Clear => {
            ctx.clear_all()?;
            println!("🗑️  All data cleared");
        }
        Command::Unknown(other) => {
            eprintln!("Unknown command '{}', expected web, clear or draw", other);
            std::process::exit(2);
        }
        // The CSV replaces any recovered lists
        Command::Draw { csv_path, mode } => {
            println!("Loading lists from {}...", csv_path.display());
            let lists = load_lists(&csv_path)?;
            ctx.replace_lists(lists)?;
            ctx.set_mode(mode);

            println!("\n=== Running Draw ({}) ===", mode.label());
            let mut rng = make_rng(&config);
            let report = match ctx.draw(&mut rng) {
                Ok(report) => report,
                Err(SessionError::Draw(DrawError::FatalInput(validation))) => {
                    eprintln!("❌ {}", validation.errors.join("; "));
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            };

            if !report.warnings.is_empty() {
                println!("⚠️  {}", report.warnings.join("; "));
            }
            print_report(report);

            write_report_to_file(report, "draw_result.txt")?;
            println!("Result saved to draw_result.txt");
        }
    }

    Ok(())
}
