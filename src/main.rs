use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use page_analyzer::{api, load_config, AnalyzeOptions, AnalyzerConfig, PageAnalyzer};

#[derive(Parser)]
#[command(name = "page-analyzer", version, about = "Classify a web page and map its layout")]
struct Cli {
    /// TOML file with fetch and server settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the analysis API over HTTP
    Serve {
        #[arg(long, env = "HOST")]
        host: Option<String>,
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Analyse a URL or literal HTML and print the result as JSON
    Analyze {
        /// URL (http:// or https://), literal HTML, or `-` to read HTML from stdin
        input: String,
        /// Render the page in a headless browser first
        #[arg(long)]
        dynamic: bool,
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalyzerConfig::default(),
    };

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Analyze {
            input,
            dynamic,
            compact,
        } => {
            let input = if input == "-" {
                let mut html = String::new();
                std::io::stdin()
                    .read_to_string(&mut html)
                    .context("Failed to read HTML from stdin")?;
                html
            } else {
                input
            };

            let analyzer = PageAnalyzer::new(&config);
            let result = analyzer.analyze(&input, AnalyzeOptions { dynamic }).await;

            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{}", json);
            Ok(())
        }
    }
}

async fn serve(config: AnalyzerConfig) -> Result<()> {
    let analyzer = web::Data::new(PageAnalyzer::new(&config));
    let host = config.server.host.clone();
    let port = config.server.port;

    log::info!("🚀 Starting page analyzer");
    log::info!("🌐 Server running at http://{}:{}", host, port);
    log::info!("📖 API endpoint: http://{}:{}/api/analyze?url=<your-url>", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(analyzer.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(cors)
            .configure(api::configure)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {}:{}", host, port))?
    .run()
    .await?;

    Ok(())
}
