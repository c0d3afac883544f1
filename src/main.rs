use anyhow::Result;
use clap::Parser;

use pair_sight::cli::{AnalyzeArgs, Cli, Commands};
use pair_sight::config::{Config, ConfigService};
use pair_sight::doctor;
use pair_sight::engine::recommend::RecommendOptions;
use pair_sight::error::classify_error;
use pair_sight::models::request::{Command, PairRequest};
use pair_sight::service::{AnalyzeParams, AppService};
use pair_sight::session;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let (code, message) = classify_error(&e);
        let error = serde_json::json!({
            "error": { "code": code, "message": message }
        });
        println!("{error}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn serialize_output(value: &impl serde::Serialize, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn print_output(value: &impl serde::Serialize, pretty: bool) -> Result<()> {
    let output = serialize_output(value, pretty)?;
    println!("{output}");
    Ok(())
}

fn analyze_params<'a>(args: &'a AnalyzeArgs, config: &'a Config) -> AnalyzeParams<'a> {
    AnalyzeParams {
        dir: &args.dir,
        window: args.window.as_deref().unwrap_or(&config.window),
        team: args.team.as_deref(),
        sections: &args.sections,
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<()> {
    let pretty = cli.pretty;

    let config = ConfigService::load(cli.config.as_deref())?;

    if cli.debug || config.debug {
        pair_sight::logger::init(&config)?;
    }

    match cli.command {
        Commands::Matrix { args } => {
            let service = AppService::new();
            let report = service.pair_matrix(&analyze_params(&args, &config))?;
            print_output(&report, pretty)
        }
        Commands::Recommend {
            args,
            strategy,
            matching,
            max_developers,
        } => {
            let service = AppService::new();
            let options = RecommendOptions::new(strategy.unwrap_or(config.strategy))
                .with_matching(matching.unwrap_or(config.matching))
                .with_max_developers(max_developers.unwrap_or(config.max_developers));
            let report = service.recommend(&analyze_params(&args, &config), &options)?;
            print_output(&report, pretty)
        }
        Commands::Doctor => print_output(&doctor::run_doctor(), pretty),
        Commands::Session => cmd_session(config),
        Commands::Mcp => cmd_mcp(config),
        Commands::Init { path } => {
            let config_path = match path {
                Some(p) => {
                    ConfigService::generate_at(&p)?;
                    p
                }
                None => {
                    ConfigService::generate_default()?;
                    ConfigService::default_path()
                }
            };
            eprintln!("Configuration file created at: {}", config_path.display());
            Ok(())
        }
    }
}

fn cmd_session(config: Config) -> Result<()> {
    let service = AppService::from_env();
    session::run_session(|req| handle_request(&service, &config, req))
}

fn cmd_mcp(config: Config) -> Result<()> {
    use rmcp::ServiceExt;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let server = pair_sight::mcp::PairSightServer::new(config);
        let transport = rmcp::transport::io::stdio();
        let service = server
            .serve(transport)
            .await
            .map_err(|e| anyhow::anyhow!("MCP server initialization failed: {e}"))?;
        service
            .waiting()
            .await
            .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Session handler
// ---------------------------------------------------------------------------

fn handle_request(
    service: &AppService,
    config: &Config,
    req: PairRequest,
) -> Result<serde_json::Value> {
    let params = AnalyzeParams {
        dir: req.dir.as_deref().unwrap_or("."),
        window: req.window.as_deref().unwrap_or(&config.window),
        team: req.team.as_deref(),
        sections: &req.sections,
    };

    match req.command {
        Command::Matrix => Ok(serde_json::to_value(service.pair_matrix(&params)?)?),
        Command::Recommend => {
            let options = RecommendOptions::new(req.strategy.unwrap_or(config.strategy))
                .with_matching(req.matching.unwrap_or(config.matching))
                .with_max_developers(req.max_developers.unwrap_or(config.max_developers));
            Ok(serde_json::to_value(service.recommend(&params, &options)?)?)
        }
        Command::Doctor => Ok(serde_json::to_value(doctor::run_doctor())?),
    }
}
