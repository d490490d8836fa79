use actix_web::{web, App, HttpServer};
use clap::Parser;
use reqwest::Client;
use std::io::{Error, ErrorKind, Write};
use std::time::Duration;

use prediction_client::cli::{Cli, Commands, ConsoleSurface, PredictArgs};
use prediction_client::req_handler::handle_req;
use prediction_client::{AppCfg, HttpTransport, PredictionClient, RelayCfg};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // a missing .env is fine, flags and the process environment still apply
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    match cli.command {
        Commands::Predict(args) => predict(args).await,
        Commands::Relay(args) => relay(args.into()).await,
    }
}

async fn predict(args: PredictArgs) -> std::io::Result<()> {
    let cfg = AppCfg::from(&args);
    log::info!("Submitting {} input to {}", cfg.variant, cfg.api_url);

    let mut surface = ConsoleSurface::new(args.input)?;
    let client = PredictionClient::new(cfg, HttpTransport::new(Client::default()));
    let res = client.on_activate(&mut surface).await;

    if let Some(html) = surface.output() {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{html}")?;
    }
    res.map_err(|e| Error::new(ErrorKind::Other, e))
}

async fn relay(relay_cfg: RelayCfg) -> std::io::Result<()> {
    log::info!(
        "Relaying {} requests on {} to {}",
        relay_cfg.variant,
        relay_cfg.bind_addr,
        relay_cfg.upstream_url
    );
    let bind_addr = relay_cfg.bind_addr.clone();
    let workers = relay_cfg.workers;

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Client::default()))
            .service(
                web::resource("/")
                    .app_data(web::Data::new(relay_cfg.clone()))
                    .route(web::post().to(handle_req)),
            )
    })
    .workers(workers)
    .keep_alive(Duration::from_secs(0))
    .bind(bind_addr)?
    .run()
    .await
}
