//! tomoyo demo server
//!
//! Serves a small example application over HTTP.

use clap::Parser;
use serde_json::json;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use tomoyo::server::{DEFAULT_HOST, DEFAULT_PORT};
use tomoyo::{App, PathParams, Request, Scope, Server, get, post};

/// Minimal HTTP router demo.
#[derive(Parser)]
#[command(name = "tomoyo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host to bind.
    #[arg(long, env = "TOMOYO_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind.
    #[arg(short, long, env = "TOMOYO_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn hello(_req: Request, _params: PathParams) -> &'static str {
    "Hello, World!"
}

fn search(req: Request, _params: PathParams) -> serde_json::Value {
    json!({
        "q": req.body.get("q"),
        "tags": req.body.get_all("tag"),
    })
}

fn user(_req: Request, params: PathParams) -> serde_json::Value {
    json!({"id": params.get("id")})
}

fn login(req: Request, _params: PathParams) -> String {
    match req.body.get("user") {
        Some(user) => format!("welcome, {user}"),
        None => "who are you?".to_string(),
    }
}

fn build_app() -> tomoyo::Result<App> {
    let v1 = Scope::new("/v1")
        .service(get(r"/users/(?P<id>\d+)", user))?
        .service(get("/search", search))?;

    App::new()
        .service(Scope::new("/api").service(v1)?)?
        .service(post("/login", login))?
        .service(get("/$", hello))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = build_app()?;
    info!("Routes: {}", app.resource_paths()?.join(", "));

    Server::new(app).bind(cli.host, cli.port).run().await?;

    Ok(())
}
