use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;

use fitbite_ml::server::{router, AppContext};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON label file
    #[arg(long, default_value = "model/labels.json")]
    labels: PathBuf,

    /// Path to the nutrition CSV file
    #[arg(long, default_value = "data/nutrition_data.csv")]
    nutrition: PathBuf,

    /// Path to the safetensors model weights file
    #[arg(long, default_value = "model/food_model.safetensors")]
    weights: PathBuf,

    /// Address to serve on
    #[arg(long, default_value = "0.0.0.0:8000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting FitBite ML Server ===");

    // All resources load exactly once, before the listener accepts
    // anything. Missing files degrade to defaults and are logged inside.
    let ctx = Arc::new(AppContext::load(&args.labels, &args.nutrition, &args.weights));

    let app = router(ctx);
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
