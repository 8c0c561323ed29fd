use std::path::PathBuf;

use clap::Parser;

use health_predict_server::{artifact::ModelArtifacts, router, AppState};

#[derive(Parser, Debug)]
#[command(name = "health-predict-server", about = "Health risk prediction HTTP server")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Directory holding the serialized model artifacts.
    #[arg(long, default_value = "models")]
    artifact_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let artifacts = match ModelArtifacts::load(&args.artifact_dir) {
        Ok(artifacts) => artifacts,
        Err(err) => {
            tracing::error!(dir = %args.artifact_dir.display(), "artifact load failed: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        features = artifacts.feature_names.len(),
        preprocessor = artifacts.preprocessor.is_some(),
        "model artifacts loaded"
    );

    let state = AppState::new(artifacts);
    let app = router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Health prediction server starting on http://{addr}");
    tracing::info!("Available endpoints:");
    tracing::info!("  - GET  /health            - Health check");
    tracing::info!("  - GET  /                  - Input form");
    tracing::info!("  - POST /predict           - Single-record form prediction");
    tracing::info!("  - POST /predict/csv       - CSV batch prediction (HTML table)");
    tracing::info!("  - GET  /v1/schema         - Versioned feature schema");
    tracing::info!("  - POST /v1/predict        - Single-record JSON prediction");
    tracing::info!("  - POST /v1/predict/batch  - CSV batch prediction (JSON)");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
