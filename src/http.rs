use axum::{
    extract::{Query, State},
    routing::get,
    serve, Json, Router,
};
use axum_macros::debug_handler;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crate::domain::DayAhead;
use crate::pipeline::assemble_day_ahead;
use crate::setup::{setup_app_state, AppState};
use crate::zones::DEFAULT_COUNTRIES;

/// The main entry point for the http app.
/// It creates the state that is passed to endpoints
pub(crate) async fn start_http_server() -> Result<(), std::io::Error> {
    let router = Router::new()
        .route("/api/dayahead", get(get_day_ahead))
        .with_state(setup_app_state());

    let port = std::env::var("PORT").unwrap_or("8080".to_string());
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();

    info!("now listening on port {}", port);

    serve(listener, router).await
}

#[derive(Debug, Clone, Deserialize)]
struct DayAheadParameters {
    countries: String,
}

impl DayAheadParameters {
    fn get_countries(&self) -> Vec<String> {
        self.countries
            .split(',')
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect()
    }
}

impl Default for DayAheadParameters {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.to_string(),
        }
    }
}

/// Serve the aggregated day-ahead document for the requested countries.
/// Always 200: upstream failures degrade to demo data and validation
/// failures ride along as advisory issues, so the dashboard can render
/// whatever is available.
#[debug_handler(state = AppState)]
#[instrument(skip(state))]
async fn get_day_ahead(
    State(state): State<AppState>,
    parameters: Option<Query<DayAheadParameters>>,
) -> (StatusCode, Json<DayAhead>) {
    let countries = parameters.unwrap_or_default().0.get_countries();

    let day_ahead = assemble_day_ahead(&*state.provider, &countries).await;

    if !day_ahead.ok {
        warn!("data checks: {}", day_ahead.issues.join(" • "));
    }

    (StatusCode::OK, Json(day_ahead))
}
