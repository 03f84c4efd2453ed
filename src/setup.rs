use std::process;
use std::sync::Arc;

use log::debug;
use tracing::error;

use crate::domain::DayAheadProvider;
use crate::entsoe::Entsoe;
use crate::fallback::OfflineProvider;

/// Setup the app state that is given to every route handler.
/// Holds the resolved day-ahead provider; series themselves live only for
/// one request, so there is nothing else to share.
pub(crate) fn setup_app_state() -> AppState {
    let provider_dsn = std::env::var("PRICE_PROVIDER_DSN")
        .expect("PRICE_PROVIDER_DSN is missing, you need to configure it");

    AppState::new(resolve_provider(provider_dsn.as_str()))
}

/// Build a `DayAheadProvider` instance from the configured DSN, e.g.
/// `entsoe://{token}@transparency.entsoe.eu` or `demo://local`.
fn resolve_provider(provider_dsn: &str) -> Arc<dyn DayAheadProvider> {
    let dsn = dsn::parse(provider_dsn).unwrap_or_else(|e| {
        error!("unable to parse PRICE_PROVIDER_DSN, {}", e);
        process::exit(1);
    });

    debug!("trying to resolve provider \"{}\"", dsn.driver);
    match dsn.driver.as_str() {
        "entsoe" => Arc::new(Entsoe::new(dsn.username.expect(
            "cannot create an entsoe instance from the provided dsn, the token is missing",
        ))),
        "demo" => Arc::new(OfflineProvider),
        _ => panic!("the provided PRICE_PROVIDER_DSN does not match any supported provider"),
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) provider: Arc<dyn DayAheadProvider>,
}

impl AppState {
    fn new(provider: Arc<dyn DayAheadProvider>) -> Self {
        Self { provider }
    }
}
