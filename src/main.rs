use log::info;

mod domain;
mod entsoe;
mod fallback;
mod http;
mod normalize;
mod pipeline;
mod sanitize;
mod setup;
mod validate;
mod zones;

const APP_NAME: &str = "nordpulse";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting {}", APP_NAME);

    http::start_http_server().await.unwrap();

    info!("Shutting down {}", APP_NAME);
}
