use log::info;
use std::net::SocketAddr;
use vowcard_media_service::config::MediaConfig;
use vowcard_media_service::routes::create_router;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Logging initialized with env_logger");
    info!("Starting Media Upload Proxy");

    let config = MediaConfig::from_env();
    info!("Loaded configuration: {:?}", config);
    let port = config.port;
    let app = create_router(config);

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running as Lambda function");
        lambda_http::run(app).await
    } else {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        info!("Listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}
