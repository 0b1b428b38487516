use std::sync::Arc;

use ferry::config::Config;
use ferry::http::handler::Handler;
use ferry::http::request::Request;
use ferry::http::response::Response;
use ferry::server;

fn greet(request: &Request, _response: &mut Response) -> anyhow::Result<String> {
    Ok(format!(
        "<html><body><h1>Hello from ferry</h1><p>{} {}</p></body></html>",
        request.method.as_str(),
        request.path_only()
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.logging.max_level()?)
        .init();

    let handler: Arc<dyn Handler> = Arc::new(greet);

    tokio::select! {
        res = server::listener::run(&cfg.server, Some(handler)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
