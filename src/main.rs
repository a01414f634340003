use port_monitor::app;

#[tokio::main]
async fn main() {
    // .env is optional; real deployments configure via environment.
    let _ = dotenvy::dotenv();

    if let Err(err) = app::run().await {
        eprintln!("port-monitor failed to start: {}", err);
        std::process::exit(1);
    }
}
