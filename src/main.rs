use todo_list::config::AppConfig;
use todo_list::{server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, SESSION_SECRET etc. are picked up
    let _ = dotenvy::dotenv();
    telemetry::init(false);

    server::serve(AppConfig::from_env()).await
}
