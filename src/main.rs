use anyhow::{Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use fnac_mp::{
    Client,
    core::config::load_from_env,
    services::{messages::MessagesQuery, offers::OffersQuery, orders::OrdersQuery},
};

const USAGE: &str = "usage: fnac-mp <query_messages|query_orders|query_offers> [paging]";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(action) = args.next() else { bail!(USAGE) };
    let paging = match args.next() {
        Some(paging) => paging.parse()?,
        None => 1,
    };

    info!("loading configuration...");
    let cfg = load_from_env()?;
    let results_count = cfg.results_count;

    let mut client = Client::new(cfg);
    client.authenticate().await?;

    let response = match action.as_str() {
        "query_messages" => {
            client.query_messages(&MessagesQuery { paging, results_count }).await?
        }
        "query_orders" => {
            client.query_orders(&OrdersQuery { paging, results_count, ..Default::default() }).await?
        }
        "query_offers" => {
            client.query_offers(&OffersQuery { paging, results_count, ..Default::default() }).await?
        }
        other => bail!("unknown action '{other}'\n{USAGE}"),
    };

    info!(tag=%response.tag(), "received response");
    println!("{}", serde_json::to_string_pretty(response.dict())?);
    Ok(())
}

fn init_tracing() {
    // Default everything to warn; RUST_LOG overrides, e.g. RUST_LOG=fnac_mp=debug
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
