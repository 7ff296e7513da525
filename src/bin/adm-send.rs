use std::path::Path;

use adm_client::config::loader::file_to_config;
use adm_client::observability::metrics;
use adm_client::utils::logging;
use adm_client::utils::logging::LogLevel;
use adm_client::{Adm, DeliveryOutcome};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about = "Send one message to a device through Amazon Device Messaging", long_about = None)]
struct Args {
    #[arg(short, long, env = "ADM_CONFIG", default_value = "adm.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// registration id of the target app instance
    #[arg(short, long)]
    device_id: String,
    #[arg(long)]
    consolidation_key: Option<String>,
    #[arg(long)]
    expires_after: Option<u64>,
    #[arg(long)]
    md5: Option<String>,
    /// custom data field, repeatable
    #[arg(long = "data", value_name = "KEY=VALUE", value_parser = parse_data_field)]
    data: Vec<(String, String)>,
    /// print metrics in the Prometheus text format after sending
    #[arg(long)]
    print_metrics: bool,
}

fn parse_data_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = file_to_config(Path::new(&args.config))
        .await
        .context("Invalid config format")?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build payload
    // -------------------------------

    let mut payload = Adm::new_payload().data_fields(args.data);
    if let Some(key) = args.consolidation_key {
        payload = payload.consolidation_key(key);
    }
    if let Some(seconds) = args.expires_after {
        payload = payload.expires_after(seconds);
    }
    if let Some(md5) = args.md5 {
        payload = payload.md5(md5);
    }

    // -------------------------------
    // 3. Deliver
    // -------------------------------

    let dispatcher = Adm::service_with_settings(&service_config.settings.adm)?;
    info!(device_id = %args.device_id, "delivering message");
    let result = dispatcher
        .deliver(&args.device_id, &service_config.credentials, &payload.build())
        .await;

    let outcome = match &result {
        Ok(outcome) => Some(outcome.clone()),
        Err(err) => {
            error!(error = %err, status = ?err.status(), "delivery failed");
            err.outcome()
        }
    };
    if let Some(outcome) = outcome {
        println!("{}", serde_json::to_string(&outcome)?);
    }

    // -------------------------------
    // 4. Metrics
    // -------------------------------

    if args.print_metrics {
        print!("{}", metrics::render().await);
    }

    match result {
        Ok(DeliveryOutcome::Delivered { canonical_device_id }) if canonical_device_id != args.device_id => {
            info!(canonical_device_id = %canonical_device_id, "update stored registration id");
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(err) => Err(anyhow!(err)),
    }
}
