mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use resend_core::impls::{
    HttpSenderFactory, InMemoryHost, RecordingSenderFactory, ResolvingSenderFactory, SentBatch,
};
use resend_core::ports::SenderFactory;
use resend_core::{ReplayReport, ResendApp, ResendAppBuilder};
use serde::Serialize;

use crate::cli::{Args, Command};

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "resend_core=info,resend=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Replay report, plus the batches a dry run would have sent.
#[derive(Debug, Serialize)]
struct ReplayOutput {
    #[serde(flatten)]
    report: ReplayReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    would_send: Option<Vec<SentBatch>>,
}

async fn replay(app: &ResendApp, dry_run: Option<&RecordingSenderFactory>) -> ReplayOutput {
    app.registry.refresh().await;
    let report = app.engine.replay_all().await;
    let would_send = match dry_run {
        Some(recorder) => Some(recorder.sent().await),
        None => None,
    };
    ReplayOutput { report, would_send }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let host = Arc::new(
        InMemoryHost::from_json_file(&args.fleet_file)
            .with_context(|| format!("failed to load {}", args.fleet_file.display()))?,
    );
    tracing::info!(fleet_file = %args.fleet_file.display(), "fleet state loaded");

    let recorder = matches!(args.command, Command::Replay { dry_run: true })
        .then(RecordingSenderFactory::new);
    let senders: Arc<dyn SenderFactory> = match &recorder {
        Some(recorder) => Arc::new(recorder.clone()),
        None => Arc::new(ResolvingSenderFactory::new(
            HttpSenderFactory::new(),
            Arc::clone(&host),
        )),
    };

    let app = ResendAppBuilder::new()
        .host(Arc::clone(&host))
        .sender_factory(senders)
        .build()?;

    match args.command {
        Command::Status => {
            app.registry.refresh().await;
            print_json(&app.registry.status().await)?;
        }
        Command::Modules { all_versions: false } => {
            print_json(&app.registry.pending_modules().await)?;
        }
        Command::Modules { all_versions: true } => {
            print_json(&app.registry.pending_module_versions().await)?;
        }
        Command::Replay { dry_run } => {
            print_json(&replay(&app, recorder.as_ref()).await)?;
            if !dry_run {
                host.write_json_file(&args.fleet_file)
                    .await
                    .with_context(|| format!("failed to write {}", args.fleet_file.display()))?;
            }
        }
    }

    Ok(())
}
