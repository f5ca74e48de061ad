use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use nour_al_qalb::catalog::Catalog;
use nour_al_qalb::cli::{Args, Command};
use nour_al_qalb::config::Config;
use nour_al_qalb::pipeline::Pipeline;
use nour_al_qalb::provider::{make_provider, resolve_credential};
use nour_al_qalb::server::{run_server, AppState};
use nour_al_qalb::transcript::TranscriptSink;
use nour_al_qalb::ux;

fn init_logging(debug: bool) {
    let level = if debug { "nour_al_qalb=debug,info" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let cfg = Config::resolve(&args)?;
    let credential = resolve_credential(cfg.provider, args.api_key.clone(), |k| std::env::var(k).ok());
    if credential.is_none() {
        log::warn!(
            "no API key found ({}); completion calls will fail until one is configured",
            cfg.provider.api_key_env()
        );
    }

    let provider = make_provider(&cfg, credential)?;
    let catalog = Arc::new(Catalog::load()?);
    let mut pipeline = Pipeline::new(provider, cfg.pipeline_settings()).with_catalog(catalog.clone());
    if let Some(dir) = &cfg.transcripts_dir {
        log::info!("writing transcripts to {dir}");
        pipeline = pipeline.with_transcripts(TranscriptSink::new(dir));
    }

    match args.command.clone().unwrap_or(Command::Serve {
        port: None,
        bind: None,
        cors_origins: vec![],
    }) {
        Command::Serve { .. } => {
            let state = AppState::new(Arc::new(pipeline), catalog);
            run_server(&cfg, state).await?;
        }
        Command::Generate { intention } => {
            let pb = ux::spinner("Génération de la dua...");
            let result = pipeline.generate_invocation(&intention).await;
            pb.finish_and_clear();
            let dua = result.context("generation failed")?;
            ux::show_invocation(&dua);
        }
        Command::Ask { question } => {
            let pb = ux::spinner("Recherche d'une réponse...");
            let result = pipeline.answer(&question).await;
            pb.finish_and_clear();
            let answer = result.context("answer failed")?;
            ux::show_answer(&answer);
        }
        Command::Diagnose => {
            let pb = ux::spinner("Test du service de complétion...");
            let result = pipeline.diagnose().await;
            pb.finish_and_clear();
            ux::show_diagnostic(pipeline.provider_name(), &result);
            result.context("diagnostic failed")?;
        }
    }

    Ok(())
}
