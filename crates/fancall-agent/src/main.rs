//! Fancall agent worker binary.
//!
//! Joins one LiveKit room as the companion agent, runs the dispatched
//! session, and cancels it on SIGTERM/SIGINT.

use fancall_agent::{load_config, DeploymentEnv, Dispatcher, JobContext};
use fancall_voice::LiveKitRoom;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_ROOM: &str = "fancall";

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("FANCALL_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() -> ExitCode {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("fancall.toml"));

    let config = match load_config(selected_config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let env = DeploymentEnv::from_env();
    let livekit = match env.livekit_config() {
        Ok(livekit) => livekit.unwrap_or_default(),
        Err(e) => {
            tracing::error!(error = %e, "invalid LiveKit settings");
            return ExitCode::FAILURE;
        }
    };

    let dispatcher = match Dispatcher::from_config(&config, env) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            tracing::error!(error = %e, "failed to build image acquirer");
            return ExitCode::FAILURE;
        }
    };

    let room_name = std::env::var("FANCALL_ROOM")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ROOM.to_string());
    let identity = format!("agent-{}", uuid::Uuid::new_v4());
    let room = LiveKitRoom::new(livekit, room_name, identity, config.agent.name.clone());

    let metadata = std::env::var("FANCALL_JOB_METADATA").ok();
    let ctx = JobContext::new(room, metadata);
    let cancel = ctx.cancellation_token();

    tracing::info!(agent = %config.agent.name, "starting fancall agent");

    let session = dispatcher.dispatch(ctx);
    tokio::pin!(session);

    let finished = tokio::select! {
        outcome = &mut session => Some(outcome),
        () = shutdown_signal() => None,
    };
    let outcome = match finished {
        Some(outcome) => outcome,
        None => {
            cancel.cancel();
            session.await
        }
    };

    tracing::info!(
        reason = outcome.reason.as_str(),
        "fancall agent finished"
    );

    if outcome.is_fault() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, cancelling session"); }
        () = terminate => { tracing::info!("received SIGTERM, cancelling session"); }
    }
}
