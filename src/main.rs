use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use assist_lib::assistant::{Assistant, HttpGenerator, HttpTranslator, HttpSpeech, WikipediaSummary};
use axum::Router;
use tracing_subscriber::{FmtSubscriber, EnvFilter};
use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::error::Context;

mod error;
mod path;
mod sql;
mod net;
mod template;
mod user;
mod sec;
mod state;
mod chat;
mod routing;
mod config;
mod jobs;

fn main() {
    use tokio::runtime::Builder;

    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .expect("failed to initialize global tracing subscriber");

    let rt = match Builder::new_multi_thread()
        .enable_io()
        .enable_time()
        .max_blocking_threads(4)
        .build() {
        Ok(rt) => rt,
        Err(err) => {
            panic!("failed to start tokio runtime. {}", err);
        }
    };

    tracing::event!(
        tracing::Level::INFO,
        "started tokio runtime"
    );

    if let Err(err) = rt.block_on(init()) {
        tracing::error!("{err}");
    }
}

fn build_assistant(settings: &config::Assistant) -> error::Result<Assistant> {
    let mut assistant = Assistant::builtin()
        .context("failed to create text analyzer")?;

    if let Some(translator) = &settings.translator {
        let http = HttpTranslator::new(
            &translator.endpoint,
            translator.token.clone(),
            Duration::from_secs(translator.timeout_secs),
        ).context("failed to create translation client")?;

        tracing::info!("using translator at {}", translator.endpoint);

        assistant = assistant.with_translator(Box::new(http));
    }

    if let Some(speech) = &settings.speech {
        let http = HttpSpeech::new(
            &speech.endpoint,
            speech.token.clone(),
            Duration::from_secs(speech.timeout_secs),
        ).context("failed to create speech client")?;

        tracing::info!("using speech synthesis at {}", speech.endpoint);

        assistant = assistant.with_speech(Box::new(http));
    }

    if let Some(information) = &settings.information {
        let source = WikipediaSummary::new(
            &information.endpoint,
            Duration::from_secs(information.timeout_secs),
        ).context("failed to create information client")?;

        tracing::info!("using topic summaries from {}", information.endpoint);

        assistant = assistant.with_information(Box::new(source));
    }

    let Some(generator) = &settings.generator else {
        tracing::info!("using local text generator");

        return Ok(assistant);
    };

    let http = HttpGenerator::new(
        &generator.endpoint,
        generator.token.clone(),
        Duration::from_secs(generator.timeout_secs),
        generator.max_length,
    ).context("failed to create text generator client")?;

    tracing::info!("using text generator at {}", generator.endpoint);

    Ok(assistant.with_generator(Box::new(http)))
}

/// binds and serves a single configured listener until the server stops
async fn serve(name: String, addr: SocketAddr, router: Router) {
    let tcp_listener = match std::net::TcpListener::bind(addr) {
        Ok(l) => l,
        Err(err) => {
            tracing::error!(listener = %name, "failed to bind to {addr}: {err}");

            return;
        }
    };

    match tcp_listener.local_addr() {
        Ok(local) => tracing::info!(listener = %name, "listening on {local}"),
        Err(err) => tracing::warn!(listener = %name, "failed to retrieve local address: {err}"),
    }

    let result = axum_server::from_tcp(tcp_listener)
        .serve(router.into_make_service())
        .await;

    if let Err(err) = result {
        tracing::error!(listener = %name, "server error: {err}");
    }
}

async fn init() -> error::Result<()> {
    let config = config::get_config()?;
    let assistant = build_assistant(&config.settings.assistant)?;
    let state = Arc::new(state::Shared::from_config(&config, assistant)?);

    state::db::setup(state.pool()).await?;

    let mut all_futs = FuturesUnordered::new();

    all_futs.extend(jobs::background(&state, &config.settings.data)?);

    let router = routing::routes(&state);

    for (name, listener) in &config.settings.listeners {
        all_futs.push(tokio::spawn(serve(name.clone(), listener.addr, router.clone())));
    }

    while all_futs.next().await.is_some() {}

    Ok(())
}
