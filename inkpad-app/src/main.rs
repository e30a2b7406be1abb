//! # Inkpad
//!
//! Headless host: replays a stroke script, exports the drawing, and
//! optionally runs it through the recognition service.

use clap::Parser;
use inkpad_app::{CliArgs, Script, Session, SessionConfig};
use inkpad_client::HttpRecognitionClient;
use inkpad_core::{Candidate, ConnectionStatus};
use inkpad_renderer::ExportFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpad=info,inkpad_app=info,inkpad_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let script = Script::load(&args.script)?;
    let format = if args.jpeg {
        ExportFormat::Jpeg
    } else {
        ExportFormat::Png
    };
    let recognize = args.recognize;
    let select = args.select;
    let correct = args.correct.clone();
    let config = SessionConfig::from(args);

    tracing::info!(api_url = %config.api_url, "Starting Inkpad");

    let client = HttpRecognitionClient::new(&config.api_url)?;
    let mut session = Session::new(config, client)?;

    script.replay(&mut session);
    let path = session.export_to_dir(format)?;
    println!("exported {}", path.display());

    if !recognize {
        return Ok(());
    }

    if session.probe_connection().await != ConnectionStatus::Connected {
        tracing::warn!("Recognition service is not reachable");
    }

    if let Err(e) = session.submit().await {
        anyhow::bail!(session.state().notice().map_or_else(|| e.to_string(), str::to_string));
    }

    if let Some(result) = session.state().result() {
        println!("recognized: {:?}", result.raw_text);
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            println!("  [{i}] {suggestion}");
        }
        if let Some(confidence) = result.confidence {
            println!("confidence: {confidence}");
        }
    }

    if let Some(index) = select {
        session.select_candidate(Candidate::Suggestion(index))?;
    }

    if let Some(text) = correct {
        session.open_correction()?;
        session.edit_correction(text)?;
        session.submit_correction().await?;
        println!("correction stored");
    }

    println!("selected: {}", session.state().selection().selected_text);
    Ok(())
}
