//! Terminal front end for the playback controller.
//!
//! Reads one command per line from stdin and talks to the synthesis server
//! at `TTS_SERVER_URL`. Audio is not rendered; the headless element only
//! keeps time.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use player_core::{
    AudioElement, HeadlessElementFactory, HttpSynthesisClient, PlayAction, PlaybackController,
    PlaybackEvent,
};
use tts_core::Voice;

type Controller = PlaybackController<HttpSynthesisClient, HeadlessElementFactory>;

const HELP: &str = "commands: text <words> | play | stop | skip <secs> | speed <0.5-2.0> | \
volume <0-1> | voice <id> | confirm | status | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let _ = dotenv::dotenv();

    let base = std::env::var("TTS_SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".into());
    let client = HttpSynthesisClient::new(&base).with_context(|| format!("Invalid TTS_SERVER_URL {base}"))?;
    let factory = HeadlessElementFactory {
        duration: std::env::var("TTS_PLAYER_CLIP_SECS")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(Duration::from_secs_f64),
    };
    let mut controller = PlaybackController::new(Arc::new(client), factory);
    info!("Using synthesis server at {base}");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(200));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&mut controller, line.trim()) {
                    break;
                }
            }
            _ = ticker.tick() => {
                if controller.poll_synthesis() {
                    print_status(&controller);
                }
                if controller.element().is_some_and(|e| e.has_ended()) {
                    controller.handle_event(PlaybackEvent::Ended);
                    println!("finished");
                }
            }
        }
    }

    controller.stop();
    Ok(())
}

/// Returns false when the user asked to quit
fn run_command(controller: &mut Controller, line: &str) -> bool {
    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
    let arg = arg.trim();

    match cmd {
        "" => {}
        "quit" | "exit" => return false,
        "text" => controller.set_text(arg),
        "play" | "pause" => match controller.toggle_play_pause() {
            PlayAction::ConfirmationRequired(estimate) => {
                println!("estimated {estimate} tokens, type 'confirm' to continue")
            }
            PlayAction::Ignored if controller.text().is_empty() => println!("no text set"),
            PlayAction::ResumeFailed => println!(
                "could not resume: {}",
                controller.session().last_error.as_deref().unwrap_or("unknown error")
            ),
            action => println!("{action:?}"),
        },
        "confirm" => println!("{:?}", controller.confirm_synthesis()),
        "stop" => controller.stop(),
        "skip" => match arg.parse::<f64>() {
            Ok(delta) => controller.skip(delta),
            Err(_) => println!("skip needs a number of seconds"),
        },
        "speed" => match arg.parse::<f32>() {
            Ok(v) => controller.set_speed(v),
            Err(_) => println!("speed needs a number"),
        },
        "volume" => match arg.parse::<f32>() {
            Ok(v) => controller.set_volume(v),
            Err(_) => println!("volume needs a number"),
        },
        "voice" => match arg.parse::<Voice>() {
            Ok(v) => controller.set_voice(v),
            Err(e) => println!("{e}"),
        },
        "status" => print_status(controller),
        _ => println!("{HELP}"),
    }
    true
}

fn print_status(controller: &Controller) {
    let s = controller.session();
    let position = controller.element().map(|e| e.position());
    println!(
        "playing={} loading={} voice={} speed={:.1}x volume={:.1} tokens={} position={} source={} error={}",
        s.is_playing,
        s.is_loading,
        s.voice,
        s.speed,
        s.volume,
        s.token_estimate,
        position.map_or("-".to_string(), |p| format!("{p:.1}s")),
        s.source_url.as_deref().unwrap_or("-"),
        s.last_error.as_deref().unwrap_or("-"),
    );
}
