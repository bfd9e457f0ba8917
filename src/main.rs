use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vesper::artifact::ArtifactStore;
use vesper::audio::{self, CaptureSpec, CpalRecorder, Recorder};
use vesper::llm::GeminiClient;
use vesper::stt::{self, WhisperTranscriber};
use vesper::tts::{LocalSpeaker, Speaker};
use vesper::wake::ConsoleTrigger;
use vesper::{Assistant, Config};

/// Vesper - Hands-free voice assistant for the terminal
#[derive(Parser)]
#[command(name = "vesper", version, about)]
struct Cli {
    /// Input audio device index; omit for the platform default
    #[arg(short, long, env = "VESPER_DEVICE")]
    device: Option<usize>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List available input devices
    Devices,
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Speak a line through the synthesis engine
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the speech engine.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,vesper=info",
        1 => "info,vesper=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    // Handle subcommands
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Devices => list_devices(),
            Command::TestMic { duration } => test_mic(cli.device, duration).await,
            Command::Say { text } => say(&text).await,
        };
    }

    // Missing credential fails here, before any audio hardware is touched.
    let config = Config::load(cli.device)?;
    tracing::debug!(
        wake_word = %config.wake_word,
        device = ?config.device,
        record_secs = config.record_secs,
        stt_model = %config.whisper_model,
        llm_model = %config.gemini_model,
        "loaded configuration"
    );

    // Resolve and load the transcription model once, before the loop.
    let model_path = stt::resolve_model(
        &config.whisper_model,
        &config.whisper_model_url,
        &config.model_cache_dir,
    )
    .await?;
    let transcriber = WhisperTranscriber::load(&model_path)?;

    let model = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    let speaker = LocalSpeaker::new(config.speech_command.clone(), config.speech_args.clone());
    let trigger = ConsoleTrigger::new(&config.wake_word);
    let store = ArtifactStore::new()?;

    let capture = CaptureSpec {
        device: config.device,
        sample_rate: config.sample_rate,
        channels: audio::CHANNELS,
        duration: Duration::from_secs(config.record_secs),
    };

    println!("------------------------------------------------------------");
    println!(
        "Vesper is listening. Type the wake word \"{}\". Ctrl+C to exit.",
        config.wake_word
    );
    println!("------------------------------------------------------------");

    let mut assistant = Assistant::new(
        store,
        Box::new(trigger),
        Box::new(CpalRecorder::new()),
        Box::new(transcriber),
        Box::new(model),
        Box::new(speaker),
        capture,
    );

    // Returns cleanly (exit code 0) on interrupt during the wake wait.
    assistant.run().await?;

    Ok(())
}

/// List available input devices
fn list_devices() -> anyhow::Result<()> {
    let names = audio::input_device_names()?;

    if names.is_empty() {
        println!("No input devices found");
        return Ok(());
    }

    for (index, name) in names.iter().enumerate() {
        println!("{index}: {name}");
    }

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(device: Option<usize>, duration: u64) -> anyhow::Result<()> {
    println!("Recording for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let spec = CaptureSpec {
        device,
        sample_rate: audio::SAMPLE_RATE,
        channels: audio::CHANNELS,
        duration: Duration::from_secs(duration),
    };

    let samples = CpalRecorder::new().record(&spec).await?;

    let energy = calculate_rms(&samples);
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);

    println!("Captured {} frames at {} Hz", samples.len(), spec.sample_rate);
    println!("RMS: {energy:.1} | Peak: {peak}");
    println!("\n---");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: vesper devices (to list devices)");
    println!("  3. Try another device with --device <index>");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_squares / samples.len() as f64).sqrt()
}

/// Speak a line through the configured synthesis engine
async fn say(text: &str) -> anyhow::Result<()> {
    let config = Config::load_lenient(None);
    let speaker = LocalSpeaker::new(config.speech_command, config.speech_args);

    println!("Speaking: \"{text}\"");
    speaker.speak(text).await?;

    println!("\n---");
    println!("If you heard the speech, the engine is working!");
    Ok(())
}
