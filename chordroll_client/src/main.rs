// Chordroll CLI entry point.
//
// Uploads an audio file to the chord-detection service and prints the
// resulting piano roll. A saved service response can be rendered offline
// with `--events`, skipping the upload.
//
// Usage:
//   chordroll <AUDIO_FILE> [OPTIONS]
//   chordroll --events <RESPONSE.json> [OPTIONS]
//     --config <PATH>       JSON config file (see config.rs)
//     --endpoint <URL>      Detection endpoint (default: http://localhost:8000/detect-chords)
//     --events <PATH>       Render a saved {"chords": [...]} response instead of uploading
//                           (not together with an audio file)
//     --midi <PATH>         Also write the roll as a MIDI file
//     --json                Print the grid as JSON instead of text
//     --timeline            Print the per-column chord listing under the roll

use std::path::PathBuf;

use chordroll_client::config::ClientConfig;
use chordroll_client::error::ClientError;
use chordroll_client::logging::init_logging;
use chordroll_client::session::{Session, SessionState};
use chordroll_client::upload::{AudioUploadClient, to_events};
use chordroll_music::midi::write_midi;
use chordroll_music::render::{chord_timeline, render_roll};
use chordroll_protocol::decode_response;
use tracing::info;

#[derive(Debug, Default)]
struct CliArgs {
    audio: Option<PathBuf>,
    config: Option<PathBuf>,
    endpoint: Option<String>,
    events: Option<PathBuf>,
    midi: Option<PathBuf>,
    json: bool,
    timeline: bool,
}

fn main() {
    let args = parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), ClientError> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env();
    config.apply_overrides(args.endpoint.clone(), None);
    config.validate()?;

    init_logging(&config.log_level);

    let mut session = Session::new();
    if let Some(path) = &args.events {
        let body = std::fs::read(path)?;
        let response = decode_response(&body)?;
        info!(file = %path.display(), frames = response.chords.len(), "loaded saved response");
        session.set_events(to_events(response.chords));
    } else {
        if let Some(audio) = &args.audio {
            session.select_file(audio.clone());
        }
        let client = AudioUploadClient::from_config(&config)?;
        let detected = session.detect(&client).map(|_| ());
        if let Err(e) = detected {
            if let SessionState::Failed(message) = session.state() {
                eprintln!("{message}");
            }
            return Err(e);
        }
    }

    let grid = session.grid();
    if args.json {
        println!("{}", serde_json::to_string_pretty(grid)?);
    } else if session.has_roll() {
        print!("{}", render_roll(grid, &config.render));
        if args.timeline {
            println!();
            print!("{}", chord_timeline(grid));
        }
    } else {
        println!("No chords detected.");
    }

    if let Some(path) = &args.midi {
        write_midi(grid, &config.midi, path)?;
        info!(file = %path.display(), columns = grid.num_columns(), "wrote MIDI");
    }

    Ok(())
}

/// What the command line asked for.
#[derive(Debug)]
enum Command {
    Run(CliArgs),
    Help,
}

/// Parse command-line arguments, exiting with usage on error. Uses simple
/// `std::env::args()` matching, no clap dependency.
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_arg_list(&args) {
        Ok(Command::Run(cli)) => cli,
        Ok(Command::Help) => {
            print_usage();
            std::process::exit(0);
        }
        Err(msg) => {
            eprintln!("{msg}");
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Parse the arguments after the program name.
fn parse_arg_list(args: &[String]) -> Result<Command, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => cli.config = Some(required_value(&mut iter, "--config")?.into()),
            "--endpoint" => cli.endpoint = Some(required_value(&mut iter, "--endpoint")?),
            "--events" => cli.events = Some(required_value(&mut iter, "--events")?.into()),
            "--midi" => cli.midi = Some(required_value(&mut iter, "--midi")?.into()),
            "--json" => cli.json = true,
            "--timeline" => cli.timeline = true,
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with("--") => {
                return Err(format!("Unknown argument: {other}"));
            }
            other => {
                if cli.audio.is_some() {
                    return Err(format!("Only one audio file can be given (extra: {other})"));
                }
                cli.audio = Some(PathBuf::from(other));
            }
        }
    }

    if let (Some(audio), Some(events)) = (&cli.audio, &cli.events) {
        return Err(format!(
            "--events {} renders a saved response; it cannot be combined with audio file {}",
            events.display(),
            audio.display()
        ));
    }

    Ok(Command::Run(cli))
}

fn required_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn print_usage() {
    println!("Usage: chordroll <AUDIO_FILE> [OPTIONS]");
    println!("       chordroll --events <RESPONSE.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>       JSON config file");
    println!("  --endpoint <URL>      Detection endpoint (default: http://localhost:8000/detect-chords)");
    println!("  --events <PATH>       Render a saved detection response instead of uploading");
    println!("                        (cannot be combined with AUDIO_FILE)");
    println!("  --midi <PATH>         Also write the roll as a MIDI file");
    println!("  --json                Print the grid as JSON instead of text");
    println!("  --timeline            Print the per-column chord listing under the roll");
    println!("  --help, -h            Show this help");
}
