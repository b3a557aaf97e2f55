//! Cube Replay CLI - Replay a recorded search trace in the terminal.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use cube_replay::{
    PlaybackConfig, PlaybackEngine, StateLog,
    replay::{RecorderConfig, StateRecorder},
};

struct Options {
    trace: PathBuf,
    speed: Option<f64>,
    config: Option<PathBuf>,
    export: Option<PathBuf>,
    summary: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut trace = None;
    let mut speed = None;
    let mut config = None;
    let mut export = None;
    let mut summary = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| "--config needs a path".to_string())?;
                config = Some(PathBuf::from(path));
            }
            "--export" => {
                let path = iter.next().ok_or_else(|| "--export needs a path".to_string())?;
                export = Some(PathBuf::from(path));
            }
            "--summary" => summary = true,
            _ if trace.is_none() => trace = Some(PathBuf::from(arg)),
            _ if speed.is_none() => {
                let value: f64 = arg.parse().map_err(|_| format!("Invalid speed: {arg}"))?;
                speed = Some(value);
            }
            _ => return Err(format!("Unexpected argument: {arg}")),
        }
    }

    Ok(Options {
        trace: trace.ok_or_else(|| "Missing trace file".to_string())?,
        speed,
        config,
        export,
        summary,
    })
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <trace.json|trace.txt> [speed] [options]");
    eprintln!();
    eprintln!("Replay a recorded magic cube search trace.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  trace            JSON state document or text trace");
    eprintln!("  speed            Playback speed multiplier (default: 1)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>  Playback configuration (JSON)");
    eprintln!("  --export <file>  Write the loaded trace as a JSON state document");
    eprintln!("  --summary        Print the final state without replaying");
    eprintln!("  --example-config Print the default configuration");
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("cube-replay", String::as_str);

    if args.iter().any(|a| a == "--example-config") {
        print_example_config();
        return;
    }

    let options = parse_args(args.get(1..).unwrap_or_default()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        print_usage(program);
        std::process::exit(1);
    });

    // Load configuration
    let config = match &options.config {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str::<PlaybackConfig>(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => PlaybackConfig::default(),
    };

    let mut engine = PlaybackEngine::new(&config).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });

    if let Some(speed) = options.speed {
        if let Err(e) = engine.set_speed(speed) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let log = StateLog::open(&options.trace).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", options.trace.display(), e);
        std::process::exit(1);
    });

    let (min_value, max_value) = log.value_range();
    println!("Cube Replay");
    println!("===========");
    println!("Trace: {}", options.trace.display());
    println!("Frames: {}", log.total_frames());
    println!("Value range: [{}, {}]", min_value, max_value);
    println!("Speed: {}x", engine.speed_multiplier());
    println!();

    if let Some(path) = &options.export {
        export(&log, path);
    }

    engine.attach(log);

    if options.summary {
        engine.seek(i64::MAX);
        render(&engine);
        return;
    }

    replay(&mut engine);
}

fn export(log: &StateLog, path: &Path) {
    let result = StateRecorder::new(path, RecorderConfig::default()).and_then(|mut recorder| {
        for state in log {
            recorder.record_state(state)?;
        }
        recorder.finalize()
    });

    match result {
        Ok(stats) => println!("Exported {} ({})", path.display(), stats),
        Err(e) => {
            eprintln!("Error exporting {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
    println!();
}

fn replay(engine: &mut PlaybackEngine) {
    let poll = Duration::from_secs_f64(engine.frame_interval_ms() / 4000.0);
    let start = Instant::now();

    render(engine);
    engine.play();

    while engine.is_playing() {
        let before = engine.current_frame();
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        if engine.tick(now_ms) && engine.current_frame() != before {
            render(engine);
        }
        thread::sleep(poll);
    }

    println!("Replay finished in {:.2}s", start.elapsed().as_secs_f32());
}

fn render(engine: &PlaybackEngine) {
    let Ok(state) = engine.current_state() else {
        println!("No data loaded");
        return;
    };

    let frame = engine.current_frame().map_or(0, |f| f + 1);
    println!("Frame: {} / {}", frame, engine.total_frames());
    if let Some(iteration) = state.iteration() {
        println!("Iteration: {}", iteration);
    }
    if let Some(temperature) = state.temperature() {
        println!("Temperature: {:.4}", temperature);
    }
    println!("{}", state);
    println!();
}

fn print_example_config() {
    let config = PlaybackConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
