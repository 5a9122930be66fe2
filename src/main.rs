//! Balloon Dodge asset tool
//!
//! Builds and inspects pack archives, compiles authored entity descriptions
//! and runs levels headless against a manual clock.

use std::path::Path;
use std::process::ExitCode;

use glam::Vec2;

use balloon_dodge::audio::{AudioManager, NullAudio};
use balloon_dodge::persistence::{EntityDescMap, GameSave, PackArchive, PackResources};
use balloon_dodge::platform::{InputState, ManualClock};
use balloon_dodge::renderer::RecordingCanvas;
use balloon_dodge::sim::{EntityFactory, LevelAssets, LevelSession, SessionEvent};
use balloon_dodge::{Error, Result, Settings};

const USAGE: &str = "usage:
  balloon-dodge pack <out.pak> <name=file>...
  balloon-dodge list [pak]
  balloon-dodge compile-descs <in.txt> <out.bin>
  balloon-dodge simulate [--pak <pak>] <level> [seconds] [--record]

Without a pak, list and simulate read the settings' pack_path.";

/// Frame length of a headless run
const FRAME: f32 = 1.0 / 60.0;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let result = match command.as_str() {
        "pack" => pack(rest),
        "list" => list(rest),
        "compile-descs" => compile_descs(rest),
        "simulate" => simulate(rest),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{command}: {e}");
            ExitCode::FAILURE
        }
    }
}

fn usage_error() -> Error {
    Error::format(USAGE)
}

fn pack(args: &[String]) -> Result<()> {
    let (out, inputs) = args.split_first().ok_or_else(usage_error)?;
    let mut pack = PackArchive::new();
    for input in inputs {
        let (name, file) = input
            .split_once('=')
            .ok_or_else(|| Error::format(format!("expected name=file, got '{input}'")))?;
        let data = std::fs::read(file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(file),
            _ => Error::Io(e),
        })?;
        log::debug!("adding '{}' ({} bytes)", name, data.len());
        pack.insert(name, data);
    }
    pack.export(out)
}

fn list(args: &[String]) -> Result<()> {
    let pack = match args {
        [] => PackArchive::import(&Settings::load(Path::new(SETTINGS_FILE)).pack_path)?,
        [path] => PackArchive::import(path)?,
        _ => return Err(usage_error()),
    };
    for element in pack.elements() {
        println!(
            "{:#010x}  v{}  {:>10} bytes",
            element.signature,
            element.version,
            element.data.len()
        );
    }
    Ok(())
}

fn compile_descs(args: &[String]) -> Result<()> {
    let [input, output] = args else {
        return Err(usage_error());
    };
    let map = EntityDescMap::import_text(input)?;
    log::info!("compiled {} descriptions", map.len());
    map.export(output)
}

fn simulate(args: &[String]) -> Result<()> {
    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let mut record = false;
    let mut pak = settings.pack_path.as_str();
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--record" => record = true,
            "--pak" => pak = iter.next().map(String::as_str).ok_or_else(usage_error)?,
            _ => positional.push(arg),
        }
    }
    let level = match positional[..] {
        [level] | [level, _] => level,
        _ => return Err(usage_error()),
    };

    let mut resources = PackResources::new(PackArchive::import(pak)?);
    let assets = LevelAssets::load(&mut resources, level)?;
    let seconds = match positional.get(1) {
        Some(s) => s
            .parse::<f32>()
            .map_err(|_| Error::format(format!("bad seconds '{s}'")))?,
        None => assets.info.duration,
    };

    let factory = EntityFactory::from_settings(&settings, rand::random());
    let mut session = LevelSession::new(&assets, ManualClock::new(), factory, settings.balloon_radius);
    let mut audio = AudioManager::from_settings(Box::new(NullAudio), &settings);
    let mut canvas = RecordingCanvas::new();
    // Balloon parked in the middle of the window
    let input = InputState {
        mouse_pos: Vec2::new(settings.window_width, settings.window_height) * 0.5,
        ..Default::default()
    };

    session.enter(&mut audio);
    let mut frames = 0u32;
    while session.elapsed() < seconds {
        session.clock_mut().advance(FRAME);
        frames += 1;
        for event in session.update(&input, &mut audio) {
            match event {
                SessionEvent::Spawned(kind) => {
                    log::info!("t={:>7.2}  spawn {}", session.elapsed(), kind.as_str())
                }
                SessionEvent::Hit(kind) => {
                    println!("popped by {} at t={:.2}", kind.as_str(), session.elapsed());
                    session.exit(&mut audio);
                    return Ok(());
                }
                SessionEvent::Completed => {
                    println!("level '{}' completed", assets.info.name);
                    if record {
                        let mut save = GameSave::load(&settings.save_path)?;
                        save.complete_level(save.completed_levels);
                        save.save(&settings.save_path)?;
                    }
                    session.exit(&mut audio);
                    return Ok(());
                }
            }
        }
        canvas.clear();
        session.draw(&mut canvas);
    }

    println!(
        "stopped at t={:.2} after {} frames, {} entities live",
        session.elapsed(),
        frames,
        session.entities().len()
    );
    session.exit(&mut audio);
    Ok(())
}
