//! Hue Hop entry point
//!
//! Headless runner: loads settings, tiles, levels and save data, then drives
//! the simulation with a scripted input sequence at the fixed tick rate.
//!
//! Usage: `hue-hop [settings.json] [ticks]`

use std::path::PathBuf;

use glam::Vec2;

use hue_hop::Settings;
use hue_hop::consts::*;
use hue_hop::persistence::{self, PersistenceError};
use hue_hop::sim::{
    Controls, DemoLevel, LevelSet, RunConfig, RunEvent, RunState, SaveData, TickInput,
    generate_demo_level, tick,
};

/// Seed for generated levels; level n uses `DEMO_SEED + n`
const DEMO_SEED: u64 = 0x4855_4548;

/// Default run length in seconds of play
const DEFAULT_SECS: u64 = 30;

/// Scripted input: keep running right, hold jump for a fifth of a second
/// out of every 1.5 seconds, quit on the final tick
fn scripted_input(tick_index: u64, total: u64, fps: u32) -> TickInput {
    let fps = u64::from(fps.max(1));
    let period = (fps * 3 / 2).max(1);
    let phase = tick_index % period;
    TickInput {
        controls: Controls {
            left: false,
            right: true,
            jump: phase >= fps && phase < fps + fps / 5,
        },
        quit: tick_index + 1 >= total,
    }
}

/// Levels from disk, or generated ones with their spawn when none exist
fn load_or_generate_levels(settings: &Settings) -> Result<(LevelSet, Option<Vec2>), PersistenceError> {
    let levels = persistence::load_levels(&settings.levels_dir, MAX_LEVELS)?;
    if !levels.is_empty() {
        return Ok((levels, None));
    }

    log::warn!(
        "No level files in {}, generating demo levels",
        settings.levels_dir.display()
    );
    let tile = settings.tile_size();
    let demos: Vec<DemoLevel> = (0..MAX_LEVELS)
        .map(|n| generate_demo_level(DEMO_SEED + n as u64, settings.max_cols, settings.max_rows))
        .collect();
    let spawn = demos.first().map(|demo| {
        let (col, row) = demo.spawn;
        Vec2::new((col as i32 * tile) as f32, (row as i32 * tile) as f32)
    });
    let grids = demos.into_iter().map(|demo| demo.grid).collect();
    Ok((LevelSet::new(grids), spawn))
}

fn run() -> Result<(), PersistenceError> {
    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let ticks_arg: Option<u64> = args.next().and_then(|arg| arg.parse().ok());

    let settings = Settings::load(&settings_path);
    let total_ticks = ticks_arg.unwrap_or_else(|| settings.ticks_for_secs(DEFAULT_SECS));
    let tiles = persistence::load_tile_table(settings.tile_data_path.as_deref());
    let (levels, demo_spawn) = load_or_generate_levels(&settings)?;
    let spawn = demo_spawn.unwrap_or(Vec2::ZERO);

    let save = persistence::load_save_data(&settings.save_path)?.unwrap_or_else(|| {
        log::info!("No save data, starting fresh");
        SaveData::new(spawn)
    });

    let config = RunConfig::from(&settings);
    let mut state = match RunState::new(config, tiles.clone(), levels.clone(), save) {
        Some(state) => state,
        None => {
            log::warn!("Save points at a missing level, starting from level 0");
            let Some(state) = RunState::new(config, tiles, levels, SaveData::new(spawn)) else {
                log::error!("No playable level");
                return Ok(());
            };
            state
        }
    };

    log::info!("Hue Hop (headless) running {} ticks", total_ticks);
    play(&mut state, &settings, total_ticks)?;

    let pos = state.player.body().pos;
    log::info!(
        "Finished in level {} at ({}, {}), {} draw calls on the last frame",
        state.level,
        pos.x,
        pos.y,
        state.draw_list().len()
    );
    Ok(())
}

/// Drive the run with scripted input until it asks to quit. Returns the
/// number of ticks played.
fn play(state: &mut RunState, settings: &Settings, total_ticks: u64) -> Result<u64, PersistenceError> {
    for tick_index in 0.. {
        let input = scripted_input(tick_index, total_ticks, settings.fps);
        for event in tick(state, &input) {
            match event {
                RunEvent::CheckpointActivated {
                    first_time: true, ..
                } => {
                    persistence::save_save_data(&settings.save_path, state.save_data())?;
                    log::info!("Progress saved (level {})", state.save_data().level);
                }
                RunEvent::CheckpointActivated { .. } => {}
                RunEvent::Respawned { level, pos } => {
                    log::info!("Respawned in level {} at ({}, {})", level, pos.x, pos.y);
                }
                RunEvent::LevelChanged { from, to } => {
                    log::info!("Level {} -> {}", from, to);
                }
                RunEvent::QuitRequested => {
                    log::info!("Quit requested after {} ticks", state.time_ticks);
                    return Ok(state.time_ticks);
                }
            }
        }
    }
    Ok(state.time_ticks)
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
