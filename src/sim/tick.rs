//! Fixed timestep simulation tick
//!
//! One call advances the run by one frame: entities, player, camera, then the
//! overlap checks that drive respawns, checkpoints and level changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::SpecialTile;
use super::player::Controls;
use super::state::RunState;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Keys currently held
    pub controls: Controls,
    /// Window closed / quit requested
    pub quit: bool,
}

/// What happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// Player touched a hazard and was moved to the respawn point
    Respawned { level: usize, pos: Vec2 },
    /// Player touched a checkpoint; save data now points at it
    CheckpointActivated {
        level: usize,
        pos: Vec2,
        /// False when the checkpoint was already active
        first_time: bool,
    },
    /// Player touched an orb and the level was reloaded
    LevelChanged { from: usize, to: usize },
    QuitRequested,
}

/// Advance the run by one tick
pub fn tick(state: &mut RunState, input: &TickInput) -> Vec<RunEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    let bounds = state.bounds();
    for entity in &mut state.entities {
        entity.update(&state.solids, bounds);
    }
    state.player.update(input.controls, &state.solids, bounds);
    state.camera.follow(state.player.body().pos);

    // Hazards and checkpoints
    if let Some(index) = state.player.check_special_tiles(&state.specials) {
        if state.specials[index].is_deadly() {
            let pos = state.goto_last_checkpoint();
            events.push(RunEvent::Respawned {
                level: state.level,
                pos,
            });
        } else if let SpecialTile::Checkpoint(checkpoint) = &mut state.specials[index] {
            let first_time = !checkpoint.active;
            checkpoint.set_active(&mut state.save);
            if first_time {
                log::debug!(
                    "Checkpoint activated in level {} at {:?}",
                    checkpoint.level,
                    checkpoint.position()
                );
            }
            events.push(RunEvent::CheckpointActivated {
                level: checkpoint.level,
                pos: checkpoint.position(),
                first_time,
            });
        }
    }

    // Orbs: the player keeps its position across the switch
    if let Some(color) = state.player.check_orbs(&state.entities) {
        let from = state.level;
        if state.load_level(color) {
            state.camera.reset();
            log::debug!("Orb {} collected in level {}", color, from);
            events.push(RunEvent::LevelChanged { from, to: color });
        }
    }

    if input.quit {
        events.push(RunEvent::QuitRequested);
    }
    events
}
