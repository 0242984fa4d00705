//! Host-facing events and callback hooks
//!
//! Stages push events into the working copy. The orchestrator delivers them
//! only after the tick commits.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use super::stats::SessionStats;

/// Something the host should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player health reached zero. Stats are handed to the hook at delivery.
    GameOver,
    LevelUp { free_upgrade: bool },
    BossWarning { stage: u32 },
    BossFightStart,
    StageClear { stage: u32, nightmare: bool },
}

/// Callbacks invoked after a committed tick, in the order events were raised
pub trait GameHooks {
    fn on_game_over(&mut self, _stats: &SessionStats) {}
    fn on_level_up(&mut self, _is_free_upgrade: bool) {}
    fn on_boss_warning(&mut self, _stage: u32) {}
    fn on_boss_fight_start(&mut self) {}
    fn on_stage_clear(&mut self, _stage: u32, _is_nightmare: bool) {}
}

/// No hooks
impl GameHooks for () {}

/// Forward every event over a channel. Send errors mean the receiver is gone
/// and are ignored.
impl GameHooks for Sender<GameEvent> {
    fn on_game_over(&mut self, _stats: &SessionStats) {
        let _ = self.send(GameEvent::GameOver);
    }

    fn on_level_up(&mut self, is_free_upgrade: bool) {
        let _ = self.send(GameEvent::LevelUp {
            free_upgrade: is_free_upgrade,
        });
    }

    fn on_boss_warning(&mut self, stage: u32) {
        let _ = self.send(GameEvent::BossWarning { stage });
    }

    fn on_boss_fight_start(&mut self) {
        let _ = self.send(GameEvent::BossFightStart);
    }

    fn on_stage_clear(&mut self, stage: u32, is_nightmare: bool) {
        let _ = self.send(GameEvent::StageClear {
            stage,
            nightmare: is_nightmare,
        });
    }
}

/// Deliver one event to `hooks`
pub fn dispatch(hooks: &mut dyn GameHooks, event: &GameEvent, stats: &SessionStats) {
    match *event {
        GameEvent::GameOver => hooks.on_game_over(stats),
        GameEvent::LevelUp { free_upgrade } => hooks.on_level_up(free_upgrade),
        GameEvent::BossWarning { stage } => hooks.on_boss_warning(stage),
        GameEvent::BossFightStart => hooks.on_boss_fight_start(),
        GameEvent::StageClear { stage, nightmare } => hooks.on_stage_clear(stage, nightmare),
    }
}
