//! Player stage: dash state machine, regeneration and movement

use glam::Vec2;
use log::debug;

use super::Frame;
use crate::sim::fast_math;
use crate::sim::state::{DashState, GameState};
use crate::sim::stats::SessionStats;

pub fn update_player(state: &mut GameState, stats: &mut SessionStats, frame: &Frame) {
    let now = frame.now_ms;
    let tuning = frame.tuning;
    let keys = &state.keys;
    let player = &mut state.player;
    let input_dir = fast_math::normalize(keys.movement_axis());

    // Idle -> Dashing
    if keys.dash && !player.is_dashing() && now > player.dash_cooldown_until_ms {
        let until_ms = now + tuning.dash_duration_ms * player.dash_duration_modifier as f64;
        player.dash = DashState::Dashing { until_ms };
        player.dash_cooldown_until_ms =
            now + tuning.dash_cooldown_ms * player.dash_cooldown_modifier as f64;
        player.dash_direction = if input_dir == Vec2::ZERO {
            player.last_move_direction
        } else {
            input_dir
        };
        stats.record_dash();
        debug!(
            "Dash started toward ({:.2}, {:.2}) until {:.0}",
            player.dash_direction.x, player.dash_direction.y, until_ms
        );
    }

    // Dashing -> Idle
    if let DashState::Dashing { until_ms } = player.dash {
        if now > until_ms {
            player.dash = DashState::Idle;
        }
    }

    let moved = keys.any_movement();
    stats.track_movement(moved, now);

    let regen = frame.player_stats.regen_per_second;
    if regen > 0.0 && player.health > 0.0 {
        player.heal(regen * frame.dt);
    }

    let speed_mult = frame.player_stats.speed_multiplier;
    if player.is_dashing() {
        let dash_speed = player.speed * tuning.dash_speed_multiplier * speed_mult;
        player.pos += player.dash_direction * dash_speed * frame.dt;
    } else if moved {
        if input_dir != Vec2::ZERO {
            player.last_move_direction = input_dir;
        }
        player.pos += input_dir * player.speed * speed_mult * frame.dt;
    }

    let half = player.size / 2.0;
    player.pos.x = player.pos.x.clamp(half, tuning.playfield_width - half);
    player.pos.y = player.pos.y.clamp(half, tuning.playfield_height - half);
}
