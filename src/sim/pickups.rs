//! Experience orb and health pickup collection

use log::debug;

use super::collision::overlaps;
use super::fast_math::distance_squared;
use super::state::GameState;
use super::stats::SessionStats;

/// Collect orbs inside the pickup radius and health pickups touching the
/// player. Returns the experience gained.
pub fn collect_pickups(state: &mut GameState, stats: &mut SessionStats) -> u32 {
    if state.game_over {
        return 0;
    }
    let player_pos = state.player.pos;
    let player_size = state.player.size;
    let reach_sq = state.player.pickup_radius * state.player.pickup_radius;

    let mut gained = 0;
    state.exp_orbs.retain(|orb| {
        if distance_squared(player_pos, orb.pos) <= reach_sq {
            gained += orb.value;
            stats.total_xp_orbs_collected += 1;
            false
        } else {
            true
        }
    });
    state.experience += gained;

    let mut healed = 0.0;
    state.health_pickups.retain(|pickup| {
        if overlaps(player_pos, player_size, pickup.pos, pickup.size) {
            healed += pickup.heal;
            stats.health_pickups_collected += 1;
            false
        } else {
            true
        }
    });
    if healed > 0.0 {
        state.player.heal(healed);
        debug!("Healed {:.1}, health {:.1}", healed, state.player.health);
    }
    gained
}
