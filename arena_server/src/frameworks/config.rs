use crate::domain::tuning::ArenaTuning;
use crate::use_cases::MatchSettings;
use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("ARENA_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn tick_interval() -> Duration {
    let hz = env::var("ARENA_TICK_HZ")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|hz| *hz > 0)
        .unwrap_or(60);
    Duration::from_secs(1) / hz
}

pub fn match_start_delay() -> Duration {
    let millis = env::var("ARENA_MATCH_START_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(3000);
    Duration::from_millis(millis)
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

// Default time limit for created matches (0 disables match end by time).
pub const DEFAULT_MATCH_TIME_LIMIT: Duration = Duration::from_secs(600);
// Finished matches stay joinable this long so clients see the result.
pub const MATCH_END_LINGER: Duration = Duration::from_secs(10);

pub const DEFAULT_MATCH_ID: &str = "arena";

pub fn match_settings() -> MatchSettings {
    MatchSettings {
        input_channel_capacity: INPUT_CHANNEL_CAPACITY,
        world_broadcast_capacity: WORLD_BROADCAST_CAPACITY,
        tick_interval: tick_interval(),
        start_delay: match_start_delay(),
        default_match_time_limit: DEFAULT_MATCH_TIME_LIMIT,
        end_linger: MATCH_END_LINGER,
        tuning: ArenaTuning::default(),
    }
}
