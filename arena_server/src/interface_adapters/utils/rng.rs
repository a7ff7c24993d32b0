use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

// Guest ids live in the upper half of the id space so they never collide with
// the player ids handed out by matchmaking rosters.
const GUEST_ID_FLAG: u64 = 1 << 63;

fn counter() -> &'static AtomicU64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64;
        AtomicU64::new(seed & !GUEST_ID_FLAG)
    })
}

/// Process-unique id for correlating one socket's logs.
pub fn connection_id() -> u64 {
    counter().fetch_add(1, Ordering::Relaxed)
}

/// Player id for a client that joined without one.
pub fn guest_player_id() -> u64 {
    counter().fetch_add(1, Ordering::Relaxed) | GUEST_ID_FLAG
}
