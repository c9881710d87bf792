use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for the credential flows, injectable so expiry behavior can
/// be exercised in tests
pub trait Clock {
    /// Current Unix timestamp in seconds
    fn now(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        get_current_timestamp()
    }
}

/// Get current Unix timestamp
pub fn get_current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp() {
        let timestamp = get_current_timestamp();
        assert!(timestamp > 0);
        // Verify timestamp is recent (within last minute)
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(now - timestamp < 60);
    }

    #[test]
    fn test_system_clock_tracks_time() {
        let clock = SystemClock;
        let before = get_current_timestamp();
        let now = clock.now();
        assert!(now >= before);
    }
}
