use serde::{Deserialize, Serialize};

/// Remaining-seconds counter for one run. `remaining` never leaves
/// `[0, total]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    total: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(total: u32) -> Self {
        Countdown {
            total,
            remaining: total,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.total;
    }

    /// Take exactly one second off, stopping at zero.
    pub fn decrement(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_exactly_total_decrements() {
        let mut c = Countdown::new(3);
        for left in [2, 1] {
            c.decrement();
            assert_eq!(c.remaining(), left);
            assert!(!c.is_expired());
        }
        c.decrement();
        assert!(c.is_expired());
        c.decrement();
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn reset_restores_total() {
        let mut c = Countdown::new(60);
        c.decrement();
        c.decrement();
        c.reset();
        assert_eq!(c.remaining(), 60);
        assert_eq!(c.total(), 60);
    }
}
