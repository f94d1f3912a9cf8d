//! # Atomic exclusion flag
//!
//! A lock-free single-flight guard. Callers never wait on it: they either win the flag or drop
//! what they were about to do.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, Ordering};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AtomicFlag(AtomicBool);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AtomicFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Set the flag if it is clear. Returns `true` if this call set it.
    pub fn try_acquire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clear the flag. Clearing an already clear flag has no effect.
    pub fn release(&self) {
        self.0.store(false, Ordering::Release)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    };
    use std::thread;

    #[test]
    fn test_acquire_release() {
        let f = AtomicFlag::new();

        assert!(!f.is_set());
        assert!(f.try_acquire());
        assert!(f.is_set());
        assert!(!f.try_acquire());

        f.release();
        assert!(!f.is_set());
        f.release();
        assert!(f.try_acquire());
    }

    #[test]
    fn test_single_winner() {
        const NUM_THREADS: usize = 8;

        let flag = Arc::new(AtomicFlag::new());
        let winners = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(NUM_THREADS));

        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|_| {
                let flag = flag.clone();
                let winners = winners.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if flag.try_acquire() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
