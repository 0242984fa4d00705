//! Per-kind caps on how many entities are updated each tick
//!
//! With [`BatchPolicy::Head`] the same leading slice is processed every tick,
//! so entities past the cap are not updated for as long as the list stays
//! longer than the cap. [`BatchPolicy::Rotating`] resumes after the last
//! processed entity instead.

use crate::tuning::{BatchPolicy, Tuning};

/// Apply `f` to at most the first `max_per_frame` items, in order.
/// Returns how many were processed.
pub fn process_batch<T>(
    items: &mut [T],
    max_per_frame: usize,
    mut f: impl FnMut(&mut T),
) -> usize {
    let n = items.len().min(max_per_frame);
    items[..n].iter_mut().for_each(&mut f);
    n
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Enemies,
    Projectiles,
    Particles,
}

impl BatchKind {
    #[inline]
    fn slot(self) -> usize {
        match self {
            BatchKind::Enemies => 0,
            BatchKind::Projectiles => 1,
            BatchKind::Particles => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    policy: BatchPolicy,
    caps: [usize; 3],
    cursors: [usize; 3],
}

impl BatchScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            policy: tuning.batch_policy,
            caps: [
                tuning.enemy_batch,
                tuning.projectile_batch,
                tuning.particle_batch,
            ],
            cursors: [0; 3],
        }
    }

    pub fn cap(&self, kind: BatchKind) -> usize {
        self.caps[kind.slot()]
    }

    pub fn set_cap(&mut self, kind: BatchKind, cap: usize) {
        self.caps[kind.slot()] = cap;
    }

    pub fn reset(&mut self) {
        self.cursors = [0; 3];
    }

    /// Process this tick's share of `items` for `kind`
    pub fn process<T>(
        &mut self,
        kind: BatchKind,
        items: &mut [T],
        mut f: impl FnMut(&mut T),
    ) -> usize {
        let cap = self.caps[kind.slot()];
        match self.policy {
            BatchPolicy::Head => process_batch(items, cap, f),
            BatchPolicy::Rotating => {
                let len = items.len();
                if len == 0 {
                    return 0;
                }
                let n = len.min(cap);
                let start = self.cursors[kind.slot()] % len;
                for offset in 0..n {
                    f(&mut items[(start + offset) % len]);
                }
                self.cursors[kind.slot()] = (start + n) % len;
                n
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_caps() {
        let scheduler = BatchScheduler::new(&Tuning::default());
        assert_eq!(scheduler.cap(BatchKind::Enemies), 30);
        assert_eq!(scheduler.cap(BatchKind::Projectiles), 40);
        assert_eq!(scheduler.cap(BatchKind::Particles), 60);
    }

    #[test]
    fn test_head_policy_starves_tail() {
        let mut scheduler = BatchScheduler::new(&Tuning::default());
        scheduler.set_cap(BatchKind::Enemies, 2);
        let mut counts = vec![0u32; 5];
        for _ in 0..3 {
            scheduler.process(BatchKind::Enemies, &mut counts, |c| *c += 1);
        }
        assert_eq!(counts, vec![3, 3, 0, 0, 0]);
    }

    #[test]
    fn test_rotating_policy_visits_everyone() {
        let tuning = Tuning {
            batch_policy: BatchPolicy::Rotating,
            ..Default::default()
        };
        let mut scheduler = BatchScheduler::new(&tuning);
        scheduler.set_cap(BatchKind::Particles, 2);
        let mut counts = vec![0u32; 5];
        for _ in 0..5 {
            assert_eq!(scheduler.process(BatchKind::Particles, &mut counts, |c| *c += 1), 2);
        }
        assert_eq!(counts, vec![2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_rotating_cursor_survives_shrinking_list() {
        let tuning = Tuning {
            batch_policy: BatchPolicy::Rotating,
            ..Default::default()
        };
        let mut scheduler = BatchScheduler::new(&tuning);
        scheduler.set_cap(BatchKind::Enemies, 3);
        let mut long = vec![0u32; 10];
        scheduler.process(BatchKind::Enemies, &mut long, |c| *c += 1);
        let mut short = vec![0u32; 2];
        assert_eq!(scheduler.process(BatchKind::Enemies, &mut short, |c| *c += 1), 2);
        assert_eq!(short, vec![1, 1]);
    }

    proptest! {
        #[test]
        fn prop_processes_min_of_len_and_cap_once_each(len in 0usize..200, cap in 0usize..100) {
            let mut items = vec![0u32; len];
            let processed = process_batch(&mut items, cap, |c| *c += 1);
            prop_assert_eq!(processed, len.min(cap));
            for (i, c) in items.iter().enumerate() {
                prop_assert_eq!(*c, if i < len.min(cap) { 1 } else { 0 });
            }
        }
    }
}
