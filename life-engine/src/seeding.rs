use arrayvec::ArrayVec;

use crate::config::{ACTIVITY_HISTORY_LEN, SeedingConfig};

/// Remembers recent activity and decides when the grid has gone quiet
/// enough to need a new pattern.
#[derive(Clone, Debug)]
pub(crate) struct AutoSeeder {
    config: SeedingConfig,
    history: ArrayVec<u32, ACTIVITY_HISTORY_LEN>,
    last_seed_step: u64,
}

impl AutoSeeder {
    pub fn new(mut config: SeedingConfig) -> Self {
        config.sample_window = config.sample_window.clamp(1, ACTIVITY_HISTORY_LEN);
        Self {
            config,
            history: ArrayVec::new(),
            last_seed_step: 0,
        }
    }

    /// Oldest first.
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    pub fn last_seed_step(&self) -> u64 {
        self.last_seed_step
    }

    pub fn record(&mut self, activity: u32) {
        if self.history.is_full() {
            self.history.remove(0);
        }
        self.history.push(activity);
    }

    pub fn should_seed(&self, generation: u64) -> bool {
        if generation.saturating_sub(self.last_seed_step) < self.config.cooldown_steps {
            return false;
        }
        let window = self.config.sample_window;
        if self.history.len() < window {
            return false;
        }
        let recent = &self.history[self.history.len() - window..];
        let mean = recent.iter().map(|&activity| activity as f64).sum::<f64>() / window as f64;
        mean < self.config.activity_threshold
    }

    pub fn mark_seeded(&mut self, generation: u64) {
        self.last_seed_step = generation;
    }
}
