/// Number of per-step activity samples the auto-seeder remembers.
pub const ACTIVITY_HISTORY_LEN: usize = 60;

/// Tuning for the auto-seed heuristic. The defaults were picked by eye
/// for a 100x100 grid stepping ten to sixty times a second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedingConfig {
    /// Minimum number of steps between two injections.
    pub cooldown_steps: u64,
    /// How many of the most recent activity samples are averaged.
    pub sample_window: usize,
    /// Seed when the mean births + deaths per step drops below this.
    pub activity_threshold: f64,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            cooldown_steps: 300,
            sample_window: 30,
            activity_threshold: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub auto_seed_enabled: bool,
    pub edge_wrapping: bool,
    pub seeding: SeedingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_seed_enabled: true,
            edge_wrapping: true,
            seeding: SeedingConfig::default(),
        }
    }
}
