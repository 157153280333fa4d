use std::fmt;

use crate::engine::LifeEngine;

/// Cells at or below this age count as young.
pub const YOUNG_AGE_MAX: u16 = 5;

const TREND_SMOOTHING: f64 = 0.5;
const TREND_DEAD_BAND: f64 = 0.05;

/// Aggregate counts for the stats panel and the audio drone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub living: usize,
    pub young: usize,
    pub dying: usize,
    pub births: u32,
    pub deaths: u32,
}

impl GridStats {
    pub fn of(engine: &LifeEngine) -> Self {
        let mut living = 0;
        let mut young = 0;
        for (&alive, &age) in engine.grid().iter().zip(engine.ages()) {
            if alive == 1 {
                living += 1;
                if age <= YOUNG_AGE_MAX {
                    young += 1;
                }
            }
        }
        Self {
            living,
            young,
            dying: engine.dying_cells().len(),
            births: engine.last_births(),
            deaths: engine.last_deaths(),
        }
    }

    /// +1 when the last step only had births, -1 when it only had deaths.
    pub fn trend(&self) -> f64 {
        let total = self.births + self.deaths;
        if total == 0 {
            0.0
        } else {
            (self.births as f64 - self.deaths as f64) / total as f64
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendLabel {
    Up,
    Down,
    Flat,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendLabel::Up => "Up",
            TrendLabel::Down => "Down",
            TrendLabel::Flat => "Flat",
        };
        f.write_str(label)
    }
}

/// Exponential moving average of `GridStats::trend`.
#[derive(Clone, Copy, Debug)]
pub struct TrendSmoother {
    alpha: f64,
    value: Option<f64>,
}

impl TrendSmoother {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: None,
        }
    }

    pub fn push(&mut self, trend: f64) -> f64 {
        let last = self.value.unwrap_or(trend);
        let next = last + self.alpha * (trend - last);
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    pub fn label(&self) -> TrendLabel {
        let value = self.value();
        if value > TREND_DEAD_BAND {
            TrendLabel::Up
        } else if value < -TREND_DEAD_BAND {
            TrendLabel::Down
        } else {
            TrendLabel::Flat
        }
    }
}

impl Default for TrendSmoother {
    fn default() -> Self {
        Self::new(TREND_SMOOTHING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use world_grid::{GridSize, Random};

    #[test]
    fn counts_living_young_and_dying() {
        let config = EngineConfig {
            auto_seed_enabled: false,
            ..EngineConfig::default()
        };
        let mut engine = LifeEngine::with_config(GridSize::new(20, 20), config, Random::from_seed(0));
        // Block plus a lone cell that dies.
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3), (10, 10)] {
            engine.set_cell_state(x, y, true);
        }
        engine.step();
        let stats = GridStats::of(&engine);
        assert_eq!(
            stats,
            GridStats {
                living: 4,
                young: 4,
                dying: 1,
                births: 0,
                deaths: 1,
            }
        );
        assert_eq!(stats.trend(), -1.0);

        for _ in 0..5 {
            engine.step();
        }
        let stats = GridStats::of(&engine);
        assert_eq!(stats.living, 4);
        assert_eq!(stats.young, 0);
        assert_eq!(stats.trend(), 0.0);
    }

    #[test]
    fn trend_is_balanced_ratio() {
        let stats = GridStats {
            births: 3,
            deaths: 1,
            ..GridStats::default()
        };
        assert_eq!(stats.trend(), 0.5);
    }

    #[test]
    fn smoother_starts_at_first_sample() {
        let mut smoother = TrendSmoother::default();
        assert_eq!(smoother.label(), TrendLabel::Flat);
        assert_eq!(smoother.push(1.0), 1.0);
        assert_eq!(smoother.label(), TrendLabel::Up);
        assert_eq!(smoother.push(-1.0), 0.0);
        assert_eq!(smoother.label(), TrendLabel::Flat);
        assert_eq!(smoother.push(-1.0), -0.5);
        assert_eq!(smoother.label(), TrendLabel::Down);
        assert_eq!(smoother.label().to_string(), "Down");
    }
}
