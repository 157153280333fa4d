#![deny(clippy::all)]
#![forbid(unsafe_code)]

use life_engine::{GridStats, LifeEngine, Pattern, TrendSmoother};
use log::{debug, info};
use pixels_main_support::{AnimateError, Interactive, KeyCode, animate, log_error};
use std::time::Duration;
use world_grid::{GridSize, Random, World};

const GRID_WIDTH: u32 = 100;
const GRID_HEIGHT: u32 = 100;
const INITIAL_DENSITY: f64 = 0.15;
const TIME_STEP_MILLIS: u64 = 100;

const DEAD_COLOR: [u8; 4] = [0x08, 0x08, 0x18, 0xff];
const DYING_COLOR: [u8; 4] = [0xff, 0x8c, 0x1a, 0xff];
const NEWBORN_COLOR: [u8; 3] = [0xe8, 0xff, 0xd0];
const MATURE_COLOR: [u8; 3] = [0x30, 0x9c, 0x88];
const MATURE_AGE: u16 = 32;

fn main() -> Result<(), AnimateError> {
    env_logger::init();
    let mut engine = LifeEngine::new(GridSize::new(GRID_WIDTH, GRID_HEIGHT), Random::new());
    engine.initialize_random(INITIAL_DENSITY);
    info!(
        "starting {}x{} grid with {} live cells",
        GRID_WIDTH,
        GRID_HEIGHT,
        engine.live_count()
    );
    animate(
        LifeView::new(engine, Random::new()),
        Duration::from_millis(TIME_STEP_MILLIS),
    )
    .inspect_err(|err| log_error("animate", err))
}

#[derive(Debug)]
pub struct LifeView {
    engine: LifeEngine,
    trend: TrendSmoother,
    rand: Random,
}

impl LifeView {
    pub fn new(engine: LifeEngine, rand: Random) -> Self {
        Self {
            engine,
            trend: TrendSmoother::default(),
            rand,
        }
    }

    fn inject_glider(&mut self) {
        let size = self.engine.dimensions();
        let x = self.rand.next_in_range(0..size.width.saturating_sub(2).max(1)) as i32;
        let y = self.rand.next_in_range(0..size.height.saturating_sub(2).max(1)) as i32;
        self.engine.stamp(Pattern::Glider, x, y);
        info!("glider injected at ({x}, {y})");
    }

    fn log_stats(&self) {
        let stats = GridStats::of(&self.engine);
        info!(
            "generation {}: {} living, {} young, {} dying, trend {}",
            self.engine.generation(),
            stats.living,
            stats.young,
            stats.dying,
            self.trend.label()
        );
    }
}

impl World for LifeView {
    fn size(&self) -> GridSize {
        self.engine.dimensions()
    }

    fn update(&mut self) {
        if self.engine.tick() {
            let stats = GridStats::of(&self.engine);
            let smoothed = self.trend.push(stats.trend());
            debug!(
                "births {} deaths {} trend {:.2} ({})",
                stats.births,
                stats.deaths,
                smoothed,
                self.trend.label()
            );
        }
    }

    fn cell_colors(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.engine
            .grid()
            .iter()
            .zip(self.engine.ages())
            .enumerate()
            .map(move |(index, (&alive, &age))| {
                if alive == 1 {
                    alive_color(age)
                } else if self.engine.is_dying(index) {
                    DYING_COLOR
                } else {
                    DEAD_COLOR
                }
            })
    }
}

impl Interactive for LifeView {
    fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Space => self.engine.set_paused(!self.engine.paused()),
            KeyCode::KeyA => self
                .engine
                .set_auto_seed_enabled(!self.engine.auto_seed_enabled()),
            KeyCode::KeyW => self.engine.set_edge_wrapping(!self.engine.edge_wrapping()),
            KeyCode::KeyC => self.engine.clear(),
            KeyCode::KeyR => self.engine.initialize_random(INITIAL_DENSITY),
            KeyCode::KeyG => self.inject_glider(),
            KeyCode::KeyS => self.log_stats(),
            _ => (),
        }
    }

    fn on_paint(&mut self, x: i32, y: i32) {
        self.engine.set_cell_state(x, y, true);
    }
}

/// Newborn cells flash bright and settle to a calmer tone as they age.
fn alive_color(age: u16) -> [u8; 4] {
    let fraction = age.saturating_sub(1).min(MATURE_AGE) as f32 / MATURE_AGE as f32;
    let mut result = [0, 0, 0, 0xff];
    for ((channel, &newborn), &mature) in result.iter_mut().zip(&NEWBORN_COLOR).zip(&MATURE_COLOR) {
        *channel = (newborn as f32 + (mature as f32 - newborn as f32) * fraction).round() as u8;
    }
    result
}
