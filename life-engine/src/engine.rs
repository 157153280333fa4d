use log::{debug, info, trace};
use world_grid::{GridSize, Loc, Neighborhood, Plane, Random, Topology, WorldGrid};

use crate::config::EngineConfig;
use crate::pattern::Pattern;
use crate::seeding::AutoSeeder;

/// Conway's Life over a fixed grid, with per-cell ages, a one-step record
/// of which cells just died, and an auto-seeder that keeps it from
/// settling into stasis.
///
/// Nothing here fails: coordinates off the grid are ignored.
#[derive(Debug)]
pub struct LifeEngine {
    alive: WorldGrid<u8>,
    ages: WorldGrid<u16>,
    dying: Vec<usize>,
    births: u32,
    deaths: u32,
    generation: u64,
    auto_seed_enabled: bool,
    edge_wrapping: bool,
    paused: bool,
    seeder: AutoSeeder,
    rand: Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellFate {
    Survives,
    Dies,
    Born,
    StaysDead,
}

impl CellFate {
    fn of(alive: bool, neighbors: u32) -> Self {
        match (alive, neighbors) {
            (true, 2..=3) => CellFate::Survives,
            (true, _) => CellFate::Dies,
            (false, 3) => CellFate::Born,
            (false, _) => CellFate::StaysDead,
        }
    }
}

impl LifeEngine {
    pub fn new(size: GridSize, rand: Random) -> Self {
        Self::with_config(size, EngineConfig::default(), rand)
    }

    pub fn with_config(size: GridSize, config: EngineConfig, rand: Random) -> Self {
        Self {
            alive: WorldGrid::new(size),
            ages: WorldGrid::new(size),
            dying: Vec::new(),
            births: 0,
            deaths: 0,
            generation: 0,
            auto_seed_enabled: config.auto_seed_enabled,
            edge_wrapping: config.edge_wrapping,
            paused: false,
            seeder: AutoSeeder::new(config.seeding),
            rand,
        }
    }

    pub fn dimensions(&self) -> GridSize {
        self.alive.size()
    }

    /// One byte per cell, 1 for alive.
    pub fn grid(&self) -> &[u8] {
        self.alive.cells.as_slice()
    }

    pub fn ages(&self) -> &[u16] {
        self.ages.cells.as_slice()
    }

    /// Indices of cells that died during the last step, ascending.
    pub fn dying_cells(&self) -> &[usize] {
        &self.dying
    }

    pub fn is_dying(&self, index: usize) -> bool {
        self.dying.binary_search(&index).is_ok()
    }

    pub fn last_births(&self) -> u32 {
        self.births
    }

    pub fn last_deaths(&self) -> u32 {
        self.deaths
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_seed_step(&self) -> u64 {
        self.seeder.last_seed_step()
    }

    pub fn activity_history(&self) -> &[u32] {
        self.seeder.history()
    }

    pub fn live_count(&self) -> usize {
        self.grid().iter().filter(|&&cell| cell == 1).count()
    }

    pub fn auto_seed_enabled(&self) -> bool {
        self.auto_seed_enabled
    }

    pub fn set_auto_seed_enabled(&mut self, enabled: bool) {
        debug!("auto-seeding {}", if enabled { "enabled" } else { "disabled" });
        self.auto_seed_enabled = enabled;
    }

    pub fn edge_wrapping(&self) -> bool {
        self.edge_wrapping
    }

    pub fn set_edge_wrapping(&mut self, wrapping: bool) {
        debug!("edge {}", if wrapping { "wrapping" } else { "bounded" });
        self.edge_wrapping = wrapping;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        debug!("simulation {}", if paused { "paused" } else { "resumed" });
        self.paused = paused;
    }

    pub fn initialize_random(&mut self, density: f64) {
        debug!("randomizing grid with density {density}");
        for index in 0..self.alive.num_cells() {
            let alive = self.rand.next_bool(density);
            self.alive.cells[index] = alive as u8;
            self.ages.cells[index] = alive as u16;
        }
        self.dying.clear();
    }

    pub fn clear(&mut self) {
        debug!("clearing grid");
        self.alive.cells.fill(0);
        self.ages.cells.fill(0);
        self.dying.clear();
    }

    /// Direct edit from outside the simulation. A cell killed this way is
    /// not reported as dying.
    pub fn set_cell_state(&mut self, x: i32, y: i32, alive: bool) {
        if let Some(index) = self.index_of(x, y) {
            paint(&mut self.alive.cells, &mut self.ages.cells, index, alive);
        }
    }

    pub fn get_cell_at(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y)
            .is_some_and(|index| self.alive.cells[index] == 1)
    }

    /// Live neighbors of `(x, y)` under the current edge mode; 0 off the grid.
    pub fn live_neighbors(&self, x: i32, y: i32) -> u32 {
        if !self.dimensions().contains(x, y) {
            return 0;
        }
        let loc = Loc::new(y as u32, x as u32);
        num_live_neighbors(&self.alive.cells, loc, self.topology())
    }

    /// Stamps `pattern` with its anchor at `(x, y)` onto the current
    /// generation. Cells that fall off the grid are dropped.
    pub fn stamp(&mut self, pattern: Pattern, x: i32, y: i32) {
        for (dx, dy) in pattern.cells(&mut self.rand) {
            self.set_cell_state(x.saturating_add(dx), y.saturating_add(dy), true);
        }
    }

    /// Steps unless paused. Returns whether a step happened.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.step();
        true
    }

    pub fn step(&mut self) {
        self.generation += 1;
        self.dying.clear();

        let size = self.dimensions();
        let topology = self.topology();
        let (cells, next_cells) = self.alive.split_mut();
        let (ages, next_ages) = self.ages.split_mut();
        let mut births = 0;
        let mut deaths = 0;

        for row in 0..size.height {
            for col in 0..size.width {
                let loc = Loc::new(row, col);
                let index = row as usize * size.width as usize + col as usize;
                let neighbors = num_live_neighbors(cells, loc, topology);
                let (next_alive, next_age) = match CellFate::of(cells[index] == 1, neighbors) {
                    CellFate::Survives => (1, ages[index].saturating_add(1)),
                    CellFate::Dies => {
                        self.dying.push(index);
                        deaths += 1;
                        (0, 0)
                    }
                    CellFate::Born => {
                        births += 1;
                        (1, 1)
                    }
                    CellFate::StaysDead => (0, 0),
                };
                next_cells[index] = next_alive;
                next_ages[index] = next_age;
            }
        }

        self.births = births;
        self.deaths = deaths;
        self.seeder.record(births + deaths);
        trace!(
            "generation {}: {} births, {} deaths",
            self.generation, births, deaths
        );

        if self.auto_seed_enabled && self.seeder.should_seed(self.generation) {
            self.inject_activity();
            self.seeder.mark_seeded(self.generation);
        }

        self.alive.swap();
        self.ages.swap();
    }

    /// Stamps a random pattern onto the generation being built, so it shows
    /// up as soon as this step completes.
    fn inject_activity(&mut self) {
        let pattern = Pattern::random(&mut self.rand);
        let (x, y) = pattern.anchor(self.dimensions(), &mut self.rand);
        for (dx, dy) in pattern.cells(&mut self.rand) {
            let Some(index) = self.index_of(x + dx, y + dy) else {
                continue;
            };
            paint(&mut self.alive.next_cells, &mut self.ages.next_cells, index, true);
            if let Ok(position) = self.dying.binary_search(&index) {
                self.dying.remove(position);
            }
        }
        info!(
            "auto-seeded {:?} at ({}, {}) in generation {}",
            pattern, x, y, self.generation
        );
    }

    fn topology(&self) -> Topology {
        Topology::from_wrapping(self.edge_wrapping)
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let size = self.dimensions();
        size.contains(x, y)
            .then(|| y as usize * size.width as usize + x as usize)
    }
}

fn num_live_neighbors(cells: &Plane<u8>, loc: Loc, topology: Topology) -> u32 {
    let mut result = 0;
    Neighborhood::new(cells, loc, topology).for_neighbor_cells(|&neighbor| {
        result += neighbor as u32;
    });
    result
}

fn paint(cells: &mut Plane<u8>, ages: &mut Plane<u16>, index: usize, alive: bool) {
    cells[index] = alive as u8;
    ages[index] = alive as u16;
}
