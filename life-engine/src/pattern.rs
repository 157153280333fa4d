use arrayvec::ArrayVec;
use world_grid::{GridSize, Random};

/// Upper bound on live cells in any stamp (the spaceship has nine).
pub const MAX_PATTERN_CELLS: usize = 9;

const CLUSTER_FILL: f64 = 0.6;

const GLIDER: [[u8; 3]; 3] = [
    [0, 1, 0],
    [0, 0, 1],
    [1, 1, 1],
];

const BLINKER: [[u8; 3]; 3] = [
    [0, 1, 0],
    [0, 1, 0],
    [0, 1, 0],
];

const SPACESHIP: [[u8; 5]; 4] = [
    [1, 0, 0, 1, 0],
    [0, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [0, 1, 1, 1, 1],
];

pub type PatternCells = ArrayVec<(i32, i32), MAX_PATTERN_CELLS>;

/// The stamps the auto-seeder can drop onto a stagnating grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Glider,
    Blinker,
    RandomCluster,
    Spaceship,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Glider,
        Pattern::Blinker,
        Pattern::RandomCluster,
        Pattern::Spaceship,
    ];

    pub fn random(rand: &mut Random) -> Self {
        Self::ALL[rand.next_index(Self::ALL.len())]
    }

    /// Live cells as `(dx, dy)` offsets from the anchor. The cluster is
    /// centered on its anchor; the fixed stamps hang down and right of it.
    pub fn cells(&self, rand: &mut Random) -> PatternCells {
        match self {
            Pattern::Glider => live_offsets(&GLIDER),
            Pattern::Blinker => live_offsets(&BLINKER),
            Pattern::Spaceship => live_offsets(&SPACESHIP),
            Pattern::RandomCluster => {
                let mut result = PatternCells::new();
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if rand.next_bool(CLUSTER_FILL) {
                            result.push((dx, dy));
                        }
                    }
                }
                result
            }
        }
    }

    /// Where to put the stamp. Gliders start near a random edge so they
    /// have room to travel; everything else lands anywhere inside a margin.
    pub fn anchor(&self, size: GridSize, rand: &mut Random) -> (i32, i32) {
        match self {
            Pattern::Glider => match rand.next_index(4) {
                0 => (inset(size.width, 5, rand), 2),
                1 => (size.width as i32 - 3, inset(size.height, 5, rand)),
                2 => (inset(size.width, 5, rand), size.height as i32 - 3),
                _ => (2, inset(size.height, 5, rand)),
            },
            Pattern::Blinker => (inset(size.width, 3, rand), inset(size.height, 3, rand)),
            Pattern::RandomCluster => (inset(size.width, 4, rand), inset(size.height, 4, rand)),
            Pattern::Spaceship => (inset(size.width, 5, rand), inset(size.height, 5, rand)),
        }
    }
}

fn live_offsets<const W: usize>(rows: &[[u8; W]]) -> PatternCells {
    let mut result = PatternCells::new();
    for (dy, row) in rows.iter().enumerate() {
        for (dx, &cell) in row.iter().enumerate() {
            if cell == 1 {
                result.push((dx as i32, dy as i32));
            }
        }
    }
    result
}

/// Random coordinate in `margin..len - margin`, or anywhere on the axis
/// when the axis is too short to leave that margin.
fn inset(len: u32, margin: u32, rand: &mut Random) -> i32 {
    if len > 2 * margin {
        rand.next_in_range(margin..len - margin) as i32
    } else {
        rand.next_in_range(0..len.max(1)) as i32
    }
}
