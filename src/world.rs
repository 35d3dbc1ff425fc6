use crate::constants::{
    COLS, GHOST_START_TILES, HOUSE_BOUNDS, HOUSE_GATE_TILE, HOUSE_OPENING_TILE, KILL_SCREEN_LEVEL,
    PLAYER_START_TILE, ROWS, TILE,
};
use crate::error::LayoutError;
use crate::types::{CellKind, TilePos};

const CORRIDOR_ROWS: [i32; 10] = [3, 6, 9, 12, 15, 18, 19, 22, 25, 28];
const PILLAR_COLS: [i32; 8] = [4, 7, 10, 13, 16, 19, 22, 25];
const GATE_ROWS: [i32; 5] = [5, 8, 21, 24, 27];
const GATE_COLS: [i32; 4] = [2, 12, 15, COLS - 3];
const TUNNEL_ROWS: [i32; 1] = [HOUSE_GATE_TILE.1];
const POWER_ITEM_TILES: [(i32, i32); 4] = [
    (2, 3),
    (COLS - 3, 3),
    (2, ROWS - 4),
    (COLS - 3, ROWS - 4),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    cols: i32,
    rows: i32,
    cells: Vec<CellKind>,
    initial_pellets: u32,
    pellets_remaining: u32,
}

impl GridMap {
    fn filled(cols: i32, rows: i32, kind: CellKind) -> Self {
        Self {
            cols,
            rows,
            cells: vec![kind; (cols * rows) as usize],
            initial_pellets: 0,
            pellets_remaining: 0,
        }
    }

    /// Parses a text layout (`#` wall, `.` pellet, `o` power item, space open,
    /// `T` tunnel). Every row must have the same width and the border must be
    /// closed except for tunnel cells on the side columns.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&lines)
    }

    pub fn from_rows(lines: &[&str]) -> Result<Self, LayoutError> {
        let Some(first) = lines.first() else {
            return Err(LayoutError::RowCount {
                expected: ROWS as usize,
                actual: 0,
            });
        };
        let width = first.chars().count();
        let mut grid = Self::filled(width as i32, lines.len() as i32, CellKind::Wall);

        for (row, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(LayoutError::RowWidth {
                    row,
                    expected: width,
                    actual,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let kind = CellKind::from_char(ch).ok_or(LayoutError::UnknownCell {
                    row,
                    col,
                    found: ch,
                })?;
                let on_side = col == 0 || col + 1 == width;
                let on_cap = row == 0 || row + 1 == lines.len();
                let closed =
                    kind == CellKind::Wall || (kind == CellKind::Tunnel && on_side && !on_cap);
                if (on_side || on_cap) && !closed {
                    return Err(LayoutError::OpenBorder { row, col });
                }
                grid.set(TilePos::new(col as i32, row as i32), kind);
            }
        }

        grid.recount_pellets();
        Ok(grid)
    }

    /// Like [`GridMap::parse`] but also enforces the standard maze dimensions
    /// and open spawn tiles.
    pub fn parse_standard(text: &str) -> Result<Self, LayoutError> {
        let grid = Self::parse(text)?;
        if grid.rows != ROWS {
            return Err(LayoutError::RowCount {
                expected: ROWS as usize,
                actual: grid.rows as usize,
            });
        }
        if grid.cols != COLS {
            return Err(LayoutError::RowWidth {
                row: 0,
                expected: COLS as usize,
                actual: grid.cols as usize,
            });
        }
        if let Some(tile) = spawn_tiles().find(|tile| grid.is_wall(*tile)) {
            return Err(LayoutError::BlockedSpawn {
                row: tile.row as usize,
                col: tile.col as usize,
            });
        }
        Ok(grid)
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn width_px(&self) -> f32 {
        self.cols as f32 * TILE
    }

    pub fn in_bounds(&self, tile: TilePos) -> bool {
        tile.col >= 0 && tile.row >= 0 && tile.col < self.cols && tile.row < self.rows
    }

    fn index(&self, tile: TilePos) -> Option<usize> {
        self.in_bounds(tile)
            .then(|| (tile.row * self.cols + tile.col) as usize)
    }

    pub fn cell_at(&self, tile: TilePos) -> Option<CellKind> {
        self.index(tile).map(|idx| self.cells[idx])
    }

    fn set(&mut self, tile: TilePos, kind: CellKind) {
        if let Some(idx) = self.index(tile) {
            self.cells[idx] = kind;
        }
    }

    /// Out-of-range tiles are never walls.
    pub fn is_wall(&self, tile: TilePos) -> bool {
        self.cell_at(tile) == Some(CellKind::Wall)
    }

    pub fn is_tunnel(&self, tile: TilePos) -> bool {
        self.cell_at(tile) == Some(CellKind::Tunnel)
    }

    pub fn is_wall_at(&self, x: f32, y: f32) -> bool {
        self.is_wall(tile_of(x, y))
    }

    /// Eats whatever is edible on `tile`. Returns the consumed kind.
    pub fn consume(&mut self, tile: TilePos) -> Option<CellKind> {
        let idx = self.index(tile)?;
        let kind = self.cells[idx];
        if !kind.is_edible() {
            return None;
        }
        self.cells[idx] = CellKind::Open;
        self.pellets_remaining = self.pellets_remaining.saturating_sub(1);
        Some(kind)
    }

    pub fn pellets_remaining(&self) -> u32 {
        self.pellets_remaining
    }

    pub fn initial_pellets(&self) -> u32 {
        self.initial_pellets
    }

    pub fn pellets_consumed(&self) -> u32 {
        self.initial_pellets - self.pellets_remaining
    }

    fn recount_pellets(&mut self) {
        let count = self.cells.iter().filter(|kind| kind.is_edible()).count() as u32;
        self.initial_pellets = count;
        self.pellets_remaining = count;
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|kind| kind.to_char()).collect())
            .collect()
    }

    /// Overwrites the right half with the deterministic garbage pattern seen
    /// on the arcade's overflow level. Purely cosmetic: the border and the
    /// spawn tiles are left alone and the pellet count is recomputed so
    /// accounting holds.
    pub fn apply_kill_screen_split(&mut self) {
        let spawns: Vec<TilePos> = spawn_tiles().collect();
        for row in 1..self.rows - 1 {
            for col in (self.cols / 2)..self.cols - 1 {
                if spawns.contains(&TilePos::new(col, row)) {
                    continue;
                }
                let chaos = (row * 131 + col * 197 + 256) & 7;
                let kind = if chaos < 2 {
                    CellKind::Wall
                } else if chaos < 5 {
                    CellKind::Pellet
                } else {
                    CellKind::Open
                };
                self.set(TilePos::new(col, row), kind);
            }
        }
        self.recount_pellets();
    }
}

pub fn tile_of(x: f32, y: f32) -> TilePos {
    TilePos::new((x / TILE).floor() as i32, (y / TILE).floor() as i32)
}

pub fn tile_center(tile: TilePos) -> (f32, f32) {
    (
        (tile.col as f32 + 0.5) * TILE,
        (tile.row as f32 + 0.5) * TILE,
    )
}

/// Player start, adversary starts and the house gate, in that order.
fn spawn_tiles() -> impl Iterator<Item = TilePos> {
    std::iter::once(PLAYER_START_TILE)
        .chain(GHOST_START_TILES)
        .chain(std::iter::once(HOUSE_GATE_TILE))
        .map(TilePos::from)
}

pub fn in_house(tile: TilePos) -> bool {
    let (col_min, row_min, col_max, row_max) = HOUSE_BOUNDS;
    tile.col > col_min && tile.col < col_max && tile.row > row_min && tile.row < row_max
}

fn build_base_maze() -> GridMap {
    let mut grid = GridMap::filled(COLS, ROWS, CellKind::Open);
    for row in 0..ROWS {
        for col in 0..COLS {
            if row == 0 || row == ROWS - 1 || col == 0 || col == COLS - 1 {
                grid.set(TilePos::new(col, row), CellKind::Wall);
            }
        }
    }

    for col in PILLAR_COLS {
        for row in 1..ROWS - 1 {
            grid.set(TilePos::new(col, row), CellKind::Wall);
        }
    }
    for row in CORRIDOR_ROWS {
        for col in 1..COLS - 1 {
            grid.set(TilePos::new(col, row), CellKind::Open);
        }
    }
    for row in GATE_ROWS {
        for col in GATE_COLS {
            grid.set(TilePos::new(col, row), CellKind::Open);
        }
    }

    let (col_min, row_min, col_max, row_max) = HOUSE_BOUNDS;
    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let tile = TilePos::new(col, row);
            let kind = if in_house(tile) && col > col_min + 1 && col < col_max - 1 {
                CellKind::Open
            } else {
                CellKind::Wall
            };
            grid.set(tile, kind);
        }
    }
    // The gate row runs straight through both side walls and the opening
    // column continues out through the bottom wall. Greedy steps toward the
    // gate then arrive from every open tile.
    let (gate_col, gate_row) = HOUSE_GATE_TILE;
    for col in col_min..=col_max {
        grid.set(TilePos::new(col, gate_row), CellKind::Open);
    }
    grid.set(HOUSE_OPENING_TILE.into(), CellKind::Open);
    grid.set(TilePos::new(gate_col, row_max), CellKind::Open);

    for row in TUNNEL_ROWS {
        grid.set(TilePos::new(0, row), CellKind::Tunnel);
        grid.set(TilePos::new(COLS - 1, row), CellKind::Tunnel);
    }
    grid
}

fn scatter_pellets(grid: &mut GridMap) {
    for kind in grid.cells.iter_mut() {
        if *kind == CellKind::Open {
            *kind = CellKind::Pellet;
        }
    }
    for tile in POWER_ITEM_TILES {
        let tile = TilePos::from(tile);
        if !grid.is_wall(tile) {
            grid.set(tile, CellKind::PowerItem);
        }
    }
    grid.recount_pellets();
}

pub fn generate_maze(level: u32) -> GridMap {
    let mut grid = build_base_maze();
    scatter_pellets(&mut grid);
    if level == KILL_SCREEN_LEVEL {
        grid.apply_kill_screen_split();
    }
    grid
}

/// Restocks a custom layout for a new level. The template keeps whatever
/// pellets it was parsed with.
pub fn restock_layout(template: &GridMap, level: u32) -> GridMap {
    let mut grid = template.clone();
    if level == KILL_SCREEN_LEVEL {
        grid.apply_kill_screen_split();
    }
    grid
}
