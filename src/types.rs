use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    pub fn parse_move(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Some(Self::Up),
            "down" | "s" | "j" => Some(Self::Down),
            "left" | "a" | "h" => Some(Self::Left),
            "right" | "d" | "l" => Some(Self::Right),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Scatter,
    Chase,
    Frightened,
}

/// The four adversary identities, in the fixed update order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Heads straight for the player.
    Aggressive,
    /// Aims a few tiles ahead of the player.
    Ambusher,
    /// Pincers the player together with the aggressive adversary.
    Flanker,
    /// Chases from afar, backs off up close.
    Erratic,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Aggressive, Role::Ambusher, Role::Flanker, Role::Erratic];

    pub fn index(self) -> usize {
        match self {
            Self::Aggressive => 0,
            Self::Ambusher => 1,
            Self::Flanker => 2,
            Self::Erratic => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Wall,
    Open,
    Pellet,
    PowerItem,
    Tunnel,
}

impl CellKind {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Open),
            '.' => Some(Self::Pellet),
            'o' => Some(Self::PowerItem),
            'T' => Some(Self::Tunnel),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Open => ' ',
            Self::Pellet => '.',
            Self::PowerItem => 'o',
            Self::Tunnel => 'T',
        }
    }

    pub fn is_edible(self) -> bool {
        matches!(self, Self::Pellet | Self::PowerItem)
    }
}

/// Continuous position in pixels. Agents sit on tile centers when aligned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TilePos {
    pub col: i32,
    pub row: i32,
}

impl TilePos {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((col, row): (i32, i32)) -> Self {
        Self { col, row }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GameConfig {
    #[serde(rename = "tickRate")]
    pub tick_rate: u32,
    pub seed: u32,
    #[serde(rename = "adversaryTunnelWrap")]
    pub adversary_tunnel_wrap: bool,
    #[serde(rename = "startingLives")]
    pub starting_lives: u32,
    #[serde(rename = "startingLevel")]
    pub starting_level: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    #[serde(rename = "nextDir")]
    pub next_dir: Direction,
    pub invincible: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub role: Role,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub confined: bool,
    pub frightened: bool,
    pub retreating: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FruitView {
    pub col: i32,
    pub row: i32,
    pub score: u32,
    #[serde(rename = "ticksLeft")]
    pub ticks_left: u32,
}

/// Discrete cues emitted the moment a rule fires. Audio and HUD collaborators
/// drain these from the snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    PelletEaten {
        col: i32,
        row: i32,
    },
    PowerItemEaten {
        col: i32,
        row: i32,
    },
    AdversaryEaten {
        role: Role,
        score: u32,
    },
    PlayerDied {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    LifeGained {
        lives: u32,
    },
    FruitSpawned {
        col: i32,
        row: i32,
        score: u32,
    },
    FruitEaten {
        score: u32,
    },
    ModeChanged {
        mode: Mode,
    },
    LevelCleared {
        level: u32,
    },
    GameOver {
        #[serde(rename = "finalScore")]
        final_score: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub config: GameConfig,
    pub level: u32,
    pub score: u32,
    #[serde(rename = "bestScore")]
    pub best_score: u32,
    pub lives: u32,
    pub mode: Mode,
    #[serde(rename = "pelletsRemaining")]
    pub pellets_remaining: u32,
    pub cells: Vec<String>,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub fruit: Option<FruitView>,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    pub events: Vec<RuntimeEvent>,
}
