//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. Renderers and
//! stats collaborators only ever see it between ticks.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects;
use super::events::{DeathCause, GameEvent, SessionSummary};
use super::evolution::Ability;
use crate::consts::*;
use crate::tuning::{ConfigError, Tuning};
use crate::wrap_coord;

/// One of the four travel directions (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Parse a raw input vector; anything but a unit axis vector is rejected
    pub fn from_vector(v: IVec2) -> Option<Self> {
        match (v.x, v.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    #[inline]
    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Playfield dimensions, fixed for a session
///
/// Always at least [`Grid::MIN_WIDTH`] by 1, also when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDims")]
pub struct Grid {
    width: i32,
    height: i32,
}

#[derive(Deserialize)]
struct GridDims {
    width: i32,
    height: i32,
}

impl TryFrom<GridDims> for Grid {
    type Error = ConfigError;

    fn try_from(dims: GridDims) -> Result<Self, Self::Error> {
        Grid::new(dims.width, dims.height)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::DESKTOP
    }
}

impl Grid {
    /// Smallest width that fits the starting snake left of center
    pub const MIN_WIDTH: i32 = 4;

    pub const DESKTOP: Grid = Grid {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
    };

    /// Narrow board for portrait phones
    pub const MOBILE: Grid = Grid {
        width: 15,
        height: GRID_HEIGHT,
    };

    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width < Self::MIN_WIDTH || height < 1 {
            return Err(ConfigError::InvalidGrid { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Wrap each coordinate independently into the grid
    #[inline]
    pub fn wrap(&self, cell: IVec2) -> IVec2 {
        IVec2::new(wrap_coord(cell.x, self.width), wrap_coord(cell.y, self.height))
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }
}

/// Segment role within the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Head,
    Body,
    Tail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub pos: IVec2,
    pub kind: SegmentKind,
}

/// The player's snake, head first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    segments: VecDeque<Segment>,
}

impl Snake {
    /// Straight snake with its body trailing away from `facing`
    pub fn new(head: IVec2, facing: Direction, length: usize) -> Self {
        let back = -facing.vector();
        let cells = (0..length.max(INITIAL_LENGTH)).map(|i| head + back * i as i32);
        Self::from_cells_unchecked(cells)
    }

    /// Build a snake from explicit cells (head first). Needs at least
    /// [`INITIAL_LENGTH`] cells.
    pub fn from_cells(cells: impl IntoIterator<Item = IVec2>) -> Option<Self> {
        let snake = Self::from_cells_unchecked(cells);
        (snake.len() >= INITIAL_LENGTH).then_some(snake)
    }

    fn from_cells_unchecked(cells: impl IntoIterator<Item = IVec2>) -> Self {
        let mut snake = Self {
            segments: cells
                .into_iter()
                .map(|pos| Segment {
                    pos,
                    kind: SegmentKind::Body,
                })
                .collect(),
        };
        snake.retag();
        snake
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> IVec2 {
        self.segments.front().map(|s| s.pos).unwrap_or_default()
    }

    pub fn tail(&self) -> IVec2 {
        self.segments.back().map(|s| s.pos).unwrap_or_default()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.segments.iter().map(|s| s.pos)
    }

    /// True if any segment (head included) sits on `cell`
    pub fn occupies(&self, cell: IVec2) -> bool {
        self.segments.iter().any(|s| s.pos == cell)
    }

    pub(crate) fn push_head(&mut self, cell: IVec2) {
        self.segments.push_front(Segment {
            pos: cell,
            kind: SegmentKind::Head,
        });
    }

    pub(crate) fn pop_tail(&mut self) {
        self.segments.pop_back();
    }

    /// Append `count` copies of the current tail
    pub(crate) fn grow_tail(&mut self, count: usize) {
        if let Some(&tail) = self.segments.back() {
            for _ in 0..count {
                self.segments.push_back(tail);
            }
        }
    }

    /// Move the head to `cell` without shifting the body
    pub(crate) fn set_head(&mut self, cell: IVec2) {
        if let Some(head) = self.segments.front_mut() {
            head.pos = cell;
        }
    }

    /// Index 0 is the head, the last index the tail, everything else body
    pub(crate) fn retag(&mut self) {
        let last = self.segments.len().saturating_sub(1);
        for (i, seg) in self.segments.iter_mut().enumerate() {
            seg.kind = if i == 0 {
                SegmentKind::Head
            } else if i == last {
                SegmentKind::Tail
            } else {
                SegmentKind::Body
            };
        }
    }
}

/// Food variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Normal,
    Speed,
    Size,
    Shield,
    Teleport,
}

impl FoodKind {
    /// Power-up granted when this food is eaten
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            FoodKind::Normal => None,
            FoodKind::Speed => Some(PowerUpKind::Speed),
            FoodKind::Size => Some(PowerUpKind::Size),
            FoodKind::Shield => Some(PowerUpKind::Shield),
            FoodKind::Teleport => Some(PowerUpKind::Teleport),
        }
    }
}

/// A food item on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub pos: IVec2,
    pub kind: FoodKind,
    /// Point value before the x10 multiplier
    pub value: u32,
    /// Spawn probability this item was drawn with
    pub weight: f64,
}

/// An obstacle; moving ones drift diagonally and bounce off the walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Sub-cell position; collisions use [`Obstacle::cell`]
    pub pos: Vec2,
    pub dir: Vec2,
    /// Cells per tick
    pub speed: f32,
    pub moving: bool,
}

impl Obstacle {
    pub fn stationary(cell: IVec2) -> Self {
        Self {
            pos: cell.as_vec2(),
            dir: Vec2::ZERO,
            speed: 0.0,
            moving: false,
        }
    }

    pub fn moving(cell: IVec2, dir: Vec2, speed: f32) -> Self {
        Self {
            pos: cell.as_vec2(),
            dir,
            speed,
            moving: true,
        }
    }

    /// Grid cell used for collision checks
    pub fn cell(&self) -> IVec2 {
        IVec2::new(self.pos.x.round() as i32, self.pos.y.round() as i32)
    }

    /// Advance one tick, reflecting off the outermost rows and columns
    pub fn advance(&mut self, grid: Grid) {
        if !self.moving {
            return;
        }
        let max = Vec2::new((grid.width() - 1) as f32, (grid.height() - 1) as f32);
        let mut next = self.pos + self.dir * self.speed;

        if next.x <= 0.0 || next.x >= max.x {
            self.dir.x = -self.dir.x;
            next.x = next.x.clamp(0.0, max.x);
        }
        if next.y <= 0.0 || next.y >= max.y {
            self.dir.y = -self.dir.y;
            next.y = next.y.clamp(0.0, max.y);
        }
        self.pos = next;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Speed,
    Shield,
    Teleport,
    /// Instant growth; never stays in the active list
    Size,
}

/// An active timed effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub remaining_ticks: u32,
    pub active: bool,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Terminal until the next `start_session`
    GameOver,
}

/// Per-session counters fed to the stats collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub food_eaten: u32,
    pub power_ups_granted: u32,
    /// Obstacles passed through in ghost mode
    pub ghost_passes: u32,
    /// Food items nudged by the magnet
    pub magnet_pulls: u32,
    /// Points earned from double-points bonuses
    pub crystal_bonus: u64,
    pub auto_teleports: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    /// Balance data; not part of the rendered snapshot
    #[serde(skip)]
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub snake: Snake,
    /// Committed travel direction
    pub direction: Direction,
    /// Buffered input, applied at the start of the next tick
    pending_direction: Option<Direction>,
    pub food: Vec<Food>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    /// Evolution stage index into the tuning ladder
    pub stage: u32,
    pub score: u64,
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Sum of tick intervals played, in ms
    pub elapsed_ms: u64,
    pub phase: GamePhase,
    pub counters: Counters,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// New session with default tuning
    pub fn new(grid: Grid, seed: u64) -> Self {
        Self::with_tuning(grid, seed, Tuning::default())
    }

    pub fn with_tuning(grid: Grid, seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            grid,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            snake: Snake::new(grid.center(), Direction::Right, INITIAL_LENGTH),
            direction: Direction::Right,
            pending_direction: None,
            food: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            stage: 0,
            score: 0,
            level: 1,
            time_ticks: 0,
            elapsed_ms: 0,
            phase: GamePhase::Playing,
            counters: Counters::default(),
            events: Vec::new(),
        };
        state.start_session(grid);
        state
    }

    /// Reset everything except tuning and the RNG stream
    pub fn start_session(&mut self, grid: Grid) {
        self.grid = grid;
        self.snake = Snake::new(grid.center(), Direction::Right, INITIAL_LENGTH);
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.food.clear();
        self.obstacles.clear();
        self.power_ups.clear();
        self.stage = 0;
        self.score = 0;
        self.level = 1;
        self.time_ticks = 0;
        self.elapsed_ms = 0;
        self.phase = GamePhase::Playing;
        self.counters = Counters::default();
        self.events.clear();

        super::spawn::spawn_food(self);
        log::info!(
            "Session started on {}x{} grid (seed {})",
            grid.width(),
            grid.height(),
            self.seed
        );
    }

    /// Buffer a direction for the next tick. Reversals are ignored.
    pub fn set_desired_direction(&mut self, dir: Direction) -> bool {
        if dir.is_reverse_of(self.direction) {
            return false;
        }
        self.pending_direction = Some(dir);
        true
    }

    /// Same as [`Self::set_desired_direction`] for raw input vectors
    pub fn set_desired_vector(&mut self, v: IVec2) -> bool {
        match Direction::from_vector(v) {
            Some(dir) => self.set_desired_direction(dir),
            None => {
                log::debug!("Ignoring malformed direction {:?}", v);
                false
            }
        }
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub(crate) fn take_pending_direction(&mut self) -> Option<Direction> {
        self.pending_direction.take()
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups.iter().any(|p| p.kind == kind && p.active)
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.tuning.ladder.has_ability(self.stage, ability)
    }

    pub fn food_index_at(&self, cell: IVec2) -> Option<usize> {
        self.food.iter().position(|f| f.pos == cell)
    }

    pub fn obstacle_at(&self, cell: IVec2) -> bool {
        self.obstacles.iter().any(|o| o.cell() == cell)
    }

    /// Occupied by snake, food or obstacle
    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.snake.occupies(cell) || self.food_index_at(cell).is_some() || self.obstacle_at(cell)
    }

    /// Effective scheduler interval for the next tick
    pub fn tick_interval_ms(&self) -> u32 {
        effects::tick_interval_ms(self)
    }

    pub fn summary(&self, cause: DeathCause) -> SessionSummary {
        SessionSummary {
            score: self.score,
            stage: self.stage,
            length: self.snake.len(),
            level: self.level,
            elapsed_ticks: self.time_ticks,
            elapsed_ms: self.elapsed_ms,
            food_eaten: self.counters.food_eaten,
            power_ups_granted: self.counters.power_ups_granted,
            cause,
        }
    }
}
