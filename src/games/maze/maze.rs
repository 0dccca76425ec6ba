//! Grid maze: generation, cell queries, and adjacency.

use super::snapshot::MazeSnapshot;
use super::types::{CellState, Direction, MazeLayout, Position};
use crate::error::MatchError;
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Smallest accepted side length.
pub const MIN_SIDE: usize = 5;

/// Largest accepted side length.
pub const MAX_SIDE: usize = 30;

/// Chance that an interior cell becomes a wall.
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.3;

/// Re-rolls attempted by [`MazeLayout::Connected`] before carving a corridor.
const CONNECT_ATTEMPTS: usize = 32;

/// Rectangular grid of cells, stored row-major.
///
/// Border cells are walls after construction. Nothing here keeps that true
/// afterwards: [`Maze::set_cell`] is an unconditional overwrite and the match
/// rules own every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Maze {
    /// Builds a maze with a walled border and an empty interior.
    pub fn open(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                cells.push(if border { CellState::Wall } else { CellState::Empty });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Generates a randomized maze.
    ///
    /// Each interior cell becomes a wall with `wall_probability`; both start
    /// cells are always left empty. With [`MazeLayout::Connected`] the layout
    /// is re-rolled, and finally carved, until the start cells are joined.
    #[instrument(skip(rng))]
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        wall_probability: f64,
        layout: MazeLayout,
        rng: &mut R,
    ) -> Self {
        let mut maze = Self::roll(width, height, wall_probability, rng);

        if layout == MazeLayout::Connected {
            let (a, b) = maze.start_cells();
            let mut attempts = 1;
            while !maze.path_exists(a, b) && attempts < CONNECT_ATTEMPTS {
                maze = Self::roll(width, height, wall_probability, rng);
                attempts += 1;
            }
            if !maze.path_exists(a, b) {
                debug!(attempts, "No connected layout rolled, carving corridor");
                maze.carve_corridor(a, b);
            }
        }

        debug!(
            walls = maze.count(CellState::Wall),
            empty = maze.count(CellState::Empty),
            "Maze generated"
        );
        maze
    }

    fn roll<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        wall_probability: f64,
        rng: &mut R,
    ) -> Self {
        let probability = if wall_probability.is_nan() {
            0.0
        } else {
            wall_probability.clamp(0.0, 1.0)
        };

        let mut maze = Self::open(width, height);
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                if rng.gen_bool(probability) {
                    maze.cells[y * width + x] = CellState::Wall;
                }
            }
        }

        let (a, b) = maze.start_cells();
        for start in [a, b] {
            if let Some(index) = maze.index(start) {
                maze.cells[index] = CellState::Empty;
            }
        }
        maze
    }

    /// Opens an L-shaped corridor from `from` to `to`, horizontal leg first.
    fn carve_corridor(&mut self, from: Position, to: Position) {
        let mut cursor = from;
        let clear = |maze: &mut Self, at: Position| {
            if let Some(index) = maze.index(at)
                && maze.cells[index] == CellState::Wall
            {
                maze.cells[index] = CellState::Empty;
            }
        };

        clear(self, cursor);
        while cursor.x != to.x {
            cursor.x += (to.x - cursor.x).signum();
            clear(self, cursor);
        }
        while cursor.y != to.y {
            cursor.y += (to.y - cursor.y).signum();
            clear(self, cursor);
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The two designated start cells: top-left and bottom-right interior.
    pub fn start_cells(&self) -> (Position, Position) {
        let far_x = i32::try_from(self.width).unwrap_or(i32::MAX) - 2;
        let far_y = i32::try_from(self.height).unwrap_or(i32::MAX) - 2;
        (Position::new(1, 1), Position::new(far_x, far_y))
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn out_of_bounds(&self, position: Position) -> MatchError {
        MatchError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        }
    }

    /// Whether `position` lies inside the grid.
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Whether `position` lies on the outer ring of the grid.
    pub fn is_border(&self, position: Position) -> bool {
        self.contains(position)
            && (position.x == 0
                || position.y == 0
                || position.x as usize + 1 == self.width
                || position.y as usize + 1 == self.height)
    }

    /// Returns the state of the cell at `position`.
    pub fn cell_at(&self, position: Position) -> Result<CellState, MatchError> {
        self.index(position)
            .map(|index| self.cells[index])
            .ok_or_else(|| self.out_of_bounds(position))
    }

    /// Overwrites the cell at `position`.
    pub fn set_cell(&mut self, position: Position, state: CellState) -> Result<(), MatchError> {
        let index = self
            .index(position)
            .ok_or_else(|| self.out_of_bounds(position))?;
        self.cells[index] = state;
        Ok(())
    }

    /// True iff `position` is inside the grid and empty.
    pub fn is_passable(&self, position: Position) -> bool {
        matches!(self.cell_at(position), Ok(CellState::Empty))
    }

    /// Coordinate one step from `position`. Not clamped or validated.
    pub fn neighbor_in_direction(&self, position: Position, direction: Direction) -> Position {
        position.step(direction)
    }

    /// Number of cells in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Breadth-first search over empty cells from `from` to `to`.
    ///
    /// The endpoints themselves may be in any state, so occupied start
    /// cells still count as connected.
    pub fn path_exists(&self, from: Position, to: Position) -> bool {
        let (Some(start), Some(goal)) = (self.index(from), self.index(to)) else {
            return false;
        };
        if start == goal {
            return true;
        }

        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for direction in Direction::ALL {
                let next = current.step(direction);
                let Some(index) = self.index(next) else {
                    continue;
                };
                if index == goal {
                    return true;
                }
                if visited[index] || self.cells[index] != CellState::Empty {
                    continue;
                }
                visited[index] = true;
                queue.push_back(next);
            }
        }
        false
    }

    /// Copies the grid into a serializable snapshot.
    pub fn snapshot(&self) -> MazeSnapshot {
        let grid = self
            .cells
            .chunks(self.width.max(1))
            .map(<[CellState]>::to_vec)
            .collect();
        MazeSnapshot::new(self.width, self.height, grid)
    }
}
