//! Tests for maze generation and cell access.

use maze_duel::{CellState, Direction, MatchError, Maze, MazeLayout, Position};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn border_cells(maze: &Maze) -> Vec<Position> {
    let (w, h) = (maze.width() as i32, maze.height() as i32);
    let mut cells = Vec::new();
    for x in 0..w {
        cells.push(Position::new(x, 0));
        cells.push(Position::new(x, h - 1));
    }
    for y in 0..h {
        cells.push(Position::new(0, y));
        cells.push(Position::new(w - 1, y));
    }
    cells
}

#[test]
fn test_open_maze_has_wall_border() {
    let maze = Maze::open(5, 5);
    assert_eq!(maze.count(CellState::Wall), 16);
    assert_eq!(maze.count(CellState::Empty), 9);
    assert_eq!(maze.cell_at(Position::new(0, 0)).unwrap(), CellState::Wall);
    assert_eq!(maze.cell_at(Position::new(2, 2)).unwrap(), CellState::Empty);
}

#[test]
fn test_generated_border_is_walled_and_start_cells_empty() {
    for seed in 0..25 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = Maze::generate(12, 9, 0.9, MazeLayout::Random, &mut rng);

        for cell in border_cells(&maze) {
            assert_eq!(maze.cell_at(cell).unwrap(), CellState::Wall, "seed {seed} at {cell}");
        }
        let (a, b) = maze.start_cells();
        assert_eq!(a, Position::new(1, 1));
        assert_eq!(b, Position::new(10, 7));
        assert_eq!(maze.cell_at(a).unwrap(), CellState::Empty);
        assert_eq!(maze.cell_at(b).unwrap(), CellState::Empty);
    }
}

#[test]
fn test_generation_at_size_extremes() {
    for (width, height) in [(5, 5), (30, 30), (5, 30), (30, 5)] {
        for layout in [MazeLayout::Random, MazeLayout::Connected] {
            let mut rng = ChaCha8Rng::seed_from_u64(17);
            let maze = Maze::generate(width, height, 0.9, layout, &mut rng);
            assert_eq!((maze.width(), maze.height()), (width, height));
            assert_eq!(maze.snapshot().grid().len(), height);

            for cell in border_cells(&maze) {
                assert_eq!(maze.cell_at(cell).unwrap(), CellState::Wall, "{width}x{height}");
            }
            let (a, b) = maze.start_cells();
            assert_eq!(b, Position::new(width as i32 - 2, height as i32 - 2));
            assert_eq!(maze.cell_at(a).unwrap(), CellState::Empty);
            assert_eq!(maze.cell_at(b).unwrap(), CellState::Empty);
            if layout == MazeLayout::Connected {
                assert!(maze.path_exists(a, b), "{width}x{height} left start cells apart");
            }
        }
    }
}

#[test]
fn test_generation_never_produces_occupied_cells() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let maze = Maze::generate(20, 20, 0.5, MazeLayout::Random, &mut rng);
    assert_eq!(maze.count(CellState::Occupied), 0);
}

#[test]
fn test_zero_probability_yields_open_maze() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let maze = Maze::generate(8, 6, 0.0, MazeLayout::Random, &mut rng);
    assert_eq!(maze, Maze::open(8, 6));
}

#[test]
fn test_generation_is_deterministic_for_a_seed() {
    let roll = |seed| {
        Maze::generate(15, 15, 0.3, MazeLayout::Random, &mut ChaCha8Rng::seed_from_u64(seed))
    };
    let first = roll(99);
    let second = roll(99);
    assert_eq!(first, second);
}

#[test]
fn test_connected_layout_joins_start_cells() {
    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = Maze::generate(14, 11, 0.95, MazeLayout::Connected, &mut rng);
        let (a, b) = maze.start_cells();
        assert!(maze.path_exists(a, b), "seed {seed} left start cells apart");
    }
}

#[test]
fn test_full_walls_random_layout_is_disconnected() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let maze = Maze::generate(9, 9, 1.0, MazeLayout::Random, &mut rng);
    let (a, b) = maze.start_cells();
    assert!(!maze.path_exists(a, b));
}

#[test]
fn test_cell_at_out_of_bounds_is_an_error() {
    let maze = Maze::open(5, 5);
    let err = maze.cell_at(Position::new(-1, 2)).unwrap_err();
    assert!(matches!(err, MatchError::OutOfBounds { width: 5, height: 5, .. }));
    assert!(maze.cell_at(Position::new(5, 0)).is_err());
    assert!(maze.cell_at(Position::new(0, 5)).is_err());
}

#[test]
fn test_set_cell_overwrites_and_rejects_out_of_bounds() {
    let mut maze = Maze::open(5, 5);
    maze.set_cell(Position::new(2, 2), CellState::Wall).unwrap();
    assert_eq!(maze.cell_at(Position::new(2, 2)).unwrap(), CellState::Wall);
    maze.set_cell(Position::new(0, 0), CellState::Empty).unwrap();
    assert_eq!(maze.cell_at(Position::new(0, 0)).unwrap(), CellState::Empty);
    assert!(maze.set_cell(Position::new(7, 1), CellState::Empty).is_err());
}

#[test]
fn test_is_passable() {
    let mut maze = Maze::open(5, 5);
    maze.set_cell(Position::new(3, 3), CellState::Occupied).unwrap();
    assert!(maze.is_passable(Position::new(1, 1)));
    assert!(!maze.is_passable(Position::new(0, 1)));
    assert!(!maze.is_passable(Position::new(3, 3)));
    assert!(!maze.is_passable(Position::new(-1, 1)));
}

#[test]
fn test_neighbor_is_not_clamped() {
    let maze = Maze::open(5, 5);
    assert_eq!(
        maze.neighbor_in_direction(Position::new(0, 0), Direction::North),
        Position::new(0, -1)
    );
    assert_eq!(
        maze.neighbor_in_direction(Position::new(2, 2), Direction::East),
        Position::new(3, 2)
    );
}

#[test]
fn test_path_exists_respects_walls() {
    let mut maze = Maze::open(7, 5);
    for y in 1..=3 {
        maze.set_cell(Position::new(3, y), CellState::Wall).unwrap();
    }
    let (a, b) = maze.start_cells();
    assert!(!maze.path_exists(a, b));

    maze.set_cell(Position::new(3, 2), CellState::Empty).unwrap();
    assert!(maze.path_exists(a, b));
}

#[test]
fn test_snapshot_and_render() {
    let mut maze = Maze::open(5, 5);
    maze.set_cell(Position::new(2, 2), CellState::Wall).unwrap();
    let snapshot = maze.snapshot();
    assert_eq!(*snapshot.width(), 5);
    assert_eq!(snapshot.grid().len(), 5);
    assert_eq!(snapshot.cell(Position::new(2, 2)), Some(CellState::Wall));
    assert_eq!(snapshot.cell(Position::new(9, 2)), None);
    assert_eq!(snapshot.render(), "#####\n#...#\n#.#.#\n#...#\n#####");
}
