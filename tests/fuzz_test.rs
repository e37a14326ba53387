/// Fuzzes the search by checking on many random grids that a path is found exactly when the goal
/// shares a connected component with the start, and that every path found is a shortest one.
use astar_visualizer::{manhattan_distance, path_len, search, CellState, Grid, PathResult, Point};
use rand::prelude::*;
use std::collections::VecDeque;
use std::ops::ControlFlow;

fn random_grid(n: usize, rng: &mut StdRng, density: f64) -> Grid {
    let mut grid = Grid::new(n).unwrap();
    for y in 0..n as i32 {
        for x in 0..n as i32 {
            if rng.gen_bool(density) {
                grid.toggle_barrier(Point::new(x, y)).unwrap();
            }
        }
    }
    grid
}

fn random_grid_point(grid: &Grid, rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(0..grid.size()) as i32,
        rng.gen_range(0..grid.size()) as i32,
    )
}

/// Breadth-first reference distance, independent of the A* bookkeeping.
fn bfs_distance(grid: &Grid, start: Point, goal: Point) -> Option<usize> {
    let n = grid.size();
    let mut dist = vec![usize::MAX; n * n];
    let ix = |p: &Point| p.y as usize * n + p.x as usize;
    let mut queue = VecDeque::from([start]);
    dist[ix(&start)] = 0;
    while let Some(current) = queue.pop_front() {
        if current == goal {
            return Some(dist[ix(&current)]);
        }
        for next in grid.neighbors_of(&current) {
            if dist[ix(&next)] == usize::MAX {
                dist[ix(&next)] = dist[ix(&current)] + 1;
                queue.push_back(next);
            }
        }
    }
    None
}

fn run(grid: &mut Grid, start: Point, goal: Point) -> PathResult {
    search(grid, start, goal, |_| ControlFlow::Continue(()))
        .unwrap()
        .result
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng, 0.35);
        grid.reset_cell(start).unwrap();
        grid.reset_cell(end).unwrap();
        grid.update();
        let reachable = grid.reachable(&start, &end);
        let expected = bfs_distance(&grid, start, end);
        let result = run(&mut grid, start, end);
        // Show the grid if the outcome disagrees with the components
        if result.is_found() != reachable {
            println!("{grid}");
        }
        assert_eq!(result.is_found(), reachable);
        match result {
            PathResult::Found(path) => {
                assert_eq!(path[0], start);
                assert_eq!(*path.last().unwrap(), end);
                assert!(grid.is_valid_path(&path));
                assert_eq!(Some(path_len(&path)), expected);
            }
            _ => assert_eq!(expected, None),
        }
    }
}

#[test]
fn open_grids_give_manhattan_paths() {
    const N: usize = 12;
    let mut rng = StdRng::seed_from_u64(1);
    let mut grid = Grid::new(N).unwrap();
    for _ in 0..500 {
        let start = random_grid_point(&grid, &mut rng);
        let goal = random_grid_point(&grid, &mut rng);
        if start == goal {
            continue;
        }
        grid.clear_search_marks();
        let result = run(&mut grid, start, goal);
        let path = result.path().unwrap();
        assert_eq!(path_len(path) as i32, manhattan_distance(&start, &goal));
    }
}

#[test]
fn reruns_are_identical() {
    const N: usize = 15;
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..200 {
        let mut grid = random_grid(N, &mut rng, 0.25);
        let start = random_grid_point(&grid, &mut rng);
        let goal = random_grid_point(&grid, &mut rng);
        if start == goal {
            continue;
        }
        grid.reset_cell(start).unwrap();
        grid.reset_cell(goal).unwrap();
        let first = run(&mut grid, start, goal);
        let first_states: Vec<CellState> = grid.cells().map(|c| c.state()).collect();
        grid.clear_search_marks();
        let second = run(&mut grid, start, goal);
        let second_states: Vec<CellState> = grid.cells().map(|c| c.state()).collect();
        assert_eq!(first, second);
        assert_eq!(first_states, second_states);
    }
}
