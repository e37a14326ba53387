use astar_visualizer::{path_len, search_grid, Grid, PathResult, Point};
use std::ops::ControlFlow;

// A path is found on a 5x5 grid with shape
//  _____
// |S.#.G|
// |..#..|
// |..#..|
// |..#..|
// |.....|
//  _____
// where
// - # marks a barrier
// - S marks the start
// - G marks the goal
//
// Nodes have a 4-neighborhood; the wall forces a detour through the bottom row.

fn main() -> Result<(), astar_visualizer::Error> {
    let mut grid = Grid::new(5)?;
    for row in 0..4 {
        grid.toggle_barrier(Point::new(2, row))?;
    }
    grid.set_start(Point::new(0, 0))?;
    grid.set_goal(Point::new(4, 0))?;
    println!("{}", grid);
    let mut step = 0;
    let report = search_grid(&mut grid, |g| {
        step += 1;
        println!("Step {step}:\n{g}");
        ControlFlow::Continue(())
    })?;
    match report.result {
        PathResult::Found(path) => {
            println!("Path of length {}:", path_len(&path));
            for p in path {
                println!("{:?}", p);
            }
        }
        PathResult::NotFound => println!("No path"),
        PathResult::Cancelled => println!("Cancelled"),
    }
    println!("\n{}", grid);
    Ok(())
}
