//! Exit-to-exit routing: straight/L-shaped first, turn-aware A* as fallback.

use std::collections::{BTreeMap, BTreeSet};

use crate::map::Map;
use crate::types::{CellType, Direction, Point};

use super::super::raster::segment_cells;
use super::carve::has_clearance;
use super::{Approach, CorridorRouter};

const STEP_COST: u32 = 10;
const TURN_COST: u32 = 2;
const REUSE_BONUS: u32 = 2;
const NO_HEADING: u8 = 4;
/// Cells a route may spend beyond twice the exit-to-exit distance.
const DETOUR_SLACK: u32 = 48;

pub(super) struct Walkability<'a> {
    pub(super) map: &'a Map,
    pub(super) router: &'a CorridorRouter,
    pub(super) approach: &'a Approach,
    /// Also require room for the whole corridor footprint around each cell.
    pub(super) clearance: bool,
}

impl Walkability<'_> {
    /// Empty, corridor and gate cells outside every room buffer. Door approach
    /// lanes may cross buffers.
    pub(super) fn allows(&self, point: Point) -> bool {
        if !matches!(
            self.map.cell(point),
            Some(CellType::Empty | CellType::Corridor | CellType::Gate)
        ) {
            return false;
        }
        if self.router.in_route_buffer(self.map, point) && !self.approach.is_lane(point) {
            return false;
        }
        !self.clearance || has_clearance(self.map, self.router, self.approach, point)
    }
}

pub(super) fn route_between(
    walk: &Walkability<'_>,
    start: Point,
    goal: Point,
) -> Option<Vec<Point>> {
    if !walk.allows(start) || !walk.allows(goal) {
        return None;
    }
    l_route(walk, start, goal).or_else(|| astar_route(walk, start, goal))
}

/// Tries the two single-bend routes, pivoting at (start.x, goal.y) first.
fn l_route(walk: &Walkability<'_>, start: Point, goal: Point) -> Option<Vec<Point>> {
    for pivot in [Point { x: start.x, y: goal.y }, Point { x: goal.x, y: start.y }] {
        let mut path = segment_cells(start, pivot);
        path.extend(segment_cells(pivot, goal).into_iter().skip(1));
        if path.iter().all(|&cell| walk.allows(cell)) {
            return Some(path);
        }
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
    heading: u8,
}

type State = (Point, u8);

/// 4-connected A* whose step cost rises on turns and falls when reusing an
/// existing corridor. Gives up on routes longer than twice the direct
/// distance plus a fixed detour. Returns the full path including both endpoints.
pub(super) fn astar_route(
    walk: &Walkability<'_>,
    start: Point,
    goal: Point,
) -> Option<Vec<Point>> {
    if !walk.allows(start) || !walk.allows(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let limit = heuristic(start, goal) * 2 + DETOUR_SLACK * STEP_COST;
    let mut g_score: BTreeMap<State, u32> = BTreeMap::new();
    let mut came_from: BTreeMap<State, State> = BTreeMap::new();
    let mut open_set = BTreeSet::new();

    g_score.insert((start, NO_HEADING), 0);
    let h = heuristic(start, goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x, heading: NO_HEADING });

    while let Some(current) = open_set.pop_first() {
        let point = Point { x: current.x, y: current.y };
        let state = (point, current.heading);
        let current_g = g_score.get(&state).copied().unwrap_or(u32::MAX);
        if current.f > current_g.saturating_add(current.h) {
            continue;
        }
        if point == goal {
            return Some(reconstruct_path(&came_from, state));
        }

        for direction in Direction::ALL {
            let next = point.step(direction);
            if !walk.allows(next) {
                continue;
            }
            let heading = direction as u8;
            let mut cost = STEP_COST;
            if current.heading != NO_HEADING && current.heading != heading {
                cost += TURN_COST;
            }
            if walk.map.cell(next) == Some(CellType::Corridor) {
                cost -= REUSE_BONUS;
            }
            let tentative = current_g + cost;
            let h = heuristic(next, goal);
            if tentative + h > limit {
                continue;
            }
            let next_state = (next, heading);
            if tentative < g_score.get(&next_state).copied().unwrap_or(u32::MAX) {
                g_score.insert(next_state, tentative);
                came_from.insert(next_state, state);
                open_set.insert(OpenNode { f: tentative + h, h, y: next.y, x: next.x, heading });
            }
        }
    }
    None
}

fn heuristic(from: Point, to: Point) -> u32 {
    from.manhattan(to) * STEP_COST
}

fn reconstruct_path(came_from: &BTreeMap<State, State>, goal: State) -> Vec<Point> {
    let mut path = vec![goal.0];
    let mut state = goal;
    while let Some(&previous) = came_from.get(&state) {
        path.push(previous.0);
        state = previous;
    }
    path.reverse();
    path
}
