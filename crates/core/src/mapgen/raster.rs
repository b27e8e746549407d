//! Polyline rasterization shared by the trunk and corridor carving.

use crate::types::Point;

/// Cells of an axis-aligned segment, both ends inclusive. Diagonal input walks
/// the horizontal leg first.
pub(super) fn segment_cells(from: Point, to: Point) -> Vec<Point> {
    let mut cells = Vec::new();
    let step_x = (to.x - from.x).signum();
    let mut x = from.x;
    while x != to.x {
        cells.push(Point { x, y: from.y });
        x += step_x;
    }
    let step_y = (to.y - from.y).signum();
    let mut y = from.y;
    while y != to.y {
        cells.push(Point { x: to.x, y });
        y += step_y;
    }
    cells.push(to);
    cells
}

pub(super) fn polyline_cells(points: &[Point]) -> Vec<Point> {
    let mut cells: Vec<Point> = Vec::new();
    for pair in points.windows(2) {
        for cell in segment_cells(pair[0], pair[1]) {
            if cells.last() != Some(&cell) {
                cells.push(cell);
            }
        }
    }
    if cells.is_empty() {
        cells.extend(points.first().copied());
    }
    cells
}

/// Half-extent of the square stamped around each path cell.
pub(super) fn radius_for_width(width: i32) -> i32 {
    ((width - 1) / 2).max(0)
}

pub(super) fn square(center: Point, radius: i32) -> impl Iterator<Item = Point> {
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius).map(move |dx| Point { x: center.x + dx, y: center.y + dy })
    })
}

/// Reduces a cell path to its endpoints and turning points.
pub(super) fn simplify(path: &[Point]) -> Vec<Point> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut points = vec![path[0]];
    for window in path.windows(3) {
        let (a, b, c) = (window[0], window[1], window[2]);
        let collinear = (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y);
        if !collinear {
            points.push(b);
        }
    }
    points.extend(path.last().copied());
    points
}
