//! Near-minimal spanning graph over rooms plus a bounded set of extra edges.
//! Edges are pairs of indices into `Map::rooms`.

use log::debug;

use crate::context::GenContext;
use crate::map::Room;
use crate::settings::Settings;

pub(super) fn build_room_graph(
    context: &mut GenContext,
    rooms: &[Room],
    settings: &Settings,
    map_area: i32,
) -> Vec<(usize, usize)> {
    if rooms.len() < 2 {
        return Vec::new();
    }
    let max_degree = settings.max_room_degree.max(1) as usize;
    let mut degree = vec![0_usize; rooms.len()];
    let mut edges = spanning_edges(rooms, max_degree, &mut degree);
    let spanning = edges.len();

    let limit = extra_edge_limit(rooms.len(), settings.extra_connection_percent, map_area);
    add_extra_edges(context, rooms, max_degree, limit, &mut degree, &mut edges);
    debug!(
        "room graph: {spanning} spanning + {} extra edges over {} rooms",
        edges.len() - spanning,
        rooms.len()
    );
    edges
}

/// Grows a tree from room 0 by repeatedly taking the closest
/// (connected, unconnected) pair whose endpoints both have degree budget left.
/// The budget check is waived when exactly one room is still unconnected.
fn spanning_edges(rooms: &[Room], max_degree: usize, degree: &mut [usize]) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    let mut connected_room_indices = vec![0_usize];
    let mut pending_room_indices: Vec<usize> = (1..rooms.len()).collect();

    while !pending_room_indices.is_empty() {
        let waive_degree = pending_room_indices.len() == 1;
        let mut best_choice: Option<(u32, usize, usize)> = None;
        for &connected_index in &connected_room_indices {
            let connected_center = rooms[connected_index].rect.center();
            for &pending_index in &pending_room_indices {
                let saturated = degree[connected_index] >= max_degree
                    || degree[pending_index] >= max_degree;
                if !waive_degree && saturated {
                    continue;
                }
                let distance = connected_center.manhattan(rooms[pending_index].rect.center());
                let should_replace = match best_choice {
                    None => true,
                    Some(best) => (distance, connected_index, pending_index) < best,
                };
                if should_replace {
                    best_choice = Some((distance, connected_index, pending_index));
                }
            }
        }

        let Some((_, connected_index, pending_index)) = best_choice else {
            break;
        };
        edges.push((connected_index, pending_index));
        degree[connected_index] += 1;
        degree[pending_index] += 1;
        connected_room_indices.push(pending_index);
        pending_room_indices.retain(|&index| index != pending_index);
    }
    edges
}

fn add_extra_edges(
    context: &mut GenContext,
    rooms: &[Room],
    max_degree: usize,
    limit: usize,
    degree: &mut [usize],
    edges: &mut Vec<(usize, usize)>,
) {
    if limit == 0 {
        return;
    }
    let mut candidates = Vec::new();
    for left in 0..rooms.len() {
        for right in (left + 1)..rooms.len() {
            if edges.iter().any(|&(a, b)| (a, b) == (left, right) || (a, b) == (right, left)) {
                continue;
            }
            let distance = rooms[left].rect.center().manhattan(rooms[right].rect.center());
            candidates.push((distance, context.next_u64(), left, right));
        }
    }
    candidates.sort_unstable();

    let mut added = 0;
    for (_, _, left, right) in candidates {
        if added >= limit {
            break;
        }
        if degree[left] >= max_degree || degree[right] >= max_degree {
            continue;
        }
        edges.push((left, right));
        degree[left] += 1;
        degree[right] += 1;
        added += 1;
    }
}

/// Number of extra edges allowed on top of the spanning structure.
///
/// Small maps (under ten rooms) get none, larger ones are capped at one edge
/// per twenty rooms, and the cap shrinks further as rooms crowd the map.
pub fn extra_edge_limit(room_count: usize, extra_connection_percent: f32, map_area: i32) -> usize {
    let per_twenty = room_count / 20;
    let base_limit = if room_count < 10 { 0 } else { per_twenty.max(1) };
    let percent_limit = (room_count as f32 * extra_connection_percent).floor() as usize;
    let uncapped = if room_count < 10 { base_limit } else { base_limit.max(percent_limit) };
    let capped = per_twenty.max(1).min(uncapped);

    let density_scale = if map_area > 0 {
        (1.0 - 20.0 * room_count as f32 / map_area as f32).clamp(0.15, 1.0)
    } else {
        0.15
    };
    (capped as f32 * density_scale).floor() as usize
}
