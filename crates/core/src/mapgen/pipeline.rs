//! Single-size map pipeline that composes the generation stages.

use log::debug;

use crate::context::GenContext;
use crate::map::Map;
use crate::settings::Settings;

use super::area::build_area;
use super::corridors::{CorridorRouter, carve_room_graph};
use super::gates::place_gates;
use super::graph::build_room_graph;
use super::partition::partition_blocks;
use super::rooms::pack_rooms;
use super::trunk::route_trunks;
use super::validate::validate_connectivity;

pub(super) fn build_map(
    context: &mut GenContext,
    settings: &Settings,
    width: i32,
    height: i32,
    warnings: &mut Vec<String>,
) -> Map {
    context.begin_map();
    let mut map = build_area(width, height, settings.grid_step);
    map.blocks = partition_blocks(
        context,
        map.width,
        map.height,
        settings.blocks_count,
        settings.block_min_size,
        settings.split_bias,
    );
    debug!("{}x{}: {} blocks", map.width, map.height, map.blocks.len());

    route_trunks(context, &mut map, settings);
    place_gates(context, &mut map, settings);
    pack_rooms(context, &mut map, settings);

    let edges = build_room_graph(context, &map.rooms, settings, map.width * map.height);
    let router = CorridorRouter::new(&map, settings);
    carve_room_graph(&mut map, &router, &edges, settings);

    if settings.validate_connectivity {
        let repair = settings.auto_fix_connectivity.then_some(&router);
        validate_connectivity(&mut map, repair, warnings);
    }
    map
}
