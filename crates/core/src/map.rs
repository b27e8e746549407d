//! Generated map model: the cell grid plus the entities laid out on it.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{BlockId, CellType, Direction, GateKind, Point, Rect, RoomId, RoomKind};

/// Flat row-major cell storage with bounds-checked access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
}

impl CellGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![CellType::Empty; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    pub fn index(&self, point: Point) -> Option<usize> {
        self.in_bounds(point).then(|| (point.y as usize) * self.width + (point.x as usize))
    }

    pub fn get(&self, point: Point) -> Option<CellType> {
        self.index(point).map(|index| self.cells[index])
    }

    /// Writes `cell` at `point`; out-of-range writes are ignored.
    pub fn set(&mut self, point: Point, cell: CellType) {
        if let Some(index) = self.index(point) {
            self.cells[index] = cell;
        }
    }

    pub fn is(&self, point: Point, cell: CellType) -> bool {
        self.get(point) == Some(cell)
    }

    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&candidate| candidate == cell).count()
    }

    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Block {
    pub id: BlockId,
    pub rect: Rect,
    pub gates: Vec<usize>,
    pub rooms: Vec<RoomId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub uid: String,
    pub rect: Rect,
    pub kind: RoomKind,
    pub block: BlockId,
    pub doors: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Gate {
    pub block: BlockId,
    pub pos: Point,
    pub kind: GateKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Door {
    pub room: RoomId,
    pub block: BlockId,
    pub pos: Point,
    pub facing: Direction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Corridor {
    pub points: Vec<Point>,
    pub width: i32,
    pub is_tech: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    pub grid_step: f32,
    pub cells: CellGrid,
    pub blocks: Vec<Block>,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub gates: Vec<Gate>,
    pub doors: Vec<Door>,
    pub entrance: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub width: i32,
    pub height: i32,
    pub blocks: usize,
    pub rooms: usize,
    pub tech_rooms: usize,
    pub corridors: usize,
    pub gates: usize,
    pub doors: usize,
    pub floor_cells: usize,
    pub corridor_cells: usize,
    pub door_cells: usize,
}

impl Map {
    pub fn cell(&self, point: Point) -> Option<CellType> {
        self.cells.get(point)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        self.cells.in_bounds(point)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn room_at(&self, point: Point) -> Option<&Room> {
        self.rooms.iter().find(|room| room.rect.contains(point))
    }

    /// Fraction of cells that are floor, corridor or door.
    pub fn occupancy(&self) -> f32 {
        let area = self.cells.cells().len();
        if area == 0 {
            return 0.0;
        }
        let occupied = self
            .cells
            .cells()
            .iter()
            .filter(|cell| matches!(cell, CellType::Floor | CellType::Corridor | CellType::Door))
            .count();
        occupied as f32 / area as f32
    }

    pub fn summary(&self) -> MapSummary {
        MapSummary {
            width: self.width,
            height: self.height,
            blocks: self.blocks.len(),
            rooms: self.rooms.len(),
            tech_rooms: self.rooms.iter().filter(|room| room.kind == RoomKind::TechRoom).count(),
            corridors: self.corridors.len(),
            gates: self.gates.len(),
            doors: self.doors.len(),
            floor_cells: self.cells.count(CellType::Floor),
            corridor_cells: self.cells.count(CellType::Corridor),
            door_cells: self.cells.count(CellType::Door),
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.grid_step.to_le_bytes());
        for cell in self.cells.cells() {
            bytes.push(match cell {
                CellType::Empty => 0,
                CellType::Wall => 1,
                CellType::Floor => 2,
                CellType::Corridor => 3,
                CellType::Door => 4,
                CellType::Gate => 5,
            });
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.id.0.to_le_bytes());
            bytes.extend(room.uid.as_bytes());
            for value in [room.rect.x, room.rect.y, room.rect.width, room.rect.height] {
                bytes.extend(value.to_le_bytes());
            }
            bytes.push(u8::from(room.kind == RoomKind::TechRoom));
        }

        bytes.extend((self.doors.len() as u32).to_le_bytes());
        for door in &self.doors {
            bytes.extend(door.room.0.to_le_bytes());
            bytes.extend(door.pos.x.to_le_bytes());
            bytes.extend(door.pos.y.to_le_bytes());
            bytes.push(door.facing as u8);
        }

        bytes.extend((self.corridors.len() as u32).to_le_bytes());
        for corridor in &self.corridors {
            bytes.extend((corridor.points.len() as u32).to_le_bytes());
            for point in &corridor.points {
                bytes.extend(point.x.to_le_bytes());
                bytes.extend(point.y.to_le_bytes());
            }
            bytes.extend(corridor.width.to_le_bytes());
            bytes.push(u8::from(corridor.is_tech));
        }

        bytes.extend((self.gates.len() as u32).to_le_bytes());
        for gate in &self.gates {
            bytes.extend(gate.pos.x.to_le_bytes());
            bytes.extend(gate.pos.y.to_le_bytes());
        }
        bytes.extend(self.entrance.x.to_le_bytes());
        bytes.extend(self.entrance.y.to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Text dump of the grid, one line per row, with the entrance marked `@`.
    pub fn to_ascii(&self) -> String {
        let mut text = String::with_capacity(self.cells.cells().len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point { x, y };
                if point == self.entrance {
                    text.push('@');
                } else {
                    text.push(self.cell(point).map_or(' ', CellType::glyph));
                }
            }
            text.push('\n');
        }
        text
    }
}
