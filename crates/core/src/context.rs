//! Per-run generation context: the single seeded random stream plus the
//! id counters every stage draws from.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_128;

use crate::types::RoomId;

pub struct GenContext {
    seed: u64,
    rng: ChaCha8Rng,
    next_room_id: u32,
    next_uid: u64,
}

impl GenContext {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: ChaCha8Rng::seed_from_u64(seed), next_room_id: 0, next_uid: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts room numbering for a fresh map; the random stream keeps going.
    pub fn begin_map(&mut self) {
        self.next_room_id = 0;
    }

    pub fn next_room_id(&mut self) -> RoomId {
        let id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        id
    }

    /// 32 hex digits, unique within the run and stable for a given seed.
    pub fn next_uid(&mut self) -> String {
        let mut material = [0_u8; 16];
        material[..8].copy_from_slice(&self.seed.to_le_bytes());
        material[8..].copy_from_slice(&self.next_uid.to_le_bytes());
        self.next_uid += 1;
        format!("{:032x}", xxh3_128(&material))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform integer in `[min, max]`; returns `min` when the range is empty.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        min + (self.next_u64() % span) as i32
    }

    /// Uniform index in `[0, n)`; `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        (self.next_u64() % n as u64) as usize
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit_f32(&mut self) -> f32 {
        ((self.next_u64() >> 40) as f32) / ((1_u64 << 24) as f32)
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit_f32() < probability
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_with = self.below(index + 1);
            items.swap(index, swap_with);
        }
    }
}
