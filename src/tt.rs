//! Transposition table keyed by Zobrist hashes.
//!
//! Entries are stored lock-free as pairs of atomic u64s: the packed data
//! and the key XORed with that data. A probe accepts a slot only when the
//! XOR recombines to the full probe key, so torn writes from concurrent
//! stores are discarded instead of returned.
//!
//! The table never assumes it is populated: every probe may miss.

use std::mem;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::board::Move;

/// Default table size in megabytes.
pub const DEFAULT_TT_MB: usize = 16;

/// How a stored value relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The value is exact.
    Exact,
    /// The true value is at least the stored value.
    Lower,
    /// The true value is at most the stored value.
    Upper,
}

impl Bound {
    fn to_u8(self) -> u8 {
        match self {
            Bound::Exact => 0,
            Bound::Lower => 1,
            Bound::Upper => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v & 0x3 {
            0 => Bound::Exact,
            1 => Bound::Lower,
            _ => Bound::Upper,
        }
    }
}

/// Unpacked entry returned by a successful probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    /// Upper 32 bits of the position key.
    pub key32: u32,
    pub depth: u8,
    pub value: i16,
    pub bound: Bound,
    pub best_move: Option<Move>,
    pub generation: u8,
}

/// Packed entry format (fits in 64 bits):
/// - bits 0-15:  move (u16, 0 = no move)
/// - bits 16-31: value (i16 as u16)
/// - bits 32-39: depth (u8)
/// - bits 40-47: bound (2 bits) + generation (6 bits)
/// - bit  48:    occupied marker, so an all-zero entry is still storable
const OCCUPIED: u64 = 1 << 48;
const GENERATION_MASK: u8 = 0x3F;

fn pack_entry(depth: u8, value: i16, bound: Bound, best_move: Option<Move>, generation: u8) -> u64 {
    let mv = u64::from(best_move.map_or(0, Move::as_u16));
    let bound_gen = (bound.to_u8() & 0x3) | ((generation & GENERATION_MASK) << 2);

    mv | (u64::from(value as u16) << 16)
        | (u64::from(depth) << 32)
        | (u64::from(bound_gen) << 40)
        | OCCUPIED
}

fn unpack_entry(key: u64, data: u64) -> TTEntry {
    let mv_bits = (data & 0xFFFF) as u16;
    let bound_gen = ((data >> 40) & 0xFF) as u8;

    TTEntry {
        key32: (key >> 32) as u32,
        depth: ((data >> 32) & 0xFF) as u8,
        value: ((data >> 16) & 0xFFFF) as u16 as i16,
        bound: Bound::from_u8(bound_gen),
        best_move: (mv_bits != 0).then(|| Move::from_u16(mv_bits)),
        generation: (bound_gen >> 2) & GENERATION_MASK,
    }
}

/// A single slot. Holds `key ^ data` and `data`.
#[repr(C)]
struct TTSlot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TTSlot {
    fn new() -> Self {
        TTSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, key: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(key ^ packed, Ordering::Relaxed);
    }

    fn probe(&self, key: u64) -> Option<TTEntry> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (data != 0 && key_xor ^ data == key).then(|| unpack_entry(key, data))
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn generation(&self) -> u8 {
        let data = self.data.load(Ordering::Relaxed);
        (((data >> 40) & 0xFF) as u8 >> 2) & GENERATION_MASK
    }

    fn depth(&self) -> u8 {
        ((self.data.load(Ordering::Relaxed) >> 32) & 0xFF) as u8
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

const BUCKET_SIZE: usize = 4;

#[repr(C)]
struct TTBucket {
    slots: [TTSlot; BUCKET_SIZE],
}

impl TTBucket {
    fn new() -> Self {
        TTBucket {
            slots: [TTSlot::new(), TTSlot::new(), TTSlot::new(), TTSlot::new()],
        }
    }
}

fn allocate(size_mb: usize) -> Vec<TTBucket> {
    let bucket_size = mem::size_of::<TTBucket>();
    let mut num_buckets = (size_mb * 1024 * 1024) / bucket_size;

    // Power of two for mask indexing
    num_buckets = num_buckets.next_power_of_two() / 2;
    if num_buckets == 0 {
        num_buckets = 1024;
    }
    debug_log!(
        "allocating transposition table: {} MB, {} buckets",
        size_mb,
        num_buckets
    );
    (0..num_buckets).map(|_| TTBucket::new()).collect()
}

/// Fixed-size bucketed hash table, shareable between threads by reference.
pub struct TranspositionTable {
    buckets: Vec<TTBucket>,
    mask: usize,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let buckets = allocate(size_mb);
        let mask = buckets.len() - 1;
        TranspositionTable {
            buckets,
            mask,
            generation: AtomicU8::new(0),
        }
    }

    /// Reallocate to `size_mb` megabytes, dropping every entry.
    pub fn resize(&mut self, size_mb: usize) {
        self.buckets = allocate(size_mb);
        self.mask = self.buckets.len() - 1;
        self.generation.store(0, Ordering::Relaxed);
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Current generation, mixed into every store.
    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed) & GENERATION_MASK
    }

    /// Advance the generation so older entries become preferred victims.
    pub fn new_generation(&self) -> u8 {
        self.generation.fetch_add(1, Ordering::Relaxed).wrapping_add(1) & GENERATION_MASK
    }

    /// Look up `key`. A hit is a slot whose full key matches.
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.buckets[self.index(key)]
            .slots
            .iter()
            .find_map(|slot| slot.probe(key))
    }

    /// Store an entry.
    ///
    /// Replacement prefers, in order: an empty slot, the slot already
    /// holding `key`, then the slot with the lowest `depth * 2 - age`.
    pub fn store(
        &self,
        key: u64,
        value: i32,
        bound: Bound,
        depth: u32,
        best_move: Option<Move>,
        generation: u8,
    ) {
        let depth = depth.min(u32::from(u8::MAX)) as u8;
        let value = value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let generation = generation & GENERATION_MASK;
        let packed = pack_entry(depth, value, bound, best_move, generation);
        let bucket = &self.buckets[self.index(key)];

        for slot in &bucket.slots {
            if slot.is_empty() || slot.probe(key).is_some() {
                slot.store(key, packed);
                return;
            }
        }

        let victim = bucket
            .slots
            .iter()
            .min_by_key(|slot| {
                let age = generation.wrapping_sub(slot.generation()) & GENERATION_MASK;
                i32::from(slot.depth()) * 2 - i32::from(age)
            })
            .unwrap_or(&bucket.slots[0]);
        victim.store(key, packed);
    }

    /// Table fullness in per mille (0-1000), sampled over the first 1000 buckets.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample_size = self.buckets.len().min(1000);
        let occupied = self
            .buckets
            .iter()
            .take(sample_size)
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| !slot.is_empty())
            .count();

        ((occupied * 1000) / (sample_size * BUCKET_SIZE)) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.clear();
            }
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{MoveType, Square};

    #[test]
    fn test_pack_unpack_preserves_fields() {
        let mv = Move::special(Square::E1, Square::G1, MoveType::Castling);
        let key = 0xDEAD_BEEF_0000_0001;
        let entry = unpack_entry(key, pack_entry(12, -300, Bound::Lower, Some(mv), 63));
        assert_eq!(entry.key32, 0xDEAD_BEEF);
        assert_eq!(entry.depth, 12);
        assert_eq!(entry.value, -300);
        assert_eq!(entry.bound, Bound::Lower);
        assert_eq!(entry.best_move, Some(mv));
        assert_eq!(entry.generation, 63);
    }

    #[test]
    fn test_zero_entry_is_storable() {
        let tt = TranspositionTable::new(1);
        tt.store(42, 0, Bound::Exact, 0, None, 0);
        let entry = tt.probe(42).expect("entry stored");
        assert_eq!(entry.value, 0);
        assert_eq!(entry.best_move, None);
    }

    #[test]
    fn test_store_and_probe() {
        let tt = TranspositionTable::new(1);
        let key = 0x1234_5678_9ABC_DEF0;
        tt.store(key, 500, Bound::Exact, 10, None, 1);

        let entry = tt.probe(key).expect("should find entry");
        assert_eq!(entry.depth, 10);
        assert_eq!(entry.value, 500);
        assert_eq!(entry.bound, Bound::Exact);
        assert!(tt.probe(0xFEDC_BA98_7654_3210).is_none());
    }

    #[test]
    fn test_value_is_clamped() {
        let tt = TranspositionTable::new(1);
        tt.store(7, 1_000_000, Bound::Upper, 300, None, 0);
        let entry = tt.probe(7).unwrap();
        assert_eq!(entry.value, i16::MAX);
        assert_eq!(entry.depth, u8::MAX);
    }

    #[test]
    fn test_same_key_overwrites() {
        let tt = TranspositionTable::new(1);
        tt.store(99, 1, Bound::Lower, 3, None, 0);
        tt.store(99, 2, Bound::Upper, 5, None, 0);
        let entry = tt.probe(99).unwrap();
        assert_eq!(entry.value, 2);
        assert_eq!(entry.depth, 5);
    }

    #[test]
    fn test_replacement_evicts_shallowest_old_entry() {
        let tt = TranspositionTable::new(1);
        let stride = (tt.mask + 1) as u64;
        // Five keys mapping to bucket 0
        let keys: Vec<u64> = (1..=5).map(|i| i * stride).collect();
        for (depth, &key) in [8, 2, 9, 7].iter().zip(&keys) {
            tt.store(key, 0, Bound::Exact, *depth, None, 0);
        }
        tt.store(keys[4], 0, Bound::Exact, 1, None, 0);
        assert!(tt.probe(keys[1]).is_none(), "depth 2 entry replaced");
        assert!(tt.probe(keys[4]).is_some());
        assert!(tt.probe(keys[0]).is_some());
    }

    #[test]
    fn test_generation_and_clear() {
        let mut tt = TranspositionTable::new(1);
        assert_eq!(tt.generation(), 0);
        assert_eq!(tt.new_generation(), 1);
        tt.store(5, 10, Bound::Exact, 1, None, tt.generation());
        assert_eq!(tt.probe(5).unwrap().generation, 1);
        assert!(tt.hashfull_per_mille() <= 1000);
        tt.clear();
        assert!(tt.probe(5).is_none());
        assert_eq!(tt.hashfull_per_mille(), 0);

        let before = tt.capacity();
        tt.resize(2);
        assert!(tt.capacity() >= before);
        assert_eq!(tt.generation(), 0);
    }
}
