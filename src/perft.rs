//! Perft: count the leaf nodes of the legal move tree to a fixed depth.
//!
//! [`Board::perft`] is the plain recursive walk. [`Perft`] is a session that
//! memoises subtree counts by `(key, depth)` and can split the root over
//! worker threads with [`perft_parallel`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move};

/// Subtree counts keyed by position key and remaining depth.
type CacheKey = (u64, u32);

const PARALLEL_SHARDS: usize = 16;
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

impl Board {
    /// Uncached leaf count to `depth`. Depth 1 counts legal moves without
    /// making them.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in moves {
            self.make_move(m);
            nodes += self.perft(depth - 1);
            self.take_move(m);
        }

        nodes
    }
}

/// Settings for a [`Perft`] session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PerftConfig {
    /// Maximum number of cached subtree counts.
    pub cache_capacity: usize,
    pub use_cache: bool,
    /// Worker threads for [`Perft::run`]; 1 keeps everything on the caller's thread.
    pub threads: usize,
}

impl Default for PerftConfig {
    fn default() -> Self {
        PerftConfig {
            cache_capacity: 1 << 20,
            use_cache: true,
            threads: 1,
        }
    }
}

impl PerftConfig {
    #[must_use]
    pub fn with_threads(threads: usize) -> Self {
        PerftConfig {
            threads: threads.max(1),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn uncached() -> Self {
        PerftConfig {
            use_cache: false,
            ..Default::default()
        }
    }
}

/// Capacity-bounded memo of subtree counts.
///
/// Once full, new keys are dropped and existing entries stay. Counts are
/// exact and stored under the full 64-bit key, so the first write is final.
#[derive(Clone, Debug)]
pub struct PerftCache {
    entries: HashMap<CacheKey, u64>,
    capacity: usize,
    hits: u64,
    saturated: bool,
}

impl PerftCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        PerftCache {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            capacity,
            hits: 0,
            saturated: false,
        }
    }

    /// Look up a count, recording a hit when found.
    pub fn get(&mut self, key: u64, depth: u32) -> Option<u64> {
        let found = self.entries.get(&(key, depth)).copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    /// Store a count. Returns false if the cache is full and `key` is new.
    pub fn insert(&mut self, key: u64, depth: u32, nodes: u64) -> bool {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&(key, depth)) {
            if !self.saturated {
                self.saturated = true;
                debug_log!("perft cache full at {} entries", self.capacity);
            }
            return false;
        }
        self.entries.entry((key, depth)).or_insert(nodes);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.saturated = false;
    }
}

/// A perft session owning its cache. Reusing one session across runs keeps
/// earlier subtree counts available. Threaded sessions keep a shared cache
/// instead, handed to every worker of every run.
#[derive(Debug)]
pub struct Perft {
    config: PerftConfig,
    cache: PerftCache,
    shared: Option<Arc<SharedPerftCache>>,
}

impl Perft {
    #[must_use]
    pub fn new(config: PerftConfig) -> Self {
        let capacity = if config.use_cache {
            config.cache_capacity
        } else {
            0
        };
        let shared = (config.threads > 1 && config.use_cache)
            .then(|| Arc::new(SharedPerftCache::new(config.cache_capacity)));
        Perft {
            config,
            cache: PerftCache::new(capacity),
            shared,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PerftConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &PerftCache {
        &self.cache
    }

    /// The cache used by threaded runs, if this session has one.
    #[must_use]
    pub fn shared_cache(&self) -> Option<&SharedPerftCache> {
        self.shared.as_deref()
    }

    /// Leaf count to `depth`. The board is returned to its starting position.
    pub fn run(&mut self, board: &mut Board, depth: u32) -> u64 {
        if self.config.threads > 1 && depth > 1 {
            return perft_parallel_with(board, depth, self.config.threads, self.shared.as_ref());
        }

        debug_log!("perft depth {} from {}", depth, board.key_hex());
        let hits_before = self.cache.hits();
        let nodes = self.count(board, depth);
        debug_log!(
            "perft depth {}: {} nodes, {} cache hits, {} cached",
            depth,
            nodes,
            self.cache.hits() - hits_before,
            self.cache.len()
        );
        nodes
    }

    /// Leaf counts below each legal root move.
    pub fn divide(&mut self, board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        board
            .generate_moves()
            .into_iter()
            .map(|m| {
                board.make_move(m);
                let nodes = self.count(board, depth - 1);
                board.take_move(m);
                (m, nodes)
            })
            .collect()
    }

    fn count(&mut self, board: &mut Board, depth: u32) -> u64 {
        if depth <= 1 || !self.config.use_cache {
            return board.perft(depth);
        }

        let key = board.key();
        if let Some(nodes) = self.cache.get(key, depth) {
            return nodes;
        }

        let mut nodes = 0;
        for m in board.generate_moves() {
            board.make_move(m);
            nodes += self.count(board, depth - 1);
            board.take_move(m);
        }
        self.cache.insert(key, depth, nodes);
        nodes
    }
}

/// Subtree counts shared between perft workers, split over independently
/// locked shards.
#[derive(Debug)]
pub struct SharedPerftCache {
    shards: Vec<Mutex<HashMap<CacheKey, u64>>>,
    shard_capacity: usize,
    hits: AtomicU64,
}

impl SharedPerftCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        SharedPerftCache {
            shards: (0..PARALLEL_SHARDS)
                .map(|_| Mutex::new(HashMap::new()))
                .collect(),
            shard_capacity: capacity.div_ceil(PARALLEL_SHARDS),
            hits: AtomicU64::new(0),
        }
    }

    fn shard(&self, key: u64) -> &Mutex<HashMap<CacheKey, u64>> {
        &self.shards[(key as usize) % PARALLEL_SHARDS]
    }

    /// Look up a count, recording a hit when found.
    pub fn get(&self, key: u64, depth: u32) -> Option<u64> {
        let found = self.shard(key).lock().get(&(key, depth)).copied();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, key: u64, depth: u32, nodes: u64) -> bool {
        let mut shard = self.shard(key).lock();
        if shard.len() >= self.shard_capacity && !shard.contains_key(&(key, depth)) {
            return false;
        }
        shard.entry((key, depth)).or_insert(nodes);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

fn count_shared(board: &mut Board, depth: u32, cache: &SharedPerftCache) -> u64 {
    if depth <= 1 {
        return board.perft(depth);
    }

    let key = board.key();
    if let Some(nodes) = cache.get(key, depth) {
        return nodes;
    }

    let mut nodes = 0;
    for m in board.generate_moves() {
        board.make_move(m);
        nodes += count_shared(board, depth - 1, cache);
        board.take_move(m);
    }
    cache.insert(key, depth, nodes);
    nodes
}

fn count_root_moves(
    board: &mut Board,
    moves: &[Move],
    depth: u32,
    cache: Option<&SharedPerftCache>,
) -> u64 {
    let mut nodes = 0;
    for &m in moves {
        board.make_move(m);
        nodes += match cache {
            Some(cache) => count_shared(board, depth - 1, cache),
            None => board.perft(depth - 1),
        };
        board.take_move(m);
    }
    nodes
}

/// Leaf count to `depth` with the root moves dealt out to `threads` workers.
/// Each worker walks its own copy of `board`; they share one cache that
/// lives for this call only.
#[must_use]
pub fn perft_parallel(board: &Board, depth: u32, threads: usize) -> u64 {
    let config = PerftConfig::with_threads(threads);
    let cache = Arc::new(SharedPerftCache::new(config.cache_capacity));
    perft_parallel_with(board, depth, threads, Some(&cache))
}

fn perft_parallel_with(
    board: &Board,
    depth: u32,
    threads: usize,
    cache: Option<&Arc<SharedPerftCache>>,
) -> u64 {
    if depth <= 1 {
        return board.clone().perft(depth);
    }

    let root_key = board.key();
    if let Some(nodes) = cache.and_then(|c| c.get(root_key, depth)) {
        debug_log!("parallel perft depth {}: answered from cache", depth);
        return nodes;
    }

    let moves: Vec<Move> = board.generate_moves().into_iter().collect();
    let threads = threads.clamp(1, moves.len().max(1));
    let chunk_len = moves.len().div_ceil(threads).max(1);
    debug_log!(
        "parallel perft depth {}: {} root moves over {} workers",
        depth,
        moves.len(),
        threads
    );

    let mut handles: Vec<JoinHandle<u64>> = Vec::with_capacity(threads);
    let mut nodes = 0;
    for (worker_id, chunk) in moves.chunks(chunk_len).enumerate() {
        let mut worker_board = board.clone();
        let worker_moves = chunk.to_vec();
        let worker_cache = cache.cloned();
        let spawned = thread::Builder::new()
            .name(format!("perft-{worker_id}"))
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || {
                count_root_moves(&mut worker_board, &worker_moves, depth, worker_cache.as_deref())
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                debug_log!("perft worker {} failed to start: {}", worker_id, err);
                nodes += count_root_moves(&mut board.clone(), chunk, depth, cache.map(|shared| shared.as_ref()));
            }
        }
    }

    for handle in handles {
        match handle.join() {
            Ok(count) => nodes += count,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    if let Some(shared) = cache {
        shared.insert(root_key, depth, nodes);
        debug_log!("parallel perft depth {}: {} nodes, {} cached", depth, nodes, shared.len());
    }
    nodes
}
