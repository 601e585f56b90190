//! Joint deduplication by quantized position
//!
//! Two joints are the same joint when their coordinates agree after rounding
//! to a fixed number of decimals. This tolerates the small drift that head
//! and tail positions pick up going through host transforms.

use glam::Vec3;
use hashbrown::HashSet;

/// Decimals kept when quantizing joint positions
pub const DEFAULT_KEY_DECIMALS: u32 = 5;

/// Highest supported precision; beyond this f32 input carries no information
pub const MAX_KEY_DECIMALS: u32 = 9;

/// Quantized joint position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointKey([i64; 3]);

impl JointKey {
    pub fn coords(&self) -> [i64; 3] {
        self.0
    }
}

/// Tracks which joint positions already carry a sphere
#[derive(Debug, Clone)]
pub struct JointDeduper {
    scale: f64,
    seen: HashSet<JointKey>,
}

impl JointDeduper {
    /// Deduper rounding to `DEFAULT_KEY_DECIMALS`
    pub fn new() -> Self {
        Self::with_decimals(DEFAULT_KEY_DECIMALS)
    }

    /// Deduper rounding to `decimals` places (capped at `MAX_KEY_DECIMALS`)
    pub fn with_decimals(decimals: u32) -> Self {
        let decimals = decimals.min(MAX_KEY_DECIMALS);
        Self {
            scale: 10f64.powi(decimals as i32),
            seen: HashSet::new(),
        }
    }

    /// Quantize a point
    pub fn key(&self, point: Vec3) -> JointKey {
        let q = |c: f32| (f64::from(c) * self.scale).round() as i64;
        JointKey([q(point.x), q(point.y), q(point.z)])
    }

    pub fn seen(&self, key: &JointKey) -> bool {
        self.seen.contains(key)
    }

    /// Record a key, returning true if it was not already present
    pub fn mark_seen(&mut self, key: JointKey) -> bool {
        self.seen.insert(key)
    }

    /// Quantize `point` and mark it; true means the caller should cap it
    pub fn claim(&mut self, point: Vec3) -> bool {
        let key = self.key(point);
        self.mark_seen(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for JointDeduper {
    fn default() -> Self {
        Self::new()
    }
}
