use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ndarray::{ArrayBase, Data, Dimension};

use crate::consts::DEFAULT_STAGE_CACHE_CAPACITY;
use crate::error::Result;
use crate::frame::{Matte, RgbFrame};

use super::types::PipelineStage;

/// Hash of everything a stage result depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub u64);

/// Incrementally hashes stage inputs into a [`Fingerprint`].
///
/// Floats are hashed by bit pattern, so `0.0` and `-0.0` differ and NaNs with
/// identical payloads match.
pub struct FingerprintBuilder(DefaultHasher);

impl FingerprintBuilder {
    pub fn new(stage: PipelineStage) -> Self {
        let mut hasher = DefaultHasher::new();
        stage.hash(&mut hasher);
        Self(hasher)
    }

    pub fn array<S, D>(mut self, data: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        data.shape().hash(&mut self.0);
        for v in data.iter() {
            self.0.write_u32(v.to_bits());
        }
        self
    }

    pub fn f32(mut self, v: f32) -> Self {
        self.0.write_u32(v.to_bits());
        self
    }

    pub fn usize(mut self, v: usize) -> Self {
        self.0.write_usize(v);
        self
    }

    pub fn bool(mut self, v: bool) -> Self {
        self.0.write_u8(v as u8);
        self
    }

    /// Chain an upstream stage's key instead of rehashing its output.
    pub fn upstream(mut self, key: Fingerprint) -> Self {
        self.0.write_u64(key.0);
        self
    }

    pub fn finish(&self) -> Fingerprint {
        Fingerprint(self.0.finish())
    }
}

/// A cached stage result.
#[derive(Clone, Debug)]
pub enum StageValue {
    Frame(Arc<RgbFrame>),
    Matte(Arc<Matte>),
}

/// Types that can be stored in a [`StageCache`].
pub trait Cacheable: Sized {
    fn into_value(value: Arc<Self>) -> StageValue;
    fn from_value(value: &StageValue) -> Option<Arc<Self>>;
}

impl Cacheable for RgbFrame {
    fn into_value(value: Arc<Self>) -> StageValue {
        StageValue::Frame(value)
    }

    fn from_value(value: &StageValue) -> Option<Arc<Self>> {
        match value {
            StageValue::Frame(f) => Some(Arc::clone(f)),
            StageValue::Matte(_) => None,
        }
    }
}

impl Cacheable for Matte {
    fn into_value(value: Arc<Self>) -> StageValue {
        StageValue::Matte(value)
    }

    fn from_value(value: &StageValue) -> Option<Arc<Self>> {
        match value {
            StageValue::Matte(m) => Some(Arc::clone(m)),
            StageValue::Frame(_) => None,
        }
    }
}

/// Memoizes stage results keyed by (stage, input fingerprint).
///
/// Each stage keeps at most `capacity_per_stage` entries; the oldest entry is
/// evicted first.
#[derive(Debug)]
pub struct StageCache {
    entries: HashMap<PipelineStage, VecDeque<(Fingerprint, StageValue)>>,
    capacity_per_stage: usize,
    hits: usize,
    misses: usize,
}

impl Default for StageCache {
    fn default() -> Self {
        Self::new(DEFAULT_STAGE_CACHE_CAPACITY)
    }
}

impl StageCache {
    pub fn new(capacity_per_stage: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity_per_stage: capacity_per_stage.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get<T: Cacheable>(&self, stage: PipelineStage, key: Fingerprint) -> Option<Arc<T>> {
        self.entries
            .get(&stage)?
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| T::from_value(v))
    }

    pub fn insert<T: Cacheable>(&mut self, stage: PipelineStage, key: Fingerprint, value: Arc<T>) {
        let slot = self.entries.entry(stage).or_default();
        slot.retain(|(k, _)| *k != key);
        if slot.len() >= self.capacity_per_stage {
            slot.pop_front();
        }
        slot.push_back((key, T::into_value(value)));
    }

    /// Return the cached result for `key`, or run `compute` and store it.
    ///
    /// The flag is true on a cache hit. Errors are not cached.
    pub fn get_or_compute<T, F>(
        &mut self,
        stage: PipelineStage,
        key: Fingerprint,
        compute: F,
    ) -> Result<(Arc<T>, bool)>
    where
        T: Cacheable,
        F: FnOnce() -> Result<T>,
    {
        if let Some(hit) = self.get::<T>(stage, key) {
            self.hits += 1;
            return Ok((hit, true));
        }
        self.misses += 1;
        let value = Arc::new(compute()?);
        self.insert(stage, key, Arc::clone(&value));
        Ok((value, false))
    }

    /// Drop every cached result of one stage.
    pub fn invalidate_stage(&mut self, stage: PipelineStage) {
        self.entries.remove(&stage);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of cached results across all stages.
    pub fn len(&self) -> usize {
        self.entries.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
