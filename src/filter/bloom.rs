// =====================================================================
// File: filter/bloom.rs
//
// Description:
//   Fixed-size Bloom filter. `m` bits packed into `u64` words, `k`
//   probes per item. Probe `i` lands on `hash(item, i) mod m`.
//
// Notes:
//   * Bits only go 0 -> 1 through `add`. The one exception is
//     `rebuild`, which wipes the array and re-adds a fresh key set.
//   * `contains` has no false negatives. False positives grow with
//     the number of distinct items added.
//   * The hash is pluggable through `ProbeHasher`; only the
//     `(item, seed) -> u64` contract matters.
// =====================================================================
use crate::config::FilterConfig;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::marker::PhantomData;

const WORD_BITS: usize = u64::BITS as usize;


/// Maps an item and a probe seed to a pseudo-random integer.
///
/// Must be deterministic for a given `(item, seed)` pair, and different
/// seeds should behave like independent hash functions.
pub trait ProbeHasher {
    fn probe<T: Hash + ?Sized>(&self, item: &T, seed: u32) -> u64;
}


/// Hashes the pair `(item, seed)` with any `BuildHasher`.
///
/// The default builder is SipHash with fixed keys, so probe positions are
/// stable across runs. Swap in `RandomState` for per-process keys.
#[derive(Debug, Clone, Default)]
pub struct SeededHasher<S = BuildHasherDefault<DefaultHasher>> {
    build: S,
}

impl<S> SeededHasher<S> {
    pub fn with_builder(build: S) -> Self {
        Self { build }
    }
}

impl<S: BuildHasher> ProbeHasher for SeededHasher<S> {
    fn probe<T: Hash + ?Sized>(&self, item: &T, seed: u32) -> u64 {
        let mut hasher = self.build.build_hasher();
        item.hash(&mut hasher);
        seed.hash(&mut hasher);
        hasher.finish()
    }
}


/// A Bloom filter over items of type `K`.
///
/// # Example
/// ```
/// use btree_index::{FilterConfig, MembershipFilter};
///
/// let mut filter: MembershipFilter<i32> = MembershipFilter::new(FilterConfig::new(128, 3));
/// filter.add(&42);
/// assert!(filter.contains(&42));
/// ```
pub struct MembershipFilter<K, H = SeededHasher> {
    words: Vec<u64>,
    bit_len: usize,
    probes: u32,
    hasher: H,
    _marker: PhantomData<fn(&K)>,
}


impl<K, H: Default> MembershipFilter<K, H> {
    /// Build an empty filter sized by `config`.
    ///
    /// # Panics
    /// If `config` has zero bits or zero probes.
    pub fn new(config: FilterConfig) -> Self {
        Self::with_hasher(config, H::default())
    }
}

impl<K, H> MembershipFilter<K, H> {
    /// Build an empty filter that places probes with `hasher`.
    ///
    /// # Panics
    /// If `config` has zero bits or zero probes.
    pub fn with_hasher(config: FilterConfig, hasher: H) -> Self {
        if let Err(e) = config.validate() {
            panic!("invalid filter config: {}", e);
        }
        Self {
            words: vec![0; config.bits.div_ceil(WORD_BITS)],
            bit_len: config.bits,
            probes: config.probes,
            hasher,
            _marker: PhantomData,
        }
    }

    /// A blank filter with the same sizing and hasher.
    pub fn empty_like(&self) -> Self
    where
        H: Clone,
    {
        Self {
            words: vec![0; self.words.len()],
            bit_len: self.bit_len,
            probes: self.probes,
            hasher: self.hasher.clone(),
            _marker: PhantomData,
        }
    }

    /// `m`, the number of addressable bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// `k`, the number of probes per item.
    pub fn probe_count(&self) -> u32 {
        self.probes
    }

    /// Number of bits currently set.
    pub fn set_bits(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Expected false positive rate after `n` distinct items: `(1 - e^(-kn/m))^k`.
    pub fn estimated_false_positive_rate(&self, n: usize) -> f64 {
        let k = self.probes as f64;
        let fill = 1.0 - (-k * n as f64 / self.bit_len as f64).exp();
        fill.powf(k)
    }

    #[inline]
    fn get_bit(&self, bit: usize) -> bool {
        self.words[bit / WORD_BITS] & (1u64 << (bit % WORD_BITS)) != 0
    }

    #[inline]
    fn set_bit(&mut self, bit: usize) {
        self.words[bit / WORD_BITS] |= 1u64 << (bit % WORD_BITS);
    }
}


impl<K: Hash, H: ProbeHasher> MembershipFilter<K, H> {
    /// Bit position of probe `probe` for `item`.
    #[inline]
    pub fn position(&self, item: &K, probe: u32) -> usize {
        (self.hasher.probe(item, probe) % self.bit_len as u64) as usize
    }

    /// The `k` positions `item` maps to, paired with their probe index.
    pub fn probe_positions<'a>(&'a self, item: &'a K) -> impl Iterator<Item = (u32, usize)> + 'a {
        (0..self.probes).map(move |i| (i, self.position(item, i)))
    }

    /// Records `item`: sets all of its probe bits.
    pub fn add(&mut self, item: &K) {
        for i in 0..self.probes {
            let bit = self.position(item, i);
            self.set_bit(bit);
        }
    }

    /// Probabilistic membership: `false` means `item` was never added.
    pub fn contains(&self, item: &K) -> bool {
        self.first_clear_probe(item).is_none()
    }

    /// First probe of `item` whose bit is clear, as `(probe, bit)`.
    ///
    /// `None` means every probe bit is set (the item may be present).
    pub fn first_clear_probe(&self, item: &K) -> Option<(u32, usize)> {
        self.probe_positions(item).find(|&(_, bit)| !self.get_bit(bit))
    }

    /// Wipes the filter and records exactly `items`.
    ///
    /// This is the only way to drop stale bits, since `add` never clears.
    pub fn rebuild<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        self.clear();
        for item in items {
            self.add(item);
        }
    }
}


impl<K, H: Clone> Clone for MembershipFilter<K, H> {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
            bit_len: self.bit_len,
            probes: self.probes,
            hasher: self.hasher.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K, H> fmt::Debug for MembershipFilter<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipFilter")
            .field("bit_len", &self.bit_len)
            .field("probes", &self.probes)
            .field("set_bits", &self.set_bits())
            .finish()
    }
}
