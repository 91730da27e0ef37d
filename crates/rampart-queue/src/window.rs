//! Fixed-capacity rolling window of integer samples.

/// Keeps the most recent `capacity` samples pushed into it.
///
/// Sample `n` (counting from zero over the window's lifetime) lives in slot
/// `n % capacity`, so once more than `capacity` samples have been pushed
/// each push overwrites the oldest one.
pub struct SampleWindow<'a> {
    samples: &'a mut [u64],
    logical_count: u64,
}

impl<'a> SampleWindow<'a> {
    /// Create an empty window over `samples`.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    pub fn new(samples: &'a mut [u64]) -> Self {
        assert!(!samples.is_empty(), "SampleWindow capacity must be at least 1");
        Self {
            samples,
            logical_count: 0,
        }
    }

    /// Record a sample, overwriting the oldest one if the window is full.
    pub fn push(&mut self, value: u64) {
        let slot = (self.logical_count % self.samples.len() as u64) as usize;
        self.samples[slot] = value;
        self.logical_count += 1;
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.logical_count.min(self.samples.len() as u64) as usize
    }

    /// Whether no sample has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.logical_count == 0
    }

    /// Maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Samples pushed over the window's lifetime.
    pub fn logical_count(&self) -> u64 {
        self.logical_count
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<u64> {
        let last = self.logical_count.checked_sub(1)?;
        Some(self.samples[(last % self.samples.len() as u64) as usize])
    }

    /// Held samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        let cap = self.samples.len();
        let start = if self.logical_count > cap as u64 {
            (self.logical_count % cap as u64) as usize
        } else {
            0
        };
        (0..self.len()).map(move |i| self.samples[(start + i) % cap])
    }

    /// Largest held sample.
    pub fn max(&self) -> Option<u64> {
        self.iter().max()
    }

    /// Mean of the held samples.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: u128 = self.iter().map(u128::from).sum();
        Some(sum as f64 / self.len() as f64)
    }
}

impl std::fmt::Debug for SampleWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleWindow")
            .field("capacity", &self.samples.len())
            .field("logical_count", &self.logical_count)
            .field("latest", &self.latest())
            .finish()
    }
}
