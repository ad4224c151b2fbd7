use crate::error::AssetError;

type Release<T> = Box<dyn FnOnce(Vec<T>) + Send>;

/// Gate over N independent loads that releases exactly once, after all N
/// have reported, with the results in slot order.
///
/// Completion is tracked with a counter of outstanding slots, never by
/// comparing the length of a partially filled result list.
pub struct LoadBarrier<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
    on_release: Option<Release<T>>,
}

impl<T> std::fmt::Debug for LoadBarrier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBarrier")
            .field("expected", &self.slots.len())
            .field("remaining", &self.remaining)
            .field("released", &self.is_released())
            .finish()
    }
}

impl<T> LoadBarrier<T> {
    /// Create a barrier over `expected` loads. With zero loads the callback
    /// fires immediately.
    pub fn new(expected: usize, on_release: impl FnOnce(Vec<T>) + Send + 'static) -> Self {
        let mut barrier = Self {
            slots: (0..expected).map(|_| None).collect(),
            remaining: expected,
            on_release: Some(Box::new(on_release)),
        };
        if expected == 0 {
            barrier.release();
        }
        barrier
    }

    /// Record the result of load `index`. Reporting a slot twice, or a slot
    /// outside the barrier, is an error.
    pub fn complete(&mut self, index: usize, value: T) -> Result<(), AssetError> {
        let expected = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .filter(|s| s.is_none())
            .ok_or(AssetError::BarrierMisuse { index, expected })?;
        *slot = Some(value);
        self.remaining -= 1;
        tracing::trace!(index, remaining = self.remaining, "load completed");

        if self.remaining == 0 {
            self.release();
        }
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Slots that have not reported yet, in slot order.
    pub fn pending(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_released(&self) -> bool {
        self.on_release.is_none()
    }

    fn release(&mut self) {
        if let Some(callback) = self.on_release.take() {
            let values = self.slots.iter_mut().filter_map(Option::take).collect();
            callback(values);
        }
    }
}
