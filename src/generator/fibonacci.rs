/// Two-integer state of a Fibonacci producer
///
/// Owned by exactly one producer; `value()` is the number offered next.
/// `next` is `None` once the successor no longer fits in a `u64`, so the
/// last representable value is still offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FibState {
    current: u64,
    next: Option<u64>,
}

impl FibState {
    pub fn new() -> Self {
        Self {
            current: 0,
            next: Some(1),
        }
    }

    /// The value to produce at this step
    pub fn value(&self) -> u64 {
        self.current
    }

    /// Moves to the next value
    ///
    /// Returns `false` and leaves the state untouched once the current value
    /// is the largest Fibonacci number a `u64` can hold.
    pub fn advance(&mut self) -> bool {
        match self.next {
            Some(next) => {
                self.next = self.current.checked_add(next);
                self.current = next;
                true
            }
            None => false,
        }
    }
}

impl Default for FibState {
    fn default() -> Self {
        Self::new()
    }
}
