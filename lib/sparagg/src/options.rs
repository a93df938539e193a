use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Options of an evaluation.
///
/// ```
/// use sparagg::{CancellationToken, EvaluationOptions};
///
/// let token = CancellationToken::new();
/// let options = EvaluationOptions::new()
///     .with_seed(42)
///     .with_cancellation_token(token.clone());
/// assert_eq!(options.seed(), Some(42));
/// assert!(!options.is_cancelled());
/// token.cancel();
/// assert!(options.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvaluationOptions {
    seed: Option<u64>,
    cancellation_token: Option<CancellationToken>,
}

impl EvaluationOptions {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the random source used by `RAND()`.
    ///
    /// Without a seed the random source is seeded from the system generator.
    #[must_use]
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Inject a cancellation token to the evaluation.
    ///
    /// Once cancelled, every row evaluation fails with [`EvaluationError::Cancelled`](crate::EvaluationError::Cancelled).
    #[must_use]
    #[inline]
    pub fn with_cancellation_token(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = Some(cancellation_token);
        self
    }

    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// A token to cancel an evaluation from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
