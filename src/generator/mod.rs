//! Channel-based Fibonacci generators
//!
//! - `FibonacciGenerator`: select-based producer over rendezvous channels
//!   with a quit signal
//! - `buffered_fibonacci`: fixed-length producer over a buffered channel that
//!   closes when done
//!
//! Both producers run on their own OS thread and own a `FibState`.

mod buffered;
mod fibonacci;
mod rendezvous;

pub use buffered::buffered_fibonacci;
pub use fibonacci::FibState;
pub use rendezvous::{run_fibonacci, FibonacciGenerator, ProducerSummary, StopReason};

use tokio::task::spawn_blocking;

use thiserror::Error;

/// Errors that can occur while driving a generator
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Failed to spawn producer thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Producer closed the channel")]
    Closed,

    #[error("Producer thread panicked")]
    ProducerPanicked,
}

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Runs [`run_fibonacci`] on tokio's blocking pool
///
/// The consumer side blocks on rendezvous receives and the producer join, so
/// it must stay off the async worker threads.
pub async fn spawn_fibonacci(count: usize) -> crate::Result<(Vec<u64>, ProducerSummary)> {
    let (values, summary) = spawn_blocking(move || run_fibonacci(count)).await??;
    Ok((values, summary))
}

/// Drains a [`buffered_fibonacci`] producer on tokio's blocking pool
///
/// Resolves once the producer has closed its channel.
pub async fn drain_buffered(count: usize) -> crate::Result<Vec<u64>> {
    let values = spawn_blocking(move || {
        buffered_fibonacci(count).map(|rx| rx.iter().collect::<Vec<_>>())
    })
    .await??;
    Ok(values)
}
