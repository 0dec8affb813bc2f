//! Range-and-close Fibonacci generator over a buffered channel
//!
//! The producer fills a channel of capacity `n` with the first `n` values and
//! then drops its sender. Only the sender closes the channel; the consumer
//! drains whatever is buffered and then observes the disconnect.

use crate::generator::fibonacci::FibState;
use crate::generator::GeneratorResult;
use crossbeam_channel::{bounded, Receiver};
use std::thread;

/// Starts a producer for the first `n` Fibonacci numbers
///
/// Iterating the returned receiver yields exactly `n` values and then ends.
pub fn buffered_fibonacci(n: usize) -> GeneratorResult<Receiver<u64>> {
    let (tx, rx) = bounded(n);

    thread::Builder::new()
        .name("fibonacci-buffered".to_string())
        .spawn(move || {
            let mut state = FibState::new();
            for i in 0..n {
                if tx.send(state.value()).is_err() {
                    tracing::debug!("Receiver dropped after {} values", i);
                    return;
                }
                if !state.advance() {
                    tracing::debug!("Fibonacci sequence exhausted after {} values", i + 1);
                    return;
                }
            }
            // tx drops here and closes the channel
        })?;

    Ok(rx)
}
