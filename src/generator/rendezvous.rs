//! Select-based Fibonacci generator over rendezvous channels
//!
//! The producer thread loops on a `select!` between offering its next value
//! on a zero-capacity channel and receiving a quit signal. Exactly one of the
//! two is serviced per iteration: the state only advances after a consumer
//! has actually taken the value, and a serviced quit ends the loop before
//! anything else is produced.

use crate::generator::fibonacci::FibState;
use crate::generator::{GeneratorError, GeneratorResult};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Why the producer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A quit signal arrived, or its sender was dropped
    Quit,

    /// The value receiver was dropped
    ConsumerGone,

    /// The largest Fibonacci number a u64 can hold was handed out
    Exhausted,
}

/// What the producer did before it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerSummary {
    /// Values handed to a consumer
    pub produced: u64,

    pub stop: StopReason,
}

fn produce(values: Sender<u64>, quit: Receiver<()>) -> ProducerSummary {
    let mut state = FibState::new();
    let mut produced = 0;

    loop {
        select! {
            send(values, state.value()) -> sent => {
                if sent.is_err() {
                    return ProducerSummary { produced, stop: StopReason::ConsumerGone };
                }
                produced += 1;
                if !state.advance() {
                    tracing::debug!("Fibonacci sequence exhausted after {} values", produced);
                    return ProducerSummary { produced, stop: StopReason::Exhausted };
                }
            }
            recv(quit) -> _ => {
                tracing::debug!("quit after {} values", produced);
                return ProducerSummary { produced, stop: StopReason::Quit };
            }
        }
    }
}

/// Consumer handle for a running Fibonacci producer
///
/// Dropping the handle without calling [`FibonacciGenerator::quit`] drops the
/// quit sender, which the producer treats as a quit.
pub struct FibonacciGenerator {
    values: Receiver<u64>,
    quit: Sender<()>,
    producer: JoinHandle<ProducerSummary>,
}

impl FibonacciGenerator {
    /// Starts the producer on its own thread
    pub fn spawn() -> GeneratorResult<Self> {
        let (values_tx, values_rx) = bounded(0);
        let (quit_tx, quit_rx) = bounded(0);

        let producer = thread::Builder::new()
            .name("fibonacci-producer".to_string())
            .spawn(move || produce(values_tx, quit_rx))?;

        Ok(Self {
            values: values_rx,
            quit: quit_tx,
            producer,
        })
    }

    /// Takes the next value, blocking until the producer offers it
    pub fn next_value(&self) -> GeneratorResult<u64> {
        self.values.recv().map_err(|_| GeneratorError::Closed)
    }

    /// Takes exactly `n` values in order
    pub fn take(&self, n: usize) -> GeneratorResult<Vec<u64>> {
        (0..n).map(|_| self.next_value()).collect()
    }

    /// Sends the quit signal once and waits for the producer to stop
    ///
    /// If the producer already stopped on its own, its own reason is
    /// returned.
    pub fn quit(self) -> GeneratorResult<ProducerSummary> {
        let Self {
            values,
            quit,
            producer,
        } = self;

        // Fails only if the producer has already returned.
        let _ = quit.send(());
        drop(values);

        producer.join().map_err(|_| GeneratorError::ProducerPanicked)
    }
}

/// Pulls `count` values from a fresh generator, then signals quit
pub fn run_fibonacci(count: usize) -> GeneratorResult<(Vec<u64>, ProducerSummary)> {
    let generator = FibonacciGenerator::spawn()?;
    let values = generator.take(count)?;
    let summary = generator.quit()?;
    Ok((values, summary))
}
