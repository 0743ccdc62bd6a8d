//! Running total of per-file [`DiffUnit`]s.
//!
//! The total lives on a dedicated consumer thread and is never shared. The
//! walker hands units over a single-slot channel; a snapshot request travels
//! on the same channel, so its reply is produced only after every unit sent
//! before it has been merged. The reply carries the merge count, which must
//! equal the number of units sent.

use std::panic;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::error::Result;
use crate::model::DiffUnit;

enum Message {
    Unit(DiffUnit),
    Snapshot(Sender<Snapshot>),
}

/// Immutable copy of the running total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub total: DiffUnit,
    /// Number of units merged into `total`.
    pub merged: u64,
}

pub struct Aggregator {
    tx: Sender<Message>,
    sent: u64,
    handle: Option<JoinHandle<Snapshot>>,
}

impl Aggregator {
    /// Start the consumer thread.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let handle = thread::Builder::new()
            .name("xcccr-aggregate".to_string())
            .spawn(move || consume(rx))?;
        Ok(Self {
            tx,
            sent: 0,
            handle: Some(handle),
        })
    }

    /// Hand a unit to the consumer. Blocks while the slot is full.
    pub fn merge(&mut self, unit: DiffUnit) {
        if self.tx.send(Message::Unit(unit)).is_err() {
            self.consumer_died();
        }
        self.sent += 1;
    }

    /// Number of units handed over so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Block until every unit sent so far is merged, then copy the total.
    pub fn snapshot(&mut self) -> Snapshot {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        if self.tx.send(Message::Snapshot(reply_tx)).is_err() {
            self.consumer_died();
        }
        match reply_rx.recv() {
            Ok(snapshot) => {
                debug_assert_eq!(snapshot.merged, self.sent);
                snapshot
            }
            Err(_) => self.consumer_died(),
        }
    }

    /// Close the channel and wait for the consumer to drain it.
    pub fn finish(mut self) -> Snapshot {
        let handle = self.handle.take();
        let sent = self.sent;
        drop(self);
        let snapshot = join(handle);
        debug_assert_eq!(snapshot.merged, sent);
        snapshot
    }

    /// The consumer only exits early by panicking; surface that panic here.
    fn consumer_died(&mut self) -> ! {
        join(self.handle.take());
        unreachable!("aggregator consumer exited while its channel was open");
    }
}

fn join(handle: Option<JoinHandle<Snapshot>>) -> Snapshot {
    match handle.map(JoinHandle::join) {
        Some(Ok(snapshot)) => snapshot,
        Some(Err(payload)) => panic::resume_unwind(payload),
        None => unreachable!("aggregator consumer joined twice"),
    }
}

fn consume(rx: Receiver<Message>) -> Snapshot {
    let mut current = Snapshot::default();
    for message in rx {
        match message {
            Message::Unit(unit) => {
                current.total.add(&unit);
                current.merged += 1;
            }
            Message::Snapshot(reply) => {
                // The requester may have gone away; nothing to do then.
                let _ = reply.send(current);
            }
        }
    }
    tracing::debug!(merged = current.merged, total = ?current.total, "aggregator drained");
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(n: u64) -> DiffUnit {
        DiffUnit {
            last_executable_lines: n * 4,
            last_covered_lines: n * 3,
            current_executable_lines: n * 2,
            current_covered_lines: n,
        }
    }

    #[test]
    fn test_snapshot_of_nothing() {
        let mut agg = Aggregator::spawn().unwrap();
        assert_eq!(agg.snapshot(), Snapshot::default());
        assert_eq!(agg.finish(), Snapshot::default());
    }

    #[test]
    fn test_snapshot_sees_every_unit_sent() {
        let mut agg = Aggregator::spawn().unwrap();
        for n in 1..=1000 {
            agg.merge(unit(n));
        }
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.merged, 1000);
        assert_eq!(agg.sent(), 1000);
        assert_eq!(snapshot.total.current_covered_lines, 500_500);
        assert_eq!(snapshot.total.current_executable_lines, 1_001_000);
        assert_eq!(snapshot.total.last_covered_lines, 1_501_500);
        assert_eq!(snapshot.total.last_executable_lines, 2_002_000);
    }

    #[test]
    fn test_interleaved_snapshots() {
        let mut agg = Aggregator::spawn().unwrap();
        agg.merge(unit(1));
        assert_eq!(agg.snapshot().total, unit(1));
        agg.merge(unit(2));
        agg.merge(unit(3));
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.merged, 3);
        assert_eq!(snapshot.total, unit(6));
        assert_eq!(agg.finish(), snapshot);
    }

    #[test]
    fn test_producer_on_another_thread() {
        let mut agg = Aggregator::spawn().unwrap();
        let mut agg = thread::spawn(move || {
            for _ in 0..250 {
                agg.merge(unit(2));
            }
            agg
        })
        .join()
        .unwrap();
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.merged, 250);
        assert_eq!(snapshot.total, unit(500));
    }
}
