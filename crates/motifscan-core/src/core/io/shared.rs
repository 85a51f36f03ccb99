use super::traits::{SourceError, StructureSource};
use crate::core::models::system::MolecularSystem;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// One item taken from a [`SharedSource`], tagged with its position in the stream.
#[derive(Debug)]
pub struct PulledTarget {
    pub index: usize,
    pub structure: Result<MolecularSystem, SourceError>,
}

#[derive(Debug)]
struct SourceState<S> {
    source: S,
    next_index: usize,
}

/// A structure source that many workers may pull from concurrently.
///
/// Every pull happens under one mutex, so each worker obtains a distinct item and
/// indices follow the source order. A stop flag ends the stream early: once set,
/// no further items are taken.
#[derive(Debug)]
pub struct SharedSource<S: StructureSource> {
    state: Mutex<SourceState<S>>,
    stopped: AtomicBool,
}

impl<S: StructureSource> SharedSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: Mutex::new(SourceState {
                source,
                next_index: 0,
            }),
            stopped: AtomicBool::new(false),
        }
    }

    /// Takes the next item, or `None` when the source is exhausted or stopped.
    pub fn pull(&self) -> Option<PulledTarget> {
        if self.is_stopped() {
            return None;
        }
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.source.has_next() {
            return None;
        }
        let index = state.next_index;
        state.next_index += 1;
        let structure = state.source.next_structure();
        Some(PulledTarget { index, structure })
    }

    /// Signals that no further items should be handed out.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Number of items handed out so far.
    pub fn pulled(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .next_index
    }

    pub fn remaining_hint(&self) -> Option<usize> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .source
            .remaining_hint()
    }

    pub fn into_inner(self) -> S {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::traits::InMemorySource;
    use std::collections::HashSet;
    use std::thread;

    fn source_of(n: usize) -> InMemorySource {
        (0..n)
            .map(|i| MolecularSystem::new(&format!("s{i}")))
            .collect()
    }

    #[test]
    fn pulls_assign_sequential_indices() {
        let shared = SharedSource::new(source_of(3));
        let indices: Vec<_> = std::iter::from_fn(|| shared.pull())
            .map(|target| target.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(shared.pulled(), 3);
        assert!(shared.pull().is_none());
    }

    #[test]
    fn stop_prevents_further_pulls() {
        let shared = SharedSource::new(source_of(5));
        assert!(shared.pull().is_some());
        shared.stop();
        assert!(shared.pull().is_none());
        assert_eq!(shared.into_inner().remaining_hint(), Some(4));
    }

    #[test]
    fn concurrent_workers_each_receive_distinct_items() {
        let shared = SharedSource::new(source_of(64));
        let labels: Vec<String> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut seen = Vec::new();
                        while let Some(target) = shared.pull() {
                            seen.push(target.structure.unwrap().label().to_string());
                        }
                        seen
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(labels.len(), 64);
        assert_eq!(unique.len(), 64);
    }
}
