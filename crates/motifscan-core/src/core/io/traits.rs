use crate::core::models::system::MolecularSystem;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Failed to parse structure '{label}': {message}")]
    Parse { label: String, message: String },

    #[error("Structure source is exhausted")]
    Exhausted,
}

/// A sequential, stateful provider of parsed target structures.
///
/// Implementors are not required to be safe for concurrent use; batch searches
/// only ever reach a source through [`super::shared::SharedSource`], which
/// serializes every pull. Each item may fail individually without ending the
/// stream.
pub trait StructureSource: Send {
    /// Returns `true` while at least one more item can be taken.
    fn has_next(&self) -> bool;

    /// Takes the next structure, or the error raised while obtaining it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Parse`] if this item could not be produced and
    /// [`SourceError::Exhausted`] if called after `has_next` returned `false`.
    fn next_structure(&mut self) -> Result<MolecularSystem, SourceError>;

    /// Number of remaining items, when known in advance.
    fn remaining_hint(&self) -> Option<usize> {
        None
    }
}

/// A structure source backed by already-parsed structures held in memory.
#[derive(Debug, Default)]
pub struct InMemorySource {
    items: VecDeque<Result<MolecularSystem, SourceError>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, system: MolecularSystem) {
        self.items.push_back(Ok(system));
    }

    /// Queues an item that fails to load when it is taken.
    pub fn push_failure(&mut self, label: &str, message: &str) {
        self.items.push_back(Err(SourceError::Parse {
            label: label.to_string(),
            message: message.to_string(),
        }));
    }
}

impl FromIterator<MolecularSystem> for InMemorySource {
    fn from_iter<T: IntoIterator<Item = MolecularSystem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().map(Ok).collect(),
        }
    }
}

impl StructureSource for InMemorySource {
    fn has_next(&self) -> bool {
        !self.items.is_empty()
    }

    fn next_structure(&mut self) -> Result<MolecularSystem, SourceError> {
        self.items.pop_front().unwrap_or(Err(SourceError::Exhausted))
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_yields_items_in_order() {
        let mut source: InMemorySource = ["a", "b"]
            .into_iter()
            .map(MolecularSystem::new)
            .collect();

        assert_eq!(source.remaining_hint(), Some(2));
        assert_eq!(source.next_structure().unwrap().label(), "a");
        assert_eq!(source.next_structure().unwrap().label(), "b");
        assert!(!source.has_next());
        assert_eq!(source.next_structure().unwrap_err(), SourceError::Exhausted);
    }

    #[test]
    fn queued_failures_surface_as_parse_errors() {
        let mut source = InMemorySource::new();
        source.push_failure("broken", "truncated ATOM record");
        source.push(MolecularSystem::new("ok"));

        let err = source.next_structure().unwrap_err();
        assert!(matches!(err, SourceError::Parse { ref label, .. } if label == "broken"));
        assert!(err.to_string().contains("truncated ATOM record"));
        assert!(source.has_next());
        assert_eq!(source.next_structure().unwrap().label(), "ok");
    }
}
