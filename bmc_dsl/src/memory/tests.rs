//! Unit tests for resource memory ordering.

use rstest::rstest;

use super::{MemorySorter, ResourceMemory, TreeElement};
use crate::error::MemoryError;

/// A tree element identified by its slash-separated path.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct Path(&'static str);

impl TreeElement for Path {
    fn parent(&self) -> Option<Self> {
        self.0.rsplit_once('/').map(|(parent, _)| Self(parent))
    }
}

fn paths(raw: &[&'static str]) -> Vec<Path> {
    raw.iter().copied().map(Path).collect()
}

fn sorted(raw: &[&'static str]) -> Vec<&'static str> {
    let recorded = paths(raw);
    MemorySorter::new(&recorded)
        .sort()
        .into_iter()
        .map(|path| path.0)
        .collect()
}

#[rstest]
#[case::reversed(
    &["root/child1/grandchild", "root/child1", "root", "root/child2"],
    &["root", "root/child1", "root/child2", "root/child1/grandchild"],
)]
#[case::already_ordered(&["root", "root/a", "root/a/b"], &["root", "root/a", "root/a/b"])]
#[case::skipped_levels(&["root/a/b/c", "root"], &["root", "root/a/b/c"])]
#[case::no_recorded_ancestor(
    &["root/system/eth1", "chassis", "manager/eth2"],
    &["chassis", "manager/eth2", "root/system/eth1"],
)]
#[case::empty(&[], &[])]
fn ancestors_precede_descendants(#[case] recorded: &[&'static str], #[case] expected: &[&'static str]) {
    assert_eq!(sorted(recorded), expected);
}

#[test]
fn siblings_keep_first_reached_order() {
    assert_eq!(
        sorted(&["root/b", "root/a", "root/c"]),
        ["root/b", "root/a", "root/c"]
    );
}

#[test]
fn duplicates_are_emitted_once() {
    assert_eq!(
        sorted(&["root/a", "root", "root/a", "root"]),
        ["root", "root/a"]
    );
}

#[test]
fn breadth_first_across_branches() {
    let order = sorted(&[
        "root",
        "root/system1",
        "root/system1/eth1",
        "root/chassis1",
        "root/manager1",
        "root/manager1/eth2",
    ]);
    assert_eq!(
        order,
        [
            "root",
            "root/system1",
            "root/chassis1",
            "root/manager1",
            "root/system1/eth1",
            "root/manager1/eth2",
        ]
    );
}

#[test]
fn open_discards_previous_recordings() {
    let mut memory = ResourceMemory::new();
    memory.open();
    memory.record(Path("root"));
    memory.close();
    assert_eq!(memory.recorded(), [Path("root")]);
    memory.open();
    assert!(memory.recorded().is_empty());
    assert!(memory.is_open());
}

#[test]
fn reopening_keeps_only_later_recordings() {
    let mut memory = ResourceMemory::new();
    memory.open();
    memory.record(Path("root/a"));
    memory.open();
    memory.record(Path("root"));
    assert!(memory.is_open());
    assert_eq!(memory.fetch_ordered_resources(), [Path("root")]);
}

#[test]
fn record_ignores_open_state() {
    let mut memory = ResourceMemory::new();
    memory.record(Path("root/a"));
    memory.record(Path("root"));
    assert!(!memory.is_open());
    assert_eq!(memory.fetch_ordered_resources(), paths(&["root", "root/a"]));
}

#[test]
fn remember_requires_open_memory() {
    let mut memory = ResourceMemory::new();
    assert_eq!(memory.remember(Path("root")), Err(MemoryError::NotOpen));
    memory.open();
    assert_eq!(memory.remember(Path("root")), Ok(Path("root")));
    assert_eq!(memory.recorded(), [Path("root")]);
}

#[test]
fn memorize_orders_and_closes() -> Result<(), MemoryError> {
    let mut memory = ResourceMemory::new();
    let ordered = memory.memorize(|recording| {
        recording.remember(Path("root/system1/eth1"))?;
        recording.remember(Path("root"))?;
        recording.remember(Path("root/system1"))?;
        Ok::<(), MemoryError>(())
    })?;
    assert_eq!(ordered, paths(&["root", "root/system1", "root/system1/eth1"]));
    assert!(!memory.is_open());
    Ok(())
}

#[test]
fn memorize_rejects_nesting() {
    let mut memory: ResourceMemory<Path> = ResourceMemory::new();
    let result = memory.memorize(|recording| {
        recording
            .memorize(|_| Ok::<(), MemoryError>(()))
            .map(drop)
    });
    assert_eq!(result, Err(MemoryError::AlreadyOpen));
    assert!(!memory.is_open());
}

#[test]
fn memorize_closes_after_failure() {
    let mut memory = ResourceMemory::new();
    let result = memory.memorize(|recording| {
        recording.remember(Path("root"))?;
        Err(MemoryError::NotOpen)
    });
    assert_eq!(result, Err(MemoryError::NotOpen));
    assert!(!memory.is_open());
}
