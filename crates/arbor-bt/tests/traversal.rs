mod common;

use arbor_bt::{
    AbortType, BtStatus, Node, Parallel, ParallelSelector, RandomSelector, RandomSequence,
    Selector, Sequence,
};
use arbor_core::{DeterministicRng, SplitMix64};
use common::{cursor, Rig};

#[test]
fn empty_sequence_succeeds_and_empty_selector_fails() {
    let mut rig = Rig::new();

    let mut sequence = Node::new(Sequence::new(AbortType::None));
    assert_eq!(rig.tick(&mut sequence), BtStatus::Success);

    let mut selector = Node::new(Selector::new(AbortType::None));
    assert_eq!(rig.tick(&mut selector), BtStatus::Failure);
}

#[test]
fn sequence_runs_one_child_per_tick() {
    let mut rig = Rig::new();
    for name in ["a", "b", "c"] {
        rig.world.set_result(name, BtStatus::Success);
    }
    let mut root = Node::new(
        Sequence::new(AbortType::None)
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b"))
            .with_child(rig.probe("c")),
    );

    assert_eq!(rig.tick(&mut root), BtStatus::Running);
    assert_eq!(rig.count("update:a"), 1);
    assert_eq!(rig.count("update:b"), 0);

    assert_eq!(rig.tick(&mut root), BtStatus::Running);
    assert_eq!(rig.count("update:b"), 1);
    assert_eq!(rig.count("update:c"), 0);

    assert_eq!(rig.tick(&mut root), BtStatus::Success);
    assert_eq!(rig.count("update:c"), 1);
    assert_eq!(rig.count("update:a"), 1);
    assert_eq!(cursor(&mut root), 0);
}

#[test]
fn selector_stops_at_first_success() {
    let mut rig = Rig::new();
    rig.world.set_result("a", BtStatus::Failure);
    rig.world.set_result("b", BtStatus::Success);
    rig.world.set_result("c", BtStatus::Success);
    let mut root = Node::new(
        Selector::new(AbortType::None)
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b"))
            .with_child(rig.probe("c")),
    );

    assert_eq!(rig.tick(&mut root), BtStatus::Running);
    assert_eq!(rig.tick(&mut root), BtStatus::Success);
    assert_eq!(rig.count("update:c"), 0);
    assert_eq!(rig.count("start:c"), 0);
}

#[test]
fn exhausted_selector_fails_and_rewinds() {
    let mut rig = Rig::new();
    rig.world.set_result("a", BtStatus::Failure);
    rig.world.set_result("b", BtStatus::Failure);
    let mut root = Node::new(
        Selector::new(AbortType::None)
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b")),
    );

    assert_eq!(rig.tick(&mut root), BtStatus::Running);
    assert_eq!(rig.tick(&mut root), BtStatus::Failure);
    assert_eq!(cursor(&mut root), 0);
}

#[test]
fn running_child_is_resumed_without_touching_siblings() {
    let mut rig = Rig::new();
    rig.world.set_result("a", BtStatus::Success);
    let mut root = Node::new(
        Sequence::new(AbortType::None)
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b"))
            .with_child(rig.probe("c")),
    );

    for _ in 0..4 {
        assert_eq!(rig.tick(&mut root), BtStatus::Running);
    }

    assert_eq!(rig.count("update:a"), 1);
    assert_eq!(rig.count("update:b"), 3);
    assert_eq!(rig.count("start:b"), 1);
    assert_eq!(rig.count("update:c"), 0);
    assert_eq!(root.children()[0].status(), BtStatus::Success);
    assert_eq!(root.children()[2].status(), BtStatus::NotStarted);
}

#[test]
fn sequence_failure_short_circuits() {
    let mut rig = Rig::new();
    rig.world.set_result("a", BtStatus::Success);
    rig.world.set_result("b", BtStatus::Failure);
    let mut root = Node::new(
        Sequence::new(AbortType::None)
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b"))
            .with_child(rig.probe("c")),
    );

    assert_eq!(rig.tick(&mut root), BtStatus::Running);
    assert_eq!(rig.tick(&mut root), BtStatus::Failure);
    assert_eq!(rig.count("update:c"), 0);
    assert_eq!(cursor(&mut root), 0);
}

#[test]
fn finished_composite_starts_over_with_fresh_children() {
    let mut rig = Rig::new();
    rig.world.set_result("a", BtStatus::Success);
    let mut root = Node::new(Sequence::new(AbortType::None).with_child(rig.probe("a")));

    assert_eq!(rig.tick(&mut root), BtStatus::Success);
    assert_eq!(rig.tick(&mut root), BtStatus::Success);

    assert_eq!(rig.count("start:a"), 2);
    assert_eq!(rig.count("end:a"), 2);
}

#[test]
fn cursor_stays_in_bounds() {
    let names = ["a", "b", "c", "d"];
    let statuses = [BtStatus::Success, BtStatus::Failure, BtStatus::Running];
    let mut rng = SplitMix64::new(7);

    let mut rig = Rig::new();
    let mut sequence = Node::new(
        names
            .iter()
            .fold(Sequence::new(AbortType::Both), |s, n| s.with_child(rig.probe(*n))),
    );
    let mut selector = Node::new(
        names
            .iter()
            .fold(Selector::new(AbortType::Both), |s, n| s.with_child(rig.probe(*n))),
    );

    for _ in 0..200 {
        for name in names {
            let pick = statuses[rng.next_below(statuses.len())];
            rig.world.set_result(name, pick);
        }
        rig.tick(&mut sequence);
        rig.tick(&mut selector);
        assert!(cursor(&mut sequence) < names.len());
        assert!(cursor(&mut selector) < names.len());
    }
}

#[test]
fn parallel_needs_every_child() {
    let mut rig = Rig::new();
    let mut root = Node::new(
        Parallel::new()
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b")),
    );

    rig.world.set_result("a", BtStatus::Success);
    assert_eq!(rig.tick(&mut root), BtStatus::Running);
    assert_eq!(rig.count("update:a"), 1);
    assert_eq!(rig.count("update:b"), 1);

    rig.world.set_result("b", BtStatus::Success);
    assert_eq!(rig.tick(&mut root), BtStatus::Success);

    rig.world.set_result("a", BtStatus::Failure);
    rig.clear_journal();
    assert_eq!(rig.tick(&mut root), BtStatus::Failure);
    // Stops at the first failure.
    assert_eq!(rig.count("update:b"), 0);

    let mut empty = Node::new(Parallel::new());
    assert_eq!(rig.tick(&mut empty), BtStatus::Success);
}

#[test]
fn parallel_selector_needs_any_child() {
    let mut rig = Rig::new();
    let mut root = Node::new(
        ParallelSelector::new()
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b")),
    );

    rig.world.set_result("a", BtStatus::Failure);
    assert_eq!(rig.tick(&mut root), BtStatus::Running);

    rig.world.set_result("b", BtStatus::Failure);
    assert_eq!(rig.tick(&mut root), BtStatus::Failure);

    rig.world.set_result("a", BtStatus::Success);
    rig.clear_journal();
    assert_eq!(rig.tick(&mut root), BtStatus::Success);
    assert_eq!(rig.count("update:b"), 0);

    let mut empty = Node::new(ParallelSelector::new());
    assert_eq!(rig.tick(&mut empty), BtStatus::Failure);
}

fn random_sequence_order(seed: u64) -> Vec<String> {
    let mut rig = Rig::new();
    let names = ["a", "b", "c", "d", "e"];
    for name in names {
        rig.world.set_result(name, BtStatus::Success);
    }
    let mut root = Node::new(
        names
            .iter()
            .fold(RandomSequence::new(AbortType::None, seed), |s, n| {
                s.with_child(rig.probe(*n))
            }),
    );
    for _ in 0..names.len() {
        rig.tick(&mut root);
    }
    rig.entries()
        .into_iter()
        .filter(|e| e.starts_with("update:"))
        .collect()
}

#[test]
fn random_sequence_visits_every_child_once_in_seeded_order() {
    let first = random_sequence_order(42);
    let again = random_sequence_order(42);
    assert_eq!(first, again);

    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        vec!["update:a", "update:b", "update:c", "update:d", "update:e"]
    );
}

#[test]
fn random_selector_stops_at_first_success() {
    let mut rig = Rig::new();
    rig.world.set_result("a", BtStatus::Success);
    rig.world.set_result("b", BtStatus::Success);
    rig.world.set_result("c", BtStatus::Success);
    let mut root = Node::new(
        RandomSelector::new(AbortType::None, 9)
            .with_child(rig.probe("a"))
            .with_child(rig.probe("b"))
            .with_child(rig.probe("c")),
    );

    assert_eq!(rig.tick(&mut root), BtStatus::Success);
    let updates = rig
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("update:"))
        .count();
    assert_eq!(updates, 1);
}
