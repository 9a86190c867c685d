use arbor_bt::{
    AbortType, BehaviorTree, BtStatus, Condition, ExecuteAction, Node, Selector, Sequence,
};
use arbor_core::{Blackboard, TickContext};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[derive(Default)]
struct Agent {
    alert: bool,
    steps: u64,
}

fn patrol_tree(conditions: usize) -> BehaviorTree<Agent> {
    let mut guard = Sequence::new(AbortType::LowerPriority);
    guard.add_child(
        Condition::new(|_: &TickContext, a: &Agent, _: &Blackboard| a.alert).into_node(),
    );
    guard.add_child(
        ExecuteAction::new(|_: &TickContext, _: &mut Agent, _: &mut Blackboard| {
            BtStatus::Running
        })
        .into_node(),
    );

    let mut patrol = Sequence::new(AbortType::SelfAbort);
    for _ in 0..conditions {
        patrol.add_child(
            Condition::new(|_: &TickContext, a: &Agent, _: &Blackboard| !a.alert).into_node(),
        );
    }
    patrol.add_child(
        ExecuteAction::new(|_: &TickContext, a: &mut Agent, _: &mut Blackboard| {
            a.steps += 1;
            BtStatus::Running
        })
        .into_node(),
    );

    let root = Selector::new(AbortType::None)
        .with_child(Node::new(guard))
        .with_child(Node::new(patrol));
    BehaviorTree::new(Agent::default(), Node::new(root))
}

fn bench_bt_tick(c: &mut Criterion) {
    let mut tree = patrol_tree(32);
    c.bench_function("arbor-bt/tick(conditions=32)", |b| {
        b.iter(|| {
            black_box(tree.tick(black_box(0.25)));
        })
    });

    let mut tree = patrol_tree(32);
    c.bench_function("arbor-bt/tick+abort(conditions=32)", |b| {
        b.iter(|| {
            let alert = !tree.context().alert;
            tree.context_mut().alert = alert;
            black_box(tree.tick(black_box(0.25)));
        })
    });
}

criterion_group!(benches, bench_bt_tick);
criterion_main!(benches);
