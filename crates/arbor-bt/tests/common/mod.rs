#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use arbor_bt::{Behavior, BtStatus, Condition, Node, NodeKind};
use arbor_core::{Blackboard, TickContext};

/// Test context: scripted leaf results and condition flags, keyed by name.
#[derive(Debug, Default)]
pub struct World {
    pub results: BTreeMap<&'static str, BtStatus>,
    pub flags: BTreeMap<&'static str, bool>,
}

impl World {
    /// Scripted result for a probe; probes keep running until told otherwise.
    pub fn result(&self, name: &str) -> BtStatus {
        self.results.get(name).copied().unwrap_or(BtStatus::Running)
    }

    pub fn set_result(&mut self, name: &'static str, status: BtStatus) {
        self.results.insert(name, status);
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: &'static str, value: bool) {
        self.flags.insert(name, value);
    }
}

pub type Journal = Rc<RefCell<Vec<String>>>;

/// Leaf that writes every lifecycle call into a shared journal.
pub struct Probe {
    name: &'static str,
    journal: Journal,
}

impl Probe {
    fn record(&self, what: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{what}:{}", self.name));
    }
}

impl Behavior<World> for Probe {
    fn update(
        &mut self,
        _ctx: &TickContext,
        world: &mut World,
        _blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.record("update");
        world.result(self.name)
    }

    fn on_start(&mut self) {
        self.record("start");
    }

    fn on_end(&mut self) {
        self.record("end");
    }

    fn invalidate(&mut self) {
        self.record("invalidate");
    }
}

/// Condition leaf that reads `World::flag(name)`.
pub fn flag(name: &'static str) -> Node<World> {
    Condition::new(move |_: &TickContext, w: &World, _: &Blackboard| w.flag(name)).into_node()
}

pub fn cursor(node: &mut Node<World>) -> usize {
    match node.kind() {
        NodeKind::Composite(composite) => composite.current_child_index(),
        _ => panic!("not a composite"),
    }
}

/// Everything needed to tick a bare node by hand.
pub struct Rig {
    pub world: World,
    pub blackboard: Blackboard,
    pub journal: Journal,
    pub dt_seconds: f32,
    tick: u64,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            world: World::default(),
            blackboard: Blackboard::new(),
            journal: Rc::new(RefCell::new(Vec::new())),
            dt_seconds: 0.1,
            tick: 0,
        }
    }

    pub fn probe(&self, name: &'static str) -> Node<World> {
        Node::new(Probe {
            name,
            journal: Rc::clone(&self.journal),
        })
    }

    pub fn tick(&mut self, node: &mut Node<World>) -> BtStatus {
        let ctx = TickContext::new(self.tick, self.dt_seconds);
        self.tick += 1;
        node.tick(&ctx, &mut self.world, &mut self.blackboard)
    }

    pub fn entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.journal.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }
}
