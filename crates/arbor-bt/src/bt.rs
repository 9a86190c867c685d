use arbor_core::{Blackboard, TickContext};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::composite::Composite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BtStatus {
    /// Never ticked since creation or the last invalidation.
    #[default]
    NotStarted,
    Success,
    Failure,
    Running,
}

impl BtStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BtStatus::Success | BtStatus::Failure)
    }

    /// Success <-> Failure; everything else is returned unchanged.
    pub fn invert(self) -> Self {
        match self {
            BtStatus::Success => BtStatus::Failure,
            BtStatus::Failure => BtStatus::Success,
            other => other,
        }
    }

    pub fn from_bool(success: bool) -> Self {
        if success {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }
}

/// Who may interrupt a running branch of a composite.
///
/// A closed set backed by two bits: `LowerPriority = 0b01`, `SelfAbort = 0b10`,
/// `Both = 0b11`. Test membership with [`AbortType::has`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum AbortType {
    #[default]
    None = 0b00,
    /// A leading conditional of this composite may preempt running siblings that come
    /// after it in the parent.
    LowerPriority = 0b01,
    /// Conditionals already passed inside this composite are re-checked while later
    /// children run.
    SelfAbort = 0b10,
    Both = 0b11,
}

impl AbortType {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Only the two low bits are meaningful; the rest are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => AbortType::LowerPriority,
            0b10 => AbortType::SelfAbort,
            0b11 => AbortType::Both,
            _ => AbortType::None,
        }
    }

    pub const fn has(self, flag: AbortType) -> bool {
        self.bits() & flag.bits() == flag.bits()
    }
}

/// Capability view of a node, used by the abort machinery to tell tests from actions
/// without probing concrete types.
pub enum NodeKind<'a, C: 'static> {
    Action,
    Conditional(&'a mut dyn Conditional<C>),
    Composite(&'a mut Composite<C>),
}

/// Per-node logic. The lifecycle around it lives in [`Node::tick`] and is the same for
/// every node.
pub trait Behavior<C>: 'static
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus;

    /// Called before the first `update` of an activation.
    fn on_start(&mut self) {}

    /// Called after an `update` that returned anything other than `Running`.
    ///
    /// Not called when the node is invalidated while running: forced invalidation abandons
    /// the activation and only resets state. Leaves that hold external resources must not
    /// rely on `on_end` alone to release them.
    fn on_end(&mut self) {}

    /// Reset internal state and invalidate children. The owning [`Node`] has already reset
    /// its status when this runs.
    fn invalidate(&mut self) {}

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Action
    }

    fn children(&self) -> &[Node<C>] {
        &[]
    }

    fn into_node(self) -> Node<C>
    where
        Self: Sized,
    {
        Node::new(self)
    }
}

/// A side-effect-free yes/no test.
///
/// `evaluate` is what composites call when re-checking an already-passed conditional for
/// an abort: it must not go through the lifecycle and `force` asks implementations that
/// cache their reading to take a fresh one.
pub trait Conditional<C>: Behavior<C>
where
    C: 'static,
{
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
        force: bool,
    ) -> BtStatus {
        let _ = force;
        self.update(ctx, context, blackboard)
    }
}

/// A node in the tree: a status plus the behavior that produces it.
pub struct Node<C>
where
    C: 'static,
{
    status: BtStatus,
    behavior: Box<dyn Behavior<C>>,
}

impl<C> Node<C>
where
    C: 'static,
{
    pub fn new(behavior: impl Behavior<C>) -> Self {
        Self {
            status: BtStatus::NotStarted,
            behavior: Box::new(behavior),
        }
    }

    pub fn status(&self) -> BtStatus {
        self.status
    }

    /// Start the node if needed, update it, and end it when it stops running.
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        if self.status == BtStatus::NotStarted {
            self.behavior.on_start();
        }

        let status = self.behavior.update(ctx, context, blackboard);
        debug_assert_ne!(
            status,
            BtStatus::NotStarted,
            "update must not report NotStarted"
        );
        self.status = status;

        if status != BtStatus::Running {
            self.behavior.on_end();
        }
        status
    }

    /// Run the behavior's `update` without touching status or lifecycle hooks.
    pub fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.behavior.update(ctx, context, blackboard)
    }

    /// Force this node and all of its descendants back to `NotStarted`.
    ///
    /// Running work is dropped on the floor: `on_end` is NOT called for this node or any
    /// descendant.
    pub fn invalidate(&mut self) {
        self.status = BtStatus::NotStarted;
        self.behavior.invalidate();
    }

    pub fn kind(&mut self) -> NodeKind<'_, C> {
        self.behavior.kind()
    }

    pub fn is_conditional(&mut self) -> bool {
        matches!(self.kind(), NodeKind::Conditional(_))
    }

    pub fn children(&self) -> &[Node<C>] {
        self.behavior.children()
    }

    /// Visit this node and every descendant, depth first.
    pub fn walk(&self, f: &mut dyn FnMut(&Node<C>)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

impl<C> std::fmt::Debug for Node<C>
where
    C: 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("status", &self.status)
            .field("children", &self.children().len())
            .finish()
    }
}
