//! State and abort machinery shared by every branching node.
//!
//! A composite resumes from `current_child_index` on each tick instead of re-walking its
//! children. Conditional aborts are the only way that cursor moves backward: a child
//! before the cursor that is (or leads with) a conditional gets re-tested, and when its
//! answer flips the cursor snaps back to it and everything from there on is invalidated.

use arbor_core::{Blackboard, TickContext};
use arbor_tools::{emit as trace_emit, TraceEvent};

use crate::bt::{AbortType, BtStatus, Node, NodeKind};

pub struct Composite<C>
where
    C: 'static,
{
    children: Vec<Node<C>>,
    abort_type: AbortType,
    current_child_index: usize,
    has_lower_priority_conditional_abort: bool,
}

impl<C> Composite<C>
where
    C: 'static,
{
    pub fn new(abort_type: AbortType) -> Self {
        Self {
            children: Vec::new(),
            abort_type,
            current_child_index: 0,
            has_lower_priority_conditional_abort: false,
        }
    }

    /// Append a child. Only meaningful before the tree starts ticking; once a tree is
    /// handed to a driver there is no path back to a `&mut Composite` outside of `update`.
    pub fn add_child(&mut self, child: Node<C>) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Node<C>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node<C>] {
        &mut self.children
    }

    pub fn abort_type(&self) -> AbortType {
        self.abort_type
    }

    pub fn set_abort_type(&mut self, abort_type: AbortType) {
        self.abort_type = abort_type;
    }

    pub fn current_child_index(&self) -> usize {
        self.current_child_index
    }

    pub fn has_lower_priority_conditional_abort(&self) -> bool {
        self.has_lower_priority_conditional_abort
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn on_start(&mut self) {
        self.has_lower_priority_conditional_abort =
            self.has_lower_priority_conditional_abort_in_children();
        self.current_child_index = 0;
    }

    /// A finished composite starts over from its first child with fresh children.
    pub fn on_end(&mut self) {
        self.current_child_index = 0;
        for child in self.children.iter_mut() {
            child.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.current_child_index = 0;
        for child in self.children.iter_mut() {
            child.invalidate();
        }
    }

    pub fn is_first_child_conditional(&mut self) -> bool {
        self.children
            .first_mut()
            .map(|child| child.is_conditional())
            .unwrap_or(false)
    }

    /// True if any child is a lower-priority-abort composite that leads with a conditional.
    pub fn has_lower_priority_conditional_abort_in_children(&mut self) -> bool {
        self.children.iter_mut().any(|child| match child.kind() {
            NodeKind::Composite(composite) => {
                composite.abort_type.has(AbortType::LowerPriority)
                    && composite.is_first_child_conditional()
            }
            _ => false,
        })
    }

    /// Run the abort checks that apply to this composite: self first, then lower priority.
    ///
    /// `expected` is the status every already-passed child produced (`Success` for a
    /// sequence, `Failure` for a selector).
    pub fn handle_conditional_aborts(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
        expected: BtStatus,
    ) {
        if self.abort_type.has(AbortType::SelfAbort) {
            self.update_self_abort_conditional(ctx, context, blackboard, expected);
        }
        if self.has_lower_priority_conditional_abort {
            self.update_lower_priority_abort_conditional(ctx, context, blackboard, expected);
        }
    }

    /// Re-test conditional children before the cursor; the lowest index that flips wins.
    pub fn update_self_abort_conditional(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
        expected: BtStatus,
    ) {
        for i in 0..self.current_child_index {
            let status = match self.children[i].kind() {
                NodeKind::Conditional(conditional) => {
                    conditional.evaluate(ctx, context, blackboard, true)
                }
                _ => continue,
            };

            if status != expected {
                self.abort_to(i, ctx, blackboard, "bt.abort.self");
                break;
            }
        }
    }

    /// Re-test the leading conditional of lower-priority-abort composites before the
    /// cursor; the lowest index that flips wins.
    pub fn update_lower_priority_abort_conditional(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
        expected: BtStatus,
    ) {
        for i in 0..self.current_child_index {
            let status = match self.children[i].kind() {
                NodeKind::Composite(composite)
                    if composite.abort_type.has(AbortType::LowerPriority) =>
                {
                    let Some(first) = composite.children.first_mut() else {
                        continue;
                    };
                    match first.kind() {
                        NodeKind::Conditional(conditional) => {
                            conditional.evaluate(ctx, context, blackboard, true)
                        }
                        _ => continue,
                    }
                }
                _ => continue,
            };

            if status != expected {
                self.abort_to(i, ctx, blackboard, "bt.abort.lower_priority");
                break;
            }
        }
    }

    fn abort_to(
        &mut self,
        index: usize,
        ctx: &TickContext,
        blackboard: &mut Blackboard,
        tag: &'static str,
    ) {
        let previous = self.current_child_index;
        tracing::debug!(tick = ctx.tick, index, previous, tag, "conditional abort");
        trace_emit(
            blackboard,
            TraceEvent::new(ctx.tick, tag)
                .with_a(index as u64)
                .with_b(previous as u64),
        );

        self.current_child_index = index;
        for child in self.children[index..].iter_mut() {
            child.invalidate();
        }
    }

    pub(crate) fn advance(&mut self) -> bool {
        self.current_child_index += 1;
        if self.current_child_index >= self.children.len() {
            self.current_child_index = 0;
            false
        } else {
            true
        }
    }

    pub(crate) fn tick_current(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.children[self.current_child_index].tick(ctx, context, blackboard)
    }
}
