//! Fluent tree construction.
//!
//! Composites are opened with `sequence`/`selector`/... and closed with `end_composite`.
//! A decorator wraps whatever node is added right after it. Errors are recorded as they
//! happen and reported by `build`; later calls after the first error are ignored.
//!
//! ```
//! use arbor_bt::{AbortType, BehaviorTreeBuilder, BtStatus};
//!
//! #[derive(Default)]
//! struct Guard {
//!     sees_enemy: bool,
//!     shots: u32,
//! }
//!
//! let tree = BehaviorTreeBuilder::begin(Guard::default())
//!     .selector(AbortType::None)
//!         .sequence(AbortType::LowerPriority)
//!             .condition(|_, g: &Guard, _| g.sees_enemy)
//!             .action(|_, g: &mut Guard, _| {
//!                 g.shots += 1;
//!                 BtStatus::Success
//!             })
//!         .end_composite()
//!         .log("patrolling")
//!     .end_composite()
//!     .build(0.0)
//!     .unwrap();
//! # let _ = tree;
//! ```

use std::borrow::Cow;
use std::num::NonZeroU32;

use arbor_core::{Blackboard, TickContext};

use crate::bt::{AbortType, Behavior, BtStatus, Node};
use crate::config::TreeConfig;
use crate::decorators::{
    AlwaysFail, AlwaysSucceed, ConditionalDecorator, Inverter, Repeater, UntilFail, UntilSuccess,
};
use crate::error::{BtError, Result};
use crate::leaves::{
    ActionConditional, Condition, ExecuteAction, LogAction, RandomProbability, TreeReference,
    WaitAction,
};
use crate::nodes::{Parallel, ParallelSelector, RandomSelector, RandomSequence, Selector, Sequence};
use crate::tree::BehaviorTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompositeKind {
    Sequence,
    Selector,
    Parallel,
    ParallelSelector,
    RandomSequence(u64),
    RandomSelector(u64),
}

type Wrap<C> = Box<dyn FnOnce(Node<C>) -> Node<C>>;

enum Frame<C>
where
    C: 'static,
{
    Composite {
        kind: CompositeKind,
        abort_type: AbortType,
        children: Vec<Node<C>>,
    },
    Decorator {
        name: &'static str,
        wrap: Wrap<C>,
    },
}

fn build_composite<C>(kind: CompositeKind, abort_type: AbortType, children: Vec<Node<C>>) -> Node<C>
where
    C: 'static,
{
    match kind {
        CompositeKind::Sequence => Sequence::with_children(abort_type, children).into_node(),
        CompositeKind::Selector => Selector::with_children(abort_type, children).into_node(),
        CompositeKind::Parallel => children
            .into_iter()
            .fold(Parallel::new(), Parallel::with_child)
            .into_node(),
        CompositeKind::ParallelSelector => children
            .into_iter()
            .fold(ParallelSelector::new(), ParallelSelector::with_child)
            .into_node(),
        CompositeKind::RandomSequence(seed) => children
            .into_iter()
            .fold(RandomSequence::new(abort_type, seed), RandomSequence::with_child)
            .into_node(),
        CompositeKind::RandomSelector(seed) => children
            .into_iter()
            .fold(RandomSelector::new(abort_type, seed), RandomSelector::with_child)
            .into_node(),
    }
}

pub struct BehaviorTreeBuilder<C>
where
    C: 'static,
{
    context: C,
    stack: Vec<Frame<C>>,
    root: Option<Node<C>>,
    error: Option<BtError>,
}

impl<C> BehaviorTreeBuilder<C>
where
    C: 'static,
{
    pub fn begin(context: C) -> Self {
        Self {
            context,
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn fail(&mut self, error: BtError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn open(mut self, kind: CompositeKind, abort_type: AbortType) -> Self {
        if self.error.is_none() {
            self.stack.push(Frame::Composite {
                kind,
                abort_type,
                children: Vec::new(),
            });
        }
        self
    }

    fn decorate(mut self, name: &'static str, wrap: Wrap<C>) -> Self {
        if self.error.is_none() {
            self.stack.push(Frame::Decorator { name, wrap });
        }
        self
    }

    /// Hand a finished node to whatever is open: decorators wrap it (and close), the
    /// innermost composite adopts it, or it becomes the root.
    fn attach(&mut self, mut node: Node<C>) {
        loop {
            match self.stack.last_mut() {
                Some(Frame::Composite { children, .. }) => {
                    children.push(node);
                    return;
                }
                Some(Frame::Decorator { .. }) => {
                    if let Some(Frame::Decorator { wrap, .. }) = self.stack.pop() {
                        node = wrap(node);
                    }
                }
                None => {
                    if self.root.is_some() {
                        self.fail(BtError::MultipleRoots);
                    } else {
                        self.root = Some(node);
                    }
                    return;
                }
            }
        }
    }

    fn leaf(mut self, node: Result<Node<C>>) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.stack.is_empty() {
            self.fail(BtError::UnnestedLeaf);
            return self;
        }
        match node {
            Ok(node) => self.attach(node),
            Err(e) => self.fail(e),
        }
        self
    }

    // Composites

    pub fn sequence(self, abort_type: AbortType) -> Self {
        self.open(CompositeKind::Sequence, abort_type)
    }

    pub fn selector(self, abort_type: AbortType) -> Self {
        self.open(CompositeKind::Selector, abort_type)
    }

    pub fn parallel(self) -> Self {
        self.open(CompositeKind::Parallel, AbortType::None)
    }

    pub fn parallel_selector(self) -> Self {
        self.open(CompositeKind::ParallelSelector, AbortType::None)
    }

    pub fn random_sequence(self, abort_type: AbortType, seed: u64) -> Self {
        self.open(CompositeKind::RandomSequence(seed), abort_type)
    }

    pub fn random_selector(self, abort_type: AbortType, seed: u64) -> Self {
        self.open(CompositeKind::RandomSelector(seed), abort_type)
    }

    pub fn end_composite(mut self) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.stack.pop() {
            Some(Frame::Composite {
                kind,
                abort_type,
                children,
            }) => {
                let node = build_composite(kind, abort_type, children);
                self.attach(node);
            }
            Some(Frame::Decorator { name, .. }) => self.fail(BtError::DecoratorWithoutChild(name)),
            None => self.fail(BtError::UnbalancedEnd),
        }
        self
    }

    // Decorators

    pub fn inverter(self) -> Self {
        self.decorate("inverter", Box::new(|child| Inverter::new(child).into_node()))
    }

    pub fn always_succeed(self) -> Self {
        self.decorate(
            "always_succeed",
            Box::new(|child| AlwaysSucceed::new(child).into_node()),
        )
    }

    pub fn always_fail(self) -> Self {
        self.decorate(
            "always_fail",
            Box::new(|child| AlwaysFail::new(child).into_node()),
        )
    }

    pub fn repeater(mut self, count: u32) -> Self {
        let Some(count) = NonZeroU32::new(count) else {
            self.fail(BtError::InvalidRepeatCount(count));
            return self;
        };
        self.decorate(
            "repeater",
            Box::new(move |child| Repeater::times(count, child).into_node()),
        )
    }

    pub fn repeat_forever(self) -> Self {
        self.decorate(
            "repeat_forever",
            Box::new(|child| Repeater::forever(child).into_node()),
        )
    }

    pub fn until_success(self) -> Self {
        self.decorate(
            "until_success",
            Box::new(|child| UntilSuccess::new(child).into_node()),
        )
    }

    pub fn until_fail(self) -> Self {
        self.decorate(
            "until_fail",
            Box::new(|child| UntilFail::new(child).into_node()),
        )
    }

    /// Gate the next node on `cond`.
    pub fn conditional_decorator<F>(self, cond: F, reevaluate: bool) -> Self
    where
        F: FnMut(&TickContext, &C, &Blackboard) -> bool + 'static,
    {
        self.decorate(
            "conditional_decorator",
            Box::new(move |child| {
                ConditionalDecorator::new(Condition::<C, F>::new(cond), child)
                    .with_reevaluate(reevaluate)
                    .into_node()
            }),
        )
    }

    // Leaves

    pub fn action<F>(self, action: F) -> Self
    where
        F: FnMut(&TickContext, &mut C, &mut Blackboard) -> BtStatus + 'static,
    {
        self.leaf(Ok(ExecuteAction::<C, F>::new(action).into_node()))
    }

    pub fn condition<F>(self, cond: F) -> Self
    where
        F: FnMut(&TickContext, &C, &Blackboard) -> bool + 'static,
    {
        self.leaf(Ok(Condition::<C, F>::new(cond).into_node()))
    }

    pub fn action_conditional<F>(self, test: F) -> Self
    where
        F: FnMut(&TickContext, &C, &Blackboard) -> BtStatus + 'static,
    {
        self.leaf(Ok(ActionConditional::<C, F>::new(test).into_node()))
    }

    pub fn random_probability(self, probability: f32, seed: u64) -> Self {
        let node = RandomProbability::new(probability, seed).map(Node::new);
        self.leaf(node)
    }

    pub fn wait(self, seconds: f32) -> Self {
        let node = WaitAction::new(seconds).map(Node::new);
        self.leaf(node)
    }

    pub fn log(self, text: impl Into<Cow<'static, str>>) -> Self {
        self.leaf(Ok(LogAction::new(text).into_node()))
    }

    pub fn log_error(self, text: impl Into<Cow<'static, str>>) -> Self {
        self.leaf(Ok(LogAction::error(text).into_node()))
    }

    pub fn sub_tree<S>(self, tree: BehaviorTree<S>) -> Self
    where
        S: 'static,
    {
        self.leaf(Ok(TreeReference::new(tree).into_node()))
    }

    /// Add any custom behavior as a leaf.
    pub fn node(self, behavior: impl Behavior<C>) -> Self {
        self.leaf(Ok(behavior.into_node()))
    }

    // Finish

    pub fn build(self, update_period: f32) -> Result<BehaviorTree<C>> {
        self.build_with_config(TreeConfig::default().with_update_period(update_period))
    }

    pub fn build_with_config(self, config: TreeConfig) -> Result<BehaviorTree<C>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.stack.last() {
            Some(Frame::Decorator { name, .. }) => {
                return Err(BtError::DecoratorWithoutChild(*name));
            }
            Some(Frame::Composite { .. }) => {
                let open = self
                    .stack
                    .iter()
                    .filter(|frame| matches!(frame, Frame::Composite { .. }))
                    .count();
                return Err(BtError::UnclosedComposite(open));
            }
            None => {}
        }
        let root = self.root.ok_or(BtError::EmptyTree)?;
        BehaviorTree::with_config(self.context, root, config)
    }
}
