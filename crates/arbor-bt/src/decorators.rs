use std::num::NonZeroU32;

use arbor_core::{Blackboard, TickContext};

use crate::bt::{Behavior, BtStatus, Conditional, Node, NodeKind};
use crate::error::{BtError, Result};

/// The single child every decorator wraps.
///
/// Decorators take their child at construction, so a decorator without a child cannot be
/// ticked; the builder reports a missing child as [`BtError::DecoratorWithoutChild`].
pub struct Decorator<C>
where
    C: 'static,
{
    child: Node<C>,
}

impl<C> Decorator<C>
where
    C: 'static,
{
    pub fn new(child: Node<C>) -> Self {
        Self { child }
    }

    pub fn child(&self) -> &Node<C> {
        &self.child
    }

    pub fn child_mut(&mut self) -> &mut Node<C> {
        &mut self.child
    }

    pub fn tick(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.child.tick(ctx, context, blackboard)
    }

    pub fn invalidate(&mut self) {
        self.child.invalidate();
    }

    pub fn children(&self) -> &[Node<C>] {
        std::slice::from_ref(&self.child)
    }
}

/// Swaps success and failure of its child.
///
/// When the child is a conditional the inverter is one too, so an inverted test can lead
/// a lower-priority abort branch.
pub struct Inverter<C>
where
    C: 'static,
{
    inner: Decorator<C>,
}

impl<C> Inverter<C>
where
    C: 'static,
{
    pub fn new(child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
        }
    }
}

impl<C> Behavior<C> for Inverter<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.inner.tick(ctx, context, blackboard).invert()
    }

    fn invalidate(&mut self) {
        self.inner.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        if self.inner.child_mut().is_conditional() {
            NodeKind::Conditional(self)
        } else {
            NodeKind::Action
        }
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

impl<C> Conditional<C> for Inverter<C>
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
        let child = self.inner.child_mut();
        let status = match child.kind() {
            NodeKind::Conditional(conditional) => {
                conditional.evaluate(ctx, context, blackboard, force)
            }
            _ => child.update(ctx, context, blackboard),
        };
        status.invert()
    }
}

/// Reports success whenever its child finishes, whatever the outcome.
pub struct AlwaysSucceed<C>
where
    C: 'static,
{
    inner: Decorator<C>,
}

impl<C> AlwaysSucceed<C>
where
    C: 'static,
{
    pub fn new(child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
        }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.inner.tick(ctx, context, blackboard) {
            BtStatus::Running => BtStatus::Running,
            _ => BtStatus::Success,
        }
    }

    fn invalidate(&mut self) {
        self.inner.invalidate();
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

/// Reports failure whenever its child finishes, whatever the outcome.
pub struct AlwaysFail<C>
where
    C: 'static,
{
    inner: Decorator<C>,
}

impl<C> AlwaysFail<C>
where
    C: 'static,
{
    pub fn new(child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
        }
    }
}

impl<C> Behavior<C> for AlwaysFail<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.inner.tick(ctx, context, blackboard) {
            BtStatus::Running => BtStatus::Running,
            _ => BtStatus::Failure,
        }
    }

    fn invalidate(&mut self) {
        self.inner.invalidate();
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Times(NonZeroU32),
    Forever,
}

/// Runs its child again after every completed run.
///
/// Each completed run invalidates the child so the next one is a fresh activation.
pub struct Repeater<C>
where
    C: 'static,
{
    inner: Decorator<C>,
    count: RepeatCount,
    end_on_failure: bool,
    completed: u32,
}

impl<C> Repeater<C>
where
    C: 'static,
{
    /// Repeat `count` times. Zero is rejected.
    pub fn new(count: u32, child: Node<C>) -> Result<Self> {
        let count = NonZeroU32::new(count).ok_or(BtError::InvalidRepeatCount(count))?;
        Ok(Self::times(count, child))
    }

    pub fn times(count: NonZeroU32, child: Node<C>) -> Self {
        Self::with_count(RepeatCount::Times(count), child)
    }

    pub fn forever(child: Node<C>) -> Self {
        Self::with_count(RepeatCount::Forever, child)
    }

    fn with_count(count: RepeatCount, child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
            count,
            end_on_failure: false,
            completed: 0,
        }
    }

    /// Stop (with success) the first time the child fails.
    pub fn end_on_failure(mut self, end_on_failure: bool) -> Self {
        self.end_on_failure = end_on_failure;
        self
    }

    /// Runs completed in the current activation.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn is_done(&self) -> bool {
        match self.count {
            RepeatCount::Times(n) => self.completed >= n.get(),
            RepeatCount::Forever => false,
        }
    }
}

impl<C> Behavior<C> for Repeater<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        if self.is_done() {
            return BtStatus::Success;
        }

        let status = self.inner.tick(ctx, context, blackboard);
        if status == BtStatus::Running {
            return BtStatus::Running;
        }

        self.inner.invalidate();
        self.completed = self.completed.saturating_add(1);

        if self.end_on_failure && status == BtStatus::Failure {
            return BtStatus::Success;
        }
        if self.is_done() {
            return BtStatus::Success;
        }
        BtStatus::Running
    }

    fn on_start(&mut self) {
        self.completed = 0;
    }

    fn on_end(&mut self) {
        self.completed = 0;
    }

    fn invalidate(&mut self) {
        self.completed = 0;
        self.inner.invalidate();
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

/// Keeps running its child until it succeeds.
pub struct UntilSuccess<C>
where
    C: 'static,
{
    inner: Decorator<C>,
}

impl<C> UntilSuccess<C>
where
    C: 'static,
{
    pub fn new(child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
        }
    }
}

impl<C> Behavior<C> for UntilSuccess<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.inner.tick(ctx, context, blackboard) {
            BtStatus::Success => BtStatus::Success,
            BtStatus::Running => BtStatus::Running,
            _ => {
                self.inner.invalidate();
                BtStatus::Running
            }
        }
    }

    fn invalidate(&mut self) {
        self.inner.invalidate();
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

/// Keeps running its child until it fails, then succeeds.
pub struct UntilFail<C>
where
    C: 'static,
{
    inner: Decorator<C>,
}

impl<C> UntilFail<C>
where
    C: 'static,
{
    pub fn new(child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
        }
    }
}

impl<C> Behavior<C> for UntilFail<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.inner.tick(ctx, context, blackboard) {
            BtStatus::Failure => BtStatus::Success,
            BtStatus::Running => BtStatus::Running,
            _ => {
                self.inner.invalidate();
                BtStatus::Running
            }
        }
    }

    fn invalidate(&mut self) {
        self.inner.invalidate();
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

/// Runs its child only while a conditional holds.
///
/// With `reevaluate` off the conditional is evaluated once per activation and the reading
/// is reused; abort checks from an enclosing composite still get a fresh reading through
/// [`ConditionalDecorator::execute_conditional`] with `force = true`.
pub struct ConditionalDecorator<C>
where
    C: 'static,
{
    inner: Decorator<C>,
    conditional: Box<dyn Conditional<C>>,
    reevaluate: bool,
    conditional_status: BtStatus,
}

impl<C> ConditionalDecorator<C>
where
    C: 'static,
{
    pub fn new(conditional: impl Conditional<C>, child: Node<C>) -> Self {
        Self::from_boxed(Box::new(conditional), child)
    }

    pub fn from_boxed(conditional: Box<dyn Conditional<C>>, child: Node<C>) -> Self {
        Self {
            inner: Decorator::new(child),
            conditional,
            reevaluate: true,
            conditional_status: BtStatus::NotStarted,
        }
    }

    pub fn with_reevaluate(mut self, reevaluate: bool) -> Self {
        self.reevaluate = reevaluate;
        self
    }

    pub fn reevaluate(&self) -> bool {
        self.reevaluate
    }

    /// Last reading taken by `update`; `NotStarted` when none is cached.
    pub fn conditional_status(&self) -> BtStatus {
        self.conditional_status
    }

    /// Evaluate the conditional, or reuse the cached reading when caching applies and
    /// `force` is not set. Forced readings are not cached.
    pub fn execute_conditional(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
        force: bool,
    ) -> BtStatus {
        if force || self.reevaluate || self.conditional_status == BtStatus::NotStarted {
            self.conditional.evaluate(ctx, context, blackboard, force)
        } else {
            self.conditional_status
        }
    }
}

impl<C> Behavior<C> for ConditionalDecorator<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.conditional_status = self.execute_conditional(ctx, context, blackboard, false);
        if self.conditional_status == BtStatus::Success {
            return self.inner.tick(ctx, context, blackboard);
        }

        if self.inner.child().status() != BtStatus::NotStarted {
            self.inner.invalidate();
        }
        BtStatus::Failure
    }

    fn on_start(&mut self) {
        self.conditional_status = BtStatus::NotStarted;
    }

    fn invalidate(&mut self) {
        self.conditional_status = BtStatus::NotStarted;
        self.inner.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Conditional(self)
    }

    fn children(&self) -> &[Node<C>] {
        self.inner.children()
    }
}

impl<C> Conditional<C> for ConditionalDecorator<C>
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
        self.execute_conditional(ctx, context, blackboard, force)
    }
}
