use arbor_core::{Blackboard, DeterministicRng, SplitMix64, TickContext};

use crate::bt::{AbortType, Behavior, BtStatus, Node, NodeKind};
use crate::composite::Composite;

fn sequence_update<C>(
    composite: &mut Composite<C>,
    ctx: &TickContext,
    context: &mut C,
    blackboard: &mut Blackboard,
) -> BtStatus
where
    C: 'static,
{
    // Vacuous AND.
    if composite.is_empty() {
        return BtStatus::Success;
    }

    if composite.current_child_index() != 0 {
        composite.handle_conditional_aborts(ctx, context, blackboard, BtStatus::Success);
    }

    let status = composite.tick_current(ctx, context, blackboard);
    if status != BtStatus::Success {
        return status;
    }

    if composite.advance() {
        BtStatus::Running
    } else {
        BtStatus::Success
    }
}

fn selector_update<C>(
    composite: &mut Composite<C>,
    ctx: &TickContext,
    context: &mut C,
    blackboard: &mut Blackboard,
) -> BtStatus
where
    C: 'static,
{
    // Vacuous OR.
    if composite.is_empty() {
        return BtStatus::Failure;
    }

    if composite.current_child_index() != 0 {
        composite.handle_conditional_aborts(ctx, context, blackboard, BtStatus::Failure);
    }

    let status = composite.tick_current(ctx, context, blackboard);
    if status != BtStatus::Failure {
        return status;
    }

    if composite.advance() {
        BtStatus::Running
    } else {
        BtStatus::Failure
    }
}

/// Runs children in order, one per tick; fails as soon as one fails.
pub struct Sequence<C>
where
    C: 'static,
{
    composite: Composite<C>,
}

impl<C> Sequence<C>
where
    C: 'static,
{
    pub fn new(abort_type: AbortType) -> Self {
        Self {
            composite: Composite::new(abort_type),
        }
    }

    pub fn with_children(abort_type: AbortType, children: Vec<Node<C>>) -> Self {
        let mut node = Self::new(abort_type);
        for child in children {
            node.add_child(child);
        }
        node
    }

    pub fn add_child(&mut self, child: Node<C>) {
        self.composite.add_child(child);
    }

    pub fn with_child(mut self, child: Node<C>) -> Self {
        self.add_child(child);
        self
    }

    pub fn composite(&self) -> &Composite<C> {
        &self.composite
    }

    pub fn composite_mut(&mut self) -> &mut Composite<C> {
        &mut self.composite
    }
}

impl<C> Behavior<C> for Sequence<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        sequence_update(&mut self.composite, ctx, context, blackboard)
    }

    fn on_start(&mut self) {
        self.composite.on_start();
    }

    fn on_end(&mut self) {
        self.composite.on_end();
    }

    fn invalidate(&mut self) {
        self.composite.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Composite(&mut self.composite)
    }

    fn children(&self) -> &[Node<C>] {
        self.composite.children()
    }
}

/// Tries children in order, one per tick; succeeds as soon as one succeeds.
pub struct Selector<C>
where
    C: 'static,
{
    composite: Composite<C>,
}

impl<C> Selector<C>
where
    C: 'static,
{
    pub fn new(abort_type: AbortType) -> Self {
        Self {
            composite: Composite::new(abort_type),
        }
    }

    pub fn with_children(abort_type: AbortType, children: Vec<Node<C>>) -> Self {
        let mut node = Self::new(abort_type);
        for child in children {
            node.add_child(child);
        }
        node
    }

    pub fn add_child(&mut self, child: Node<C>) {
        self.composite.add_child(child);
    }

    pub fn with_child(mut self, child: Node<C>) -> Self {
        self.add_child(child);
        self
    }

    pub fn composite(&self) -> &Composite<C> {
        &self.composite
    }

    pub fn composite_mut(&mut self) -> &mut Composite<C> {
        &mut self.composite
    }
}

impl<C> Behavior<C> for Selector<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        selector_update(&mut self.composite, ctx, context, blackboard)
    }

    fn on_start(&mut self) {
        self.composite.on_start();
    }

    fn on_end(&mut self) {
        self.composite.on_end();
    }

    fn invalidate(&mut self) {
        self.composite.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Composite(&mut self.composite)
    }

    fn children(&self) -> &[Node<C>] {
        self.composite.children()
    }
}

/// A [`Sequence`] whose children are shuffled at the start of every activation.
pub struct RandomSequence<C>
where
    C: 'static,
{
    composite: Composite<C>,
    rng: SplitMix64,
}

impl<C> RandomSequence<C>
where
    C: 'static,
{
    pub fn new(abort_type: AbortType, seed: u64) -> Self {
        Self {
            composite: Composite::new(abort_type),
            rng: SplitMix64::new(seed),
        }
    }

    pub fn add_child(&mut self, child: Node<C>) {
        self.composite.add_child(child);
    }

    pub fn with_child(mut self, child: Node<C>) -> Self {
        self.add_child(child);
        self
    }
}

impl<C> Behavior<C> for RandomSequence<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        sequence_update(&mut self.composite, ctx, context, blackboard)
    }

    fn on_start(&mut self) {
        self.composite.on_start();
        self.rng.shuffle(self.composite.children_mut());
    }

    fn on_end(&mut self) {
        self.composite.on_end();
    }

    fn invalidate(&mut self) {
        self.composite.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Composite(&mut self.composite)
    }

    fn children(&self) -> &[Node<C>] {
        self.composite.children()
    }
}

/// A [`Selector`] whose children are shuffled at the start of every activation.
pub struct RandomSelector<C>
where
    C: 'static,
{
    composite: Composite<C>,
    rng: SplitMix64,
}

impl<C> RandomSelector<C>
where
    C: 'static,
{
    pub fn new(abort_type: AbortType, seed: u64) -> Self {
        Self {
            composite: Composite::new(abort_type),
            rng: SplitMix64::new(seed),
        }
    }

    pub fn add_child(&mut self, child: Node<C>) {
        self.composite.add_child(child);
    }

    pub fn with_child(mut self, child: Node<C>) -> Self {
        self.add_child(child);
        self
    }
}

impl<C> Behavior<C> for RandomSelector<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        selector_update(&mut self.composite, ctx, context, blackboard)
    }

    fn on_start(&mut self) {
        self.composite.on_start();
        self.rng.shuffle(self.composite.children_mut());
    }

    fn on_end(&mut self) {
        self.composite.on_end();
    }

    fn invalidate(&mut self) {
        self.composite.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Composite(&mut self.composite)
    }

    fn children(&self) -> &[Node<C>] {
        self.composite.children()
    }
}

/// Ticks every child each update. Fails on the first failure, succeeds once every child
/// reports success, and keeps running otherwise.
pub struct Parallel<C>
where
    C: 'static,
{
    composite: Composite<C>,
}

impl<C> Parallel<C>
where
    C: 'static,
{
    pub fn new() -> Self {
        Self {
            composite: Composite::new(AbortType::None),
        }
    }

    pub fn add_child(&mut self, child: Node<C>) {
        self.composite.add_child(child);
    }

    pub fn with_child(mut self, child: Node<C>) -> Self {
        self.add_child(child);
        self
    }
}

impl<C> Default for Parallel<C>
where
    C: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Behavior<C> for Parallel<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        let mut all_succeeded = true;
        for child in self.composite.children_mut() {
            match child.tick(ctx, context, blackboard) {
                BtStatus::Failure => return BtStatus::Failure,
                BtStatus::Success => {}
                _ => all_succeeded = false,
            }
        }

        if all_succeeded {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn on_start(&mut self) {
        self.composite.on_start();
    }

    fn on_end(&mut self) {
        self.composite.on_end();
    }

    fn invalidate(&mut self) {
        self.composite.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Composite(&mut self.composite)
    }

    fn children(&self) -> &[Node<C>] {
        self.composite.children()
    }
}

/// Ticks every child each update. Succeeds on the first success, fails once every child
/// reports failure, and keeps running otherwise.
pub struct ParallelSelector<C>
where
    C: 'static,
{
    composite: Composite<C>,
}

impl<C> ParallelSelector<C>
where
    C: 'static,
{
    pub fn new() -> Self {
        Self {
            composite: Composite::new(AbortType::None),
        }
    }

    pub fn add_child(&mut self, child: Node<C>) {
        self.composite.add_child(child);
    }

    pub fn with_child(mut self, child: Node<C>) -> Self {
        self.add_child(child);
        self
    }
}

impl<C> Default for ParallelSelector<C>
where
    C: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Behavior<C> for ParallelSelector<C>
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        let mut all_failed = true;
        for child in self.composite.children_mut() {
            match child.tick(ctx, context, blackboard) {
                BtStatus::Success => return BtStatus::Success,
                BtStatus::Failure => {}
                _ => all_failed = false,
            }
        }

        if all_failed {
            BtStatus::Failure
        } else {
            BtStatus::Running
        }
    }

    fn on_start(&mut self) {
        self.composite.on_start();
    }

    fn on_end(&mut self) {
        self.composite.on_end();
    }

    fn invalidate(&mut self) {
        self.composite.invalidate();
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Composite(&mut self.composite)
    }

    fn children(&self) -> &[Node<C>] {
        self.composite.children()
    }
}
