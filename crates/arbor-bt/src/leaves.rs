use std::borrow::Cow;
use std::marker::PhantomData;

use arbor_core::{Blackboard, DeterministicRng, SplitMix64, TickContext};

use crate::bt::{Behavior, BtStatus, Conditional, NodeKind};
use crate::error::{BtError, Result};
use crate::tree::BehaviorTree;

/// Leaf that runs a closure every update and reports whatever it returns.
pub struct ExecuteAction<C, F> {
    action: F,
    _context: PhantomData<fn(&mut C)>,
}

impl<C, F> ExecuteAction<C, F>
where
    F: FnMut(&TickContext, &mut C, &mut Blackboard) -> BtStatus + 'static,
{
    pub fn new(action: F) -> Self {
        Self {
            action,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for ExecuteAction<C, F>
where
    C: 'static,
    F: FnMut(&TickContext, &mut C, &mut Blackboard) -> BtStatus + 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        (self.action)(ctx, context, blackboard)
    }
}

/// Conditional leaf backed by a predicate over read-only views of the context.
pub struct Condition<C, F> {
    cond: F,
    _context: PhantomData<fn(&C)>,
}

impl<C, F> Condition<C, F>
where
    F: FnMut(&TickContext, &C, &Blackboard) -> bool + 'static,
{
    pub fn new(cond: F) -> Self {
        Self {
            cond,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Condition<C, F>
where
    C: 'static,
    F: FnMut(&TickContext, &C, &Blackboard) -> bool + 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        BtStatus::from_bool((self.cond)(ctx, &*context, &*blackboard))
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Conditional(self)
    }
}

impl<C, F> Conditional<C> for Condition<C, F>
where
    C: 'static,
    F: FnMut(&TickContext, &C, &Blackboard) -> bool + 'static,
{
}

/// Conditional leaf whose test reports a full status instead of a bool.
pub struct ActionConditional<C, F> {
    test: F,
    _context: PhantomData<fn(&C)>,
}

impl<C, F> ActionConditional<C, F>
where
    F: FnMut(&TickContext, &C, &Blackboard) -> BtStatus + 'static,
{
    pub fn new(test: F) -> Self {
        Self {
            test,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for ActionConditional<C, F>
where
    C: 'static,
    F: FnMut(&TickContext, &C, &Blackboard) -> BtStatus + 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        context: &mut C,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        (self.test)(ctx, &*context, &*blackboard)
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Conditional(self)
    }
}

impl<C, F> Conditional<C> for ActionConditional<C, F>
where
    C: 'static,
    F: FnMut(&TickContext, &C, &Blackboard) -> BtStatus + 'static,
{
}

/// Conditional that succeeds with a fixed probability.
#[derive(Debug, Clone)]
pub struct RandomProbability {
    probability: f32,
    rng: SplitMix64,
}

impl RandomProbability {
    pub fn new(probability: f32, seed: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(BtError::InvalidProbability(probability));
        }
        Ok(Self {
            probability,
            rng: SplitMix64::new(seed),
        })
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }
}

impl<C> Behavior<C> for RandomProbability
where
    C: 'static,
{
    fn update(
        &mut self,
        _ctx: &TickContext,
        _context: &mut C,
        _blackboard: &mut Blackboard,
    ) -> BtStatus {
        BtStatus::from_bool(self.rng.next_f32_unit() < self.probability)
    }

    fn kind(&mut self) -> NodeKind<'_, C> {
        NodeKind::Conditional(self)
    }
}

impl<C> Conditional<C> for RandomProbability where C: 'static {}

/// Runs until `seconds` of tick time have passed since it started.
///
/// The tick that starts the wait contributes no time; elapsed time is the sum of
/// `dt_seconds` over the following ticks.
#[derive(Debug, Clone)]
pub struct WaitAction {
    seconds: f32,
    elapsed: Option<f32>,
}

impl WaitAction {
    pub fn new(seconds: f32) -> Result<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(BtError::InvalidWaitTime(seconds));
        }
        Ok(Self {
            seconds,
            elapsed: None,
        })
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed.unwrap_or(0.0)
    }
}

impl<C> Behavior<C> for WaitAction
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        _context: &mut C,
        _blackboard: &mut Blackboard,
    ) -> BtStatus {
        let elapsed = match self.elapsed {
            None => 0.0,
            Some(elapsed) => elapsed + ctx.dt_seconds,
        };
        self.elapsed = Some(elapsed);

        if elapsed >= self.seconds {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn on_start(&mut self) {
        self.elapsed = None;
    }

    fn on_end(&mut self) {
        self.elapsed = None;
    }

    fn invalidate(&mut self) {
        self.elapsed = None;
    }
}

/// Writes a line through `tracing` and succeeds.
#[derive(Debug, Clone)]
pub struct LogAction {
    text: Cow<'static, str>,
    is_error: bool,
}

impl LogAction {
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

impl<C> Behavior<C> for LogAction
where
    C: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        _context: &mut C,
        _blackboard: &mut Blackboard,
    ) -> BtStatus {
        if self.is_error {
            tracing::error!(tick = ctx.tick, "{}", self.text);
        } else {
            tracing::info!(tick = ctx.tick, "{}", self.text);
        }
        BtStatus::Success
    }
}

/// Runs a whole separate tree as one action.
///
/// The referenced tree keeps its own context, blackboard and update period, and is
/// advanced by the current `dt_seconds` each update. This leaf always reports `Success`,
/// whatever the referenced tree returned; read [`TreeReference::last_status`] when the
/// outcome matters.
pub struct TreeReference<S>
where
    S: 'static,
{
    tree: BehaviorTree<S>,
    last_status: Option<BtStatus>,
}

impl<S> TreeReference<S>
where
    S: 'static,
{
    pub fn new(tree: BehaviorTree<S>) -> Self {
        Self {
            tree,
            last_status: None,
        }
    }

    pub fn tree(&self) -> &BehaviorTree<S> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BehaviorTree<S> {
        &mut self.tree
    }

    /// Root status from the last time the referenced tree actually evaluated its root.
    pub fn last_status(&self) -> Option<BtStatus> {
        self.last_status
    }
}

impl<C, S> Behavior<C> for TreeReference<S>
where
    C: 'static,
    S: 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        _context: &mut C,
        _blackboard: &mut Blackboard,
    ) -> BtStatus {
        if let Some(status) = self.tree.tick(ctx.dt_seconds) {
            self.last_status = Some(status);
        }
        BtStatus::Success
    }
}
