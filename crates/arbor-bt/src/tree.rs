use arbor_core::{Blackboard, TickContext};
use arbor_tools::{emit as trace_emit, TraceEvent, TraceLog, TRACE_LOG};

use crate::bt::{BtStatus, Node};
use crate::config::TreeConfig;
use crate::error::Result;

/// Owns a root node together with the context and blackboard it acts on, and decides
/// when the root actually gets evaluated.
pub struct BehaviorTree<C>
where
    C: 'static,
{
    context: C,
    blackboard: Blackboard,
    root: Node<C>,
    update_period: f32,
    countdown: f32,
    pending_dt: f32,
    ticks: u64,
}

impl<C> BehaviorTree<C>
where
    C: 'static,
{
    /// Tree with the default update period.
    pub fn new(context: C, root: Node<C>) -> Self {
        let config = TreeConfig::default();
        Self::from_parts(context, root, config)
    }

    pub fn with_update_period(context: C, root: Node<C>, update_period: f32) -> Result<Self> {
        Self::with_config(
            context,
            root,
            TreeConfig::default().with_update_period(update_period),
        )
    }

    pub fn with_config(context: C, root: Node<C>, config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(context, root, config))
    }

    fn from_parts(context: C, root: Node<C>, config: TreeConfig) -> Self {
        let mut blackboard = Blackboard::new();
        if config.trace_log {
            blackboard.set_value(TRACE_LOG, TraceLog::default());
        }
        Self {
            context,
            blackboard,
            root,
            update_period: config.update_period_seconds,
            countdown: config.update_period_seconds.max(0.0),
            pending_dt: 0.0,
            ticks: 0,
        }
    }

    /// Advance the clock by `dt_seconds`, evaluating the root if it is due.
    ///
    /// Returns the root status when the root was evaluated and `None` when the call was
    /// throttled. With a positive period the first evaluation happens once a full period
    /// has elapsed, and the root is evaluated at most once per call even when
    /// `dt_seconds` spans several periods; the countdown skips the missed periods rather
    /// than accumulating a backlog. Negative or non-finite `dt_seconds` counts as zero.
    pub fn tick(&mut self, dt_seconds: f32) -> Option<BtStatus> {
        let dt_seconds = if dt_seconds.is_finite() && dt_seconds > 0.0 {
            dt_seconds
        } else {
            if dt_seconds != 0.0 {
                tracing::warn!(dt = dt_seconds, "ignoring invalid tick delta");
            }
            0.0
        };
        self.pending_dt += dt_seconds;

        if self.update_period > 0.0 {
            self.countdown -= dt_seconds;
            if self.countdown > 0.0 {
                return None;
            }
            self.countdown = catch_up(self.countdown, self.update_period);
        }

        Some(self.evaluate_root())
    }

    fn evaluate_root(&mut self) -> BtStatus {
        let ctx = TickContext::new(self.ticks, self.pending_dt);
        self.pending_dt = 0.0;
        self.ticks = self.ticks.wrapping_add(1);

        let status = self
            .root
            .tick(&ctx, &mut self.context, &mut self.blackboard);
        tracing::trace!(tick = ctx.tick, dt = ctx.dt_seconds, ?status, "root evaluated");
        status
    }

    /// Invalidate the whole tree. The next evaluation starts from scratch.
    pub fn reset(&mut self) {
        tracing::debug!(tick = self.ticks, "behavior tree reset");
        trace_emit(&mut self.blackboard, TraceEvent::new(self.ticks, "bt.tree.reset"));
        self.root.invalidate();
    }

    pub fn root(&self) -> &Node<C> {
        &self.root
    }

    pub fn root_status(&self) -> BtStatus {
        self.root.status()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn update_period(&self) -> f32 {
        self.update_period
    }

    /// Number of root evaluations so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn trace_log(&self) -> Option<&TraceLog> {
        self.blackboard.get_value(TRACE_LOG)
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

/// Move a non-positive countdown forward by whole periods until it is positive again.
fn catch_up(countdown: f32, period: f32) -> f32 {
    let missed = (-countdown / period).floor() + 1.0;
    let next = countdown + missed * period;
    if next > 0.0 && next <= period {
        next
    } else {
        // Precision ran out on a huge frame.
        period
    }
}
