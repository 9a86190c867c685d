//! A guard that patrols until it spots an intruder, then chases it.
//!
//! Run with `RUST_LOG=debug cargo run -p arbor-bt --example guard` to see the aborts.

use anyhow::Result;
use arbor_bt::{AbortType, BehaviorTreeBuilder, BtStatus, TreeConfig};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Default)]
struct Guard {
    intruder_visible: bool,
    patrol_steps: u32,
    chase_steps: u32,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut tree = BehaviorTreeBuilder::begin(Guard::default())
        .selector(AbortType::None)
            .sequence(AbortType::LowerPriority)
                .condition(|_, g: &Guard, _| g.intruder_visible)
                .log("intruder spotted")
                .action(|_, g: &mut Guard, _| {
                    g.chase_steps += 1;
                    BtStatus::Running
                })
            .end_composite()
            .sequence(AbortType::None)
                .wait(0.5)
                .action(|_, g: &mut Guard, _| {
                    g.patrol_steps += 1;
                    BtStatus::Success
                })
            .end_composite()
        .end_composite()
        .build_with_config(TreeConfig::every_call().with_trace_log(true))?;

    for frame in 0..20u32 {
        if frame == 8 {
            tree.context_mut().intruder_visible = true;
        }
        if frame == 14 {
            tree.context_mut().intruder_visible = false;
        }
        if let Some(status) = tree.tick(0.25) {
            tracing::info!(frame, ?status, guard = ?tree.context(), "ticked");
        }
    }

    if let Some(log) = tree.trace_log() {
        for event in log.events.iter() {
            tracing::info!(tick = event.tick, tag = %event.tag, a = event.a, b = event.b, "trace");
        }
    }
    Ok(())
}
