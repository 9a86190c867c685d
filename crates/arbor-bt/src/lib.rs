//! Tick-driven behavior trees with conditional aborts, built on `arbor-core`.
//!
//! A tree is a [`Node`] hierarchy driven by a [`BehaviorTree`]. Branching nodes keep a
//! cursor so a running child resumes on the next tick, and conditional aborts let a
//! higher-priority test that changes its answer interrupt whatever is running.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod builder;
pub mod composite;
pub mod config;
pub mod decorators;
pub mod error;
pub mod leaves;
pub mod nodes;
pub mod tree;

pub use bt::{AbortType, Behavior, BtStatus, Conditional, Node, NodeKind};
pub use builder::BehaviorTreeBuilder;
pub use composite::Composite;
pub use config::{TreeConfig, DEFAULT_UPDATE_PERIOD};
pub use decorators::{
    AlwaysFail, AlwaysSucceed, ConditionalDecorator, Decorator, Inverter, RepeatCount, Repeater,
    UntilFail, UntilSuccess,
};
pub use error::{BtError, Result};
pub use leaves::{
    ActionConditional, Condition, ExecuteAction, LogAction, RandomProbability, TreeReference,
    WaitAction,
};
pub use nodes::{Parallel, ParallelSelector, RandomSelector, RandomSequence, Selector, Sequence};
pub use tree::BehaviorTree;
