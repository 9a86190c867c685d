//! Tooling primitives for inspecting behavior tree execution.
//!
//! Nodes emit small trace events into the blackboard; tooling (tests, inspectors, replay
//! dumps) reads them back out. Nothing here depends on a particular engine.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};
