use thiserror::Error;

/// Construction-time errors. Nothing in here is raised while a tree is ticking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BtError {
    #[error("Repeat count must be positive, got {0}")]
    InvalidRepeatCount(u32),

    #[error("Update period must be a finite number of seconds, got {0}")]
    InvalidUpdatePeriod(f32),

    #[error("Wait time must be a finite, non-negative number of seconds, got {0}")]
    InvalidWaitTime(f32),

    #[error("Probability must be within [0, 1], got {0}")]
    InvalidProbability(f32),

    #[error("Leaf nodes must be nested inside a composite or decorator")]
    UnnestedLeaf,

    #[error("Decorator `{0}` has no child")]
    DecoratorWithoutChild(&'static str),

    #[error("end_composite called with no open composite")]
    UnbalancedEnd,

    #[error("{0} composite(s) still open at build; call end_composite first")]
    UnclosedComposite(usize),

    #[error("Tree already has a root node")]
    MultipleRoots,

    #[error("Can't create a behavior tree with zero nodes")]
    EmptyTree,

    #[error("Invalid tree config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BtError>;
