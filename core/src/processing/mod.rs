pub mod condition;
pub mod correlate;
pub mod solve;

pub use condition::{ConditionedTrace, SignalConditioner};
pub use correlate::{CorrelationResult, PairwiseCorrelator};
pub use solve::{ArraySolution, ArraySolver};
