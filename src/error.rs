use thiserror::Error;

/// Errors that can come out of the grouping heuristics. Degenerate inputs
/// (empty, single sample, all-identical values) are not errors; they fall back
/// to trivial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    #[error("Column '{name}' has {got} elements, but {expected} were expected")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("The {name} radius must be positive and finite; got {value}")]
    BadRadius { name: &'static str, value: f64 },

    #[error("Sample id {0} appears more than once")]
    DuplicateId(usize),

    #[error("Sample id {0} isn't in the sample table")]
    UnknownId(usize),

    #[error("Time goes backwards at sample index {index} ({prev} s -> {this} s)")]
    TimeNotSorted { index: usize, prev: f64, this: f64 },

    #[error("Sample id {id} has a non-finite position ({ra}, {dec})")]
    NonFinitePosition { id: usize, ra: f64, dec: f64 },

    #[error("Positions must have shape (N, 2); got ({rows}, {cols})")]
    BadPositionShape { rows: usize, cols: usize },
}
