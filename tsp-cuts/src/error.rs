use thiserror::Error as ThisError;

use crate::solver::SolverError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}: {content:?}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },
    #[error("input contains no points")]
    EmptyInput,
    #[error("not enough points, requesting {requested} out of {available} available")]
    Sampling { requested: usize, available: usize },
    #[error("no solution found")]
    NoSolution,
    #[error("solution visits {visited} of {order} vertices in one cycle")]
    IncompleteTour { visited: usize, order: usize },
    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }
}
