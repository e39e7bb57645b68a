//! Policy runners. Each computes a schedule, writes its reports, and returns
//! a one-line summary for the status stream.

mod both;
mod compression;
mod resizing;

pub use both::run_both;
pub use compression::run_compression;
pub use resizing::run_resizing;

/// How the run ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The resizing optimizer found no feasible tier cap.
    Infeasible,
}

impl RunStatus {
    pub fn code(self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::Infeasible => 2,
        }
    }

    /// The worse of two statuses.
    pub fn merge(self, other: RunStatus) -> RunStatus {
        if self == RunStatus::Infeasible || other == RunStatus::Infeasible {
            RunStatus::Infeasible
        } else {
            RunStatus::Completed
        }
    }
}

/// Status line plus exit status of one policy run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub line: String,
    pub status: RunStatus,
}

impl Summary {
    pub fn print(self) -> RunStatus {
        println!("{}", self.line);
        self.status
    }
}
