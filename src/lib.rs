//! Run a solver over every instance of every group, in parallel
pub mod aggregate;
pub mod config;
pub mod error;
pub mod invoker;
pub mod orchestrator;
pub mod pool;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use {
    aggregate::{FileSink, GroupSummary, SolutionSink, summarize},
    config::Config,
    error::{HarnessError, Result},
    invoker::{InvocationResult, Invoker},
    orchestrator::{Benchmark, Group, Instance, Orchestrator, benchmark, discover},
    pool::TaskPool,
    store::{ResultSnapshot, ResultStore, SlotHandle},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_export]
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}
