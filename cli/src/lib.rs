pub mod commands;
pub mod context;
pub mod fight_log;
pub mod logging;
pub mod sim;

pub use context::{CliContext, CliSettings};
pub use fight_log::FightLog;
pub use sim::{SimOptions, SimOutcome, run_simulation};
