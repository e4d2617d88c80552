pub mod advisor;
pub mod cli;
pub mod config;
pub mod engineer;
pub mod error;
pub mod fallback;
pub mod gate;
pub mod parser;
pub mod presenter;
pub mod probe;
pub mod prompt;
pub mod session;
pub mod types;

pub use advisor::{Advisor, GeminiAdvisor, MockAdvisor};
pub use engineer::RaceEngineer;
pub use error::{ConfigError, RemoteError, RemoteErrorKind};
pub use gate::{should_act, EngineerState};
pub use types::{RaceContext, RiskLevel, StrategyCall, TelemetryFrame};
