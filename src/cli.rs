use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{AdvisorSettings, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::types::RaceContext;

#[derive(Parser, Debug)]
#[command(name = "race_engineer")]
#[command(about = "FARVIS: strategy calls for a simulated race, fed by JSON telemetry lines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Gemini API key; without one the engineer runs in mock mode
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, global = true, env = "FARVIS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the generative language API
    #[arg(long, global = true, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Ignore any API key and use the rule-based engineer
    #[arg(long)]
    pub mock: bool,

    /// Read telemetry from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Minimum seconds between two strategy calls
    #[arg(long, default_value_t = 15.0)]
    pub interval: f64,

    /// Ask for a call on every frame, bypassing the event gate and throttle
    #[arg(long)]
    pub force: bool,

    /// JSON file with total_laps, safety_car_prob and overtaking_difficulty
    #[arg(long, conflicts_with_all = ["total_laps", "safety_car_prob", "overtaking_difficulty"])]
    pub race_context: Option<PathBuf>,

    /// Race distance in laps
    #[arg(long, default_value_t = 52)]
    pub total_laps: u32,

    /// Safety car probability (0..1)
    #[arg(long, default_value_t = 0.01)]
    pub safety_car_prob: f64,

    /// Track overtaking difficulty (0..1)
    #[arg(long, default_value_t = 0.1)]
    pub overtaking_difficulty: f64,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Check which Gemini model names the API key can use
    Probe {
        /// Models to try, in order
        models: Vec<String>,
    },
}

impl Cli {
    pub fn advisor_settings(&self) -> AdvisorSettings {
        AdvisorSettings {
            api_key: if self.mock { None } else { self.api_key.clone() },
            model: self.model.clone(),
            api_base: self.api_base.clone(),
        }
    }

    /// Race context from the flags (a `--race-context` file is loaded by the caller).
    pub fn race_context_flags(&self) -> RaceContext {
        RaceContext {
            total_laps: self.total_laps,
            safety_car_prob: self.safety_car_prob,
            overtaking_difficulty: self.overtaking_difficulty,
        }
    }
}
