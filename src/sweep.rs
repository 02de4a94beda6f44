use crate::parser::{parse_output, DEFAULT_BANNER_BYTES};
use crate::runner::BotProcess;
use crate::table::ResultTable;
use crate::weights::WeightConfig;
use anyhow::{anyhow, Context, Result};

pub const DEFAULT_RUNS_PER_CONFIG: usize = 50;

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub configs: Vec<WeightConfig>,
    pub runs_per_config: usize,
    pub banner_bytes: usize,
}

impl SweepConfig {
    pub fn new(configs: Vec<WeightConfig>) -> Self {
        Self {
            configs,
            runs_per_config: DEFAULT_RUNS_PER_CONFIG,
            banner_bytes: DEFAULT_BANNER_BYTES,
        }
    }

    pub fn run_count(&self) -> usize {
        self.configs.len() * self.runs_per_config
    }
}

/// Plays every configuration `runs_per_config` times, one process at a time,
/// and collects the turns in configuration, run, turn order.
pub fn run_sweep(bot: &mut dyn BotProcess, config: &SweepConfig) -> Result<ResultTable> {
    if config.configs.is_empty() {
        return Err(anyhow!("sweep requires at least one weight configuration"));
    }
    if config.runs_per_config == 0 {
        return Err(anyhow!("runs per configuration must be >= 1"));
    }

    let mut table = ResultTable::new();
    for weights in &config.configs {
        tracing::info!(tag = %weights.tag, weights = %weights.raw, "starting configuration");
        for run in 0..config.runs_per_config {
            let bot_id = weights.bot_id(run);
            let output = bot
                .play(&weights.raw)
                .with_context(|| format!("bot run {bot_id} failed for weights {}", weights.raw))?;
            let turns = parse_output(&bot_id, &output, config.banner_bytes)
                .with_context(|| format!("unexpected output from bot run {bot_id}"))?;
            let rows = table.append_run(&bot_id, weights, turns);
            tracing::debug!(bot_id = %bot_id, rows, "run parsed");
        }
    }
    Ok(table)
}
