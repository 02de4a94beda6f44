use crate::parser::Turn;
use crate::weights::WeightConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_OUTPUT: &str = "bot_data.csv";

pub const HEADER: [&str; 7] = [
    "Bot id",
    "Turn no.",
    "Current score",
    "up weight",
    "left weight",
    "down weight",
    "right weight",
];

/// One observed turn of one bot run. The score stays text exactly as the bot
/// printed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    #[serde(rename = "Bot id")]
    pub bot_id: String,
    #[serde(rename = "Turn no.")]
    pub turn: usize,
    #[serde(rename = "Current score")]
    pub score: String,
    #[serde(rename = "up weight")]
    pub w: String,
    #[serde(rename = "left weight")]
    pub a: String,
    #[serde(rename = "down weight")]
    pub d: String,
    #[serde(rename = "right weight")]
    pub s: String,
}

impl TurnRecord {
    pub fn new(bot_id: &str, config: &WeightConfig, turn: Turn) -> Self {
        Self {
            bot_id: bot_id.to_string(),
            turn: turn.index,
            score: turn.score,
            w: config.w.clone(),
            a: config.a.clone(),
            d: config.d.clone(),
            s: config.s.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResultTable {
    rows: Vec<TurnRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the turns of one run, in turn order. Returns the number of rows added.
    pub fn append_run(
        &mut self,
        bot_id: &str,
        config: &WeightConfig,
        turns: impl IntoIterator<Item = Turn>,
    ) -> usize {
        let before = self.rows.len();
        self.rows
            .extend(turns.into_iter().map(|turn| TurnRecord::new(bot_id, config, turn)));
        self.rows.len() - before
    }

    pub fn rows(&self) -> &[TurnRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        if self.rows.is_empty() {
            // serde only emits the header alongside the first record.
            out.write_record(HEADER)?;
        }
        for row in &self.rows {
            out.serialize(row)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the table, replacing whatever is at `path`.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
        let file =
            fs::File::create(path).with_context(|| format!("failed creating {}", path.display()))?;
        self.write_to(file)
            .with_context(|| format!("failed writing {}", path.display()))
    }
}
