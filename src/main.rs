use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io;
use std::path::PathBuf;
use weight_sweep::parser::{parse_output, DEFAULT_BANNER_BYTES};
use weight_sweep::runner::{BotProcess, ExternalBot};
use weight_sweep::sweep::{run_sweep, SweepConfig, DEFAULT_RUNS_PER_CONFIG};
use weight_sweep::table::{ResultTable, DEFAULT_OUTPUT};
use weight_sweep::weights::{resolve_configs, WeightConfig};

#[derive(Parser, Debug)]
#[command(name = "weight-sweep")]
#[command(about = "Play an external 2048 bot across weight configurations and tabulate its scores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct CorpusArgs {
    /// Weight configuration such as [5,1,1,1]; repeat to build a custom corpus
    #[arg(long = "weights")]
    weights: Vec<String>,
    /// File with one weight configuration per line ('#' starts a comment)
    #[arg(long)]
    weights_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every configuration against the bot and write the turn table
    Sweep {
        /// Path to the game executable
        #[arg(long, env = "BOT_EXECUTABLE")]
        executable: PathBuf,
        /// Extra argument passed to the executable (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_RUNS_PER_CONFIG)]
        runs: usize,
        #[arg(long, default_value_t = DEFAULT_BANNER_BYTES)]
        banner_bytes: usize,
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// List the tagged weight configurations a sweep would use
    ListWeights {
        /// Emit a JSON manifest instead of one line per configuration
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Parse one captured bot output file into turn rows
    ParseOutput {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "a0")]
        bot_id: String,
        #[arg(long, default_value = "[1,1,1,1]")]
        weights: String,
        #[arg(long, default_value_t = DEFAULT_BANNER_BYTES)]
        banner_bytes: usize,
        /// Write CSV here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    weight_sweep::logging::init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Sweep {
            executable,
            args,
            runs,
            banner_bytes,
            output,
            corpus,
        } => {
            let configs = resolve_configs(&corpus.weights, corpus.weights_file.as_deref())?;
            let mut bot = ExternalBot::new(executable).with_args(args);
            let config = SweepConfig {
                runs_per_config: runs,
                banner_bytes,
                ..SweepConfig::new(configs)
            };

            tracing::info!(
                bot = %bot.describe(),
                configs = config.configs.len(),
                runs = config.run_count(),
                "starting sweep"
            );
            let table = run_sweep(&mut bot, &config)?;
            table.write_csv(&output)?;

            println!("configs={}", config.configs.len());
            println!("runs={}", config.run_count());
            println!("rows={}", table.len());
            println!("output={}", output.display());
        }
        Commands::ListWeights { json, corpus } => {
            let configs = resolve_configs(&corpus.weights, corpus.weights_file.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&configs)?);
            } else {
                for config in &configs {
                    println!(
                        "{}  {:12} w={} a={} d={} s={}",
                        config.tag, config.raw, config.w, config.a, config.d, config.s
                    );
                }
            }
        }
        Commands::ParseOutput {
            input,
            bot_id,
            weights,
            banner_bytes,
            output,
        } => {
            let tag = bot_id.chars().next().unwrap_or('a');
            let config = WeightConfig::new(tag, &weights)?;
            let bytes =
                fs::read(&input).with_context(|| format!("failed reading {}", input.display()))?;
            let raw = String::from_utf8_lossy(&bytes);
            let turns = parse_output(&bot_id, &raw, banner_bytes)?;

            let mut table = ResultTable::new();
            table.append_run(&bot_id, &config, turns);
            match output {
                Some(path) => {
                    table.write_csv(&path)?;
                    println!("rows={}", table.len());
                    println!("output={}", path.display());
                }
                None => table.write_to(io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
