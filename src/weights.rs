use anyhow::{anyhow, Context, Result};
use core::fmt;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Built-in corpus: balanced, then small/large preference for w, a, d, s and
/// the (w,a) and (d,s) pairs.
pub const DEFAULT_WEIGHTS: [&str; 17] = [
    "[1,1,1,1]",
    "[5,1,1,1]",
    "[25,1,1,1]",
    "[1,5,1,1]",
    "[1,25,1,1]",
    "[1,1,5,1]",
    "[1,1,25,1]",
    "[1,1,1,5]",
    "[1,1,1,25]",
    "[5,5,1,1]",
    "[25,25,1,1]",
    "[5,25,1,1]",
    "[25,5,1,1]",
    "[1,1,5,5]",
    "[1,1,25,5]",
    "[1,1,5,25]",
    "[1,1,25,25]",
];

const TAGS: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeightError {
    TokenCount { raw: String, found: usize },
    TooManyConfigs { count: usize, max: usize },
}

impl fmt::Display for WeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenCount { raw, found } => write!(
                f,
                "weight string '{raw}' has {found} comma-separated tokens, expected 4"
            ),
            Self::TooManyConfigs { count, max } => write!(
                f,
                "{count} weight configurations given, only {max} single-letter tags available"
            ),
        }
    }
}

impl std::error::Error for WeightError {}

/// One tagged weight configuration. The raw string is what the bot reads on
/// stdin; `w`, `a`, `d`, `s` are its tokens with the brackets removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeightConfig {
    pub tag: char,
    pub raw: String,
    pub w: String,
    pub a: String,
    pub d: String,
    pub s: String,
}

impl WeightConfig {
    pub fn new(tag: char, raw: &str) -> Result<Self, WeightError> {
        let [w, a, d, s] = split_weights(raw)?;
        Ok(Self {
            tag,
            raw: raw.to_string(),
            w,
            a,
            d,
            s,
        })
    }

    pub fn bot_id(&self, run: usize) -> String {
        format!("{}{run}", self.tag)
    }
}

/// Splits `[w,a,d,s]` into its four tokens. Only the leading `[` of the first
/// token and the trailing `]` of the last are removed; inner tokens are kept
/// verbatim. An outer character other than a bracket is kept too, so
/// `1,1,1,1` splits into four `1`s.
pub fn split_weights(raw: &str) -> Result<[String; 4], WeightError> {
    let tokens: Vec<&str> = raw.split(',').collect();
    let &[w, a, d, s] = tokens.as_slice() else {
        return Err(WeightError::TokenCount {
            raw: raw.to_string(),
            found: tokens.len(),
        });
    };
    let w = w.strip_prefix('[').unwrap_or(w);
    let s = s.strip_suffix(']').unwrap_or(s);
    Ok([w.to_string(), a.to_string(), d.to_string(), s.to_string()])
}

/// Assigns tags `a`, `b`, `c`, ... in declaration order.
pub fn tag_configs<S: AsRef<str>>(raws: &[S]) -> Result<Vec<WeightConfig>, WeightError> {
    if raws.len() > TAGS.len() {
        return Err(WeightError::TooManyConfigs {
            count: raws.len(),
            max: TAGS.len(),
        });
    }
    TAGS.chars()
        .zip(raws)
        .map(|(tag, raw)| WeightConfig::new(tag, raw.as_ref()))
        .collect()
}

pub fn default_configs() -> Result<Vec<WeightConfig>, WeightError> {
    tag_configs(&DEFAULT_WEIGHTS)
}

pub fn parse_weights_file(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading weights file {}", path.display()))?;
    let mut weights = Vec::new();
    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        weights.push(trimmed.to_string());
    }
    if weights.is_empty() {
        return Err(anyhow!("weights file {} had no configurations", path.display()));
    }
    Ok(weights)
}

/// Picks the active corpus: a weights file wins over `--weights`, which wins
/// over the built-in list.
pub fn resolve_configs(weights: &[String], weights_file: Option<&Path>) -> Result<Vec<WeightConfig>> {
    let configs = if let Some(path) = weights_file {
        tag_configs(&parse_weights_file(path)?)?
    } else if !weights.is_empty() {
        tag_configs(weights)?
    } else {
        default_configs()?
    };
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn strips_brackets_from_outer_tokens_only() {
        let config = WeightConfig::new('l', "[5,25,1,1]").unwrap();
        assert_eq!(config.w, "5");
        assert_eq!(config.a, "25");
        assert_eq!(config.d, "1");
        assert_eq!(config.s, "1");
        assert_eq!(config.raw, "[5,25,1,1]");
    }

    #[test]
    fn unbracketed_outer_tokens_are_kept_whole() {
        assert_eq!(
            split_weights("1,1,1,25").unwrap(),
            ["1", "1", "1", "25"].map(String::from)
        );
        assert_eq!(
            split_weights("(5,1,1,1)").unwrap(),
            ["(5", "1", "1", "1)"].map(String::from)
        );
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert_eq!(
            split_weights("[1,1,1]"),
            Err(WeightError::TokenCount {
                raw: "[1,1,1]".to_string(),
                found: 3
            })
        );
        assert!(split_weights("[1,1,1,1,1]").is_err());
    }

    #[test]
    fn default_corpus_is_tagged_a_through_q() {
        let configs = default_configs().unwrap();
        assert_eq!(configs.len(), 17);
        assert_eq!(configs.first().unwrap().tag, 'a');
        assert_eq!(configs.last().unwrap().tag, 'q');
        assert_eq!(configs[11].raw, "[5,25,1,1]");
        assert_eq!(configs[11].tag, 'l');
    }

    #[test]
    fn default_sweep_ids_are_bounded_and_well_formed() {
        let configs = default_configs().unwrap();
        let ids: BTreeSet<String> = configs
            .iter()
            .flat_map(|config| (0..50).map(move |run| config.bot_id(run)))
            .collect();
        assert!(ids.len() <= 850);
        for id in &ids {
            let mut chars = id.chars();
            let tag = chars.next().unwrap();
            assert!(('a'..='q').contains(&tag), "bad tag in {id}");
            let run: usize = chars.as_str().parse().unwrap();
            assert!(run < 50);
        }
    }

    #[test]
    fn too_many_configs_is_rejected() {
        let raws = vec!["[1,1,1,1]"; 27];
        assert_eq!(
            tag_configs(&raws),
            Err(WeightError::TooManyConfigs { count: 27, max: 26 })
        );
    }
}
