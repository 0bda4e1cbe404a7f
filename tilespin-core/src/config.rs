use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOTAL_TIME_SECS;

/// Per-page game settings. The grid and rotation set are fixed; only the time
/// budget and the random seed can be chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub total_time_secs: u32,
    /// Fixed seed for reproducible scrambles; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            total_time_secs: DEFAULT_TOTAL_TIME_SECS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read overrides from a URL query string such as `?time=90&seed=42`.
    /// Unparseable values fall back to the defaults.
    pub fn from_query(search: &str) -> Self {
        let mut cfg = GameConfig::default();
        if let Some(t) = get_query_param(search, "time").and_then(|v| v.parse::<u32>().ok()) {
            cfg.total_time_secs = t.max(1);
        }
        cfg.seed = get_query_param(search, "seed").and_then(|v| v.parse::<u64>().ok());
        cfg
    }
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .unwrap_or_else(|_| s.into())
        .to_string()
}
