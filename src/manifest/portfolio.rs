use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Holdings recorded at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: DateTime<Utc>,
    pub holdings: Vec<String>,
}

/// Difference between the current holdings and the latest snapshot.
///
/// `added` and `kept` follow the order of the current holdings, `removed`
/// the order of the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub kept: Vec<String>,
    /// No snapshot existed before
    pub is_first: bool,
}

impl PortfolioDelta {
    pub(crate) fn between(previous: Option<&PortfolioSnapshot>, current: &[String]) -> Self {
        let Some(previous) = previous else {
            return Self {
                added: dedup(current),
                is_first: true,
                ..Default::default()
            };
        };

        let before = &previous.holdings;
        let mut delta = Self::default();
        for ticker in dedup(current) {
            if before.contains(&ticker) {
                delta.kept.push(ticker);
            } else {
                delta.added.push(ticker);
            }
        }
        delta.removed = dedup(before)
            .into_iter()
            .filter(|t| !current.contains(t))
            .collect();
        delta
    }

    /// True when nothing was added or removed
    pub fn is_unchanged(&self) -> bool {
        !self.is_first && self.added.is_empty() && self.removed.is_empty()
    }
}

fn dedup(tickers: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tickers.len());
    for t in tickers {
        if !seen.contains(t) {
            seen.push(t.clone());
        }
    }
    seen
}
