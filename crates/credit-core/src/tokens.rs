//! Token decimals table used for amount correction

use std::collections::HashMap;

/// Maps an asset ticker to the number of decimal places of its smallest unit.
///
/// Lookups are exact: `"usdc"` does not match `"USDC"`. Unknown assets have
/// zero decimals, so their raw amounts pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDecimals {
    decimals: HashMap<String, u32>,
}

impl Default for TokenDecimals {
    fn default() -> Self {
        [("USDC", 6), ("WMATIC", 18), ("WETH", 18), ("DAI", 18), ("USDT", 6)]
            .into_iter()
            .map(|(symbol, decimals)| (symbol.to_string(), decimals))
            .collect()
    }
}

impl FromIterator<(String, u32)> for TokenDecimals {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            decimals: iter.into_iter().collect(),
        }
    }
}

impl TokenDecimals {
    /// An empty table: every asset is treated as unknown.
    pub fn empty() -> Self {
        Self {
            decimals: HashMap::new(),
        }
    }

    pub fn with_token(mut self, symbol: impl Into<String>, decimals: u32) -> Self {
        self.decimals.insert(symbol.into(), decimals);
        self
    }

    pub fn decimals(&self, asset: Option<&str>) -> u32 {
        asset
            .and_then(|symbol| self.decimals.get(symbol))
            .copied()
            .unwrap_or(0)
    }

    /// Convert a smallest-unit amount to a human-scale quantity.
    pub fn scale(&self, raw: f64, asset: Option<&str>) -> f64 {
        match self.decimals(asset) {
            0 => raw,
            d => raw / 10f64.powi(d as i32),
        }
    }

    pub fn len(&self) -> usize {
        self.decimals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decimals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = TokenDecimals::default();
        assert_eq!(table.len(), 5);
        assert_eq!(table.decimals(Some("USDC")), 6);
        assert_eq!(table.decimals(Some("WETH")), 18);
        assert_eq!(table.decimals(Some("usdc")), 0);
        assert_eq!(table.decimals(None), 0);
    }

    #[test]
    fn test_scale() {
        let table = TokenDecimals::default();
        assert_eq!(table.scale(1_000_000.0, Some("USDC")), 1.0);
        assert_eq!(table.scale(1e18, Some("DAI")), 1.0);
        assert_eq!(table.scale(1_000_000.0, Some("FOO")), 1_000_000.0);
        assert_eq!(table.scale(42.0, None), 42.0);
    }

    #[test]
    fn test_synthetic_asset() {
        let table = TokenDecimals::empty().with_token("TEST", 2);
        assert_eq!(table.scale(250.0, Some("TEST")), 2.5);
        assert_eq!(table.scale(1_000_000.0, Some("USDC")), 1_000_000.0);
    }
}
