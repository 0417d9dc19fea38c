//! Symbol definitions and the weighted symbol table

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use sl_core::{ConfigError, ConfigResult};

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Display name (e.g., "🍒", "CHERRY", "WILD")
    pub name: String,
    /// Relative draw weight
    pub weight: u32,
    /// Run length → multiplier
    #[serde(default)]
    pub pays: BTreeMap<u8, u64>,
    /// Wild - substitutes for others, never anchors a run
    #[serde(default)]
    pub wild: bool,
}

impl Symbol {
    /// Create a regular symbol with run-length pays
    pub fn regular(id: u32, name: impl Into<String>, weight: u32, pays: &[(u8, u64)]) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            pays: pays.iter().copied().collect(),
            wild: false,
        }
    }

    /// Create a symbol with a single three-of-a-kind multiplier
    pub fn triple(id: u32, name: impl Into<String>, weight: u32, multiplier: u64) -> Self {
        Self::regular(id, name, weight, &[(3, multiplier)])
    }

    /// Create a wild symbol
    pub fn wild(id: u32, name: impl Into<String>, weight: u32) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            pays: BTreeMap::new(),
            wild: true,
        }
    }

    /// Get the multiplier for a run or tally of `count` symbols (0 when absent)
    pub fn get_pay(&self, count: usize) -> u64 {
        u8::try_from(count)
            .ok()
            .and_then(|c| self.pays.get(&c))
            .copied()
            .unwrap_or(0)
    }
}

/// Immutable paytable with a cumulative-weight sampler
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    /// cumulative[i] = sum of weights of symbols[0..=i]
    cumulative: Vec<u64>,
    total_weight: u64,
}

impl SymbolTable {
    /// Build a table, validating weights and ids
    pub fn new(symbols: Vec<Symbol>) -> ConfigResult<Self> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptyPaytable);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        let mut cumulative = Vec::with_capacity(symbols.len());
        let mut total_weight = 0u64;

        for symbol in &symbols {
            if !seen.insert(symbol.id) {
                return Err(ConfigError::DuplicateSymbol(symbol.id));
            }
            if symbol.weight == 0 {
                return Err(ConfigError::ZeroWeight(symbol.name.clone()));
            }
            total_weight += u64::from(symbol.weight);
            cumulative.push(total_weight);
        }

        if total_weight == 0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        Ok(Self {
            symbols,
            cumulative,
            total_weight,
        })
    }

    /// Draw one symbol; probability = weight / total_weight
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &Symbol {
        let draw = rng.random_range(0..self.total_weight);
        let idx = self.cumulative.partition_point(|&c| c <= draw);
        &self.symbols[idx]
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Get symbol by ID or fail with `UnknownSymbol`
    pub fn lookup(&self, id: u32) -> ConfigResult<&Symbol> {
        self.get(id).ok_or(ConfigError::UnknownSymbol(id))
    }

    /// Check whether an ID belongs to a wild symbol
    pub fn is_wild(&self, id: u32) -> bool {
        self.get(id).is_some_and(|s| s.wild)
    }

    /// Any wild in the table?
    pub fn has_wild(&self) -> bool {
        self.symbols.iter().any(|s| s.wild)
    }

    /// All symbols, in configuration order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Draw probability of a symbol (0.0 for unknown IDs)
    pub fn probability(&self, id: u32) -> f64 {
        self.get(id)
            .map(|s| f64::from(s.weight) / self.total_weight as f64)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fruit() -> Vec<Symbol> {
        vec![
            Symbol::triple(1, "🍒", 30, 2),
            Symbol::triple(2, "🍋", 25, 3),
            Symbol::triple(3, "7️⃣", 1, 100),
        ]
    }

    #[test]
    fn test_symbol_pay() {
        let symbol = Symbol::regular(1, "HP1", 10, &[(3, 20), (4, 100), (5, 500)]);
        assert_eq!(symbol.get_pay(2), 0);
        assert_eq!(symbol.get_pay(3), 20);
        assert_eq!(symbol.get_pay(4), 100);
        assert_eq!(symbol.get_pay(5), 500);
        assert_eq!(symbol.get_pay(25), 0);
        assert_eq!(symbol.get_pay(1000), 0);
    }

    #[test]
    fn test_table_validation() {
        assert_eq!(SymbolTable::new(Vec::new()).unwrap_err(), ConfigError::EmptyPaytable);

        let zero = vec![Symbol::triple(1, "A", 0, 2)];
        assert!(matches!(
            SymbolTable::new(zero),
            Err(ConfigError::ZeroWeight(_))
        ));

        let dup = vec![Symbol::triple(1, "A", 1, 2), Symbol::triple(1, "B", 1, 2)];
        assert_eq!(
            SymbolTable::new(dup).unwrap_err(),
            ConfigError::DuplicateSymbol(1)
        );
    }

    #[test]
    fn test_probability() {
        let table = SymbolTable::new(fruit()).unwrap();
        assert_eq!(table.total_weight(), 56);
        assert!((table.probability(1) - 30.0 / 56.0).abs() < 1e-12);
        assert_eq!(table.probability(99), 0.0);
    }

    #[test]
    fn test_sample_deterministic() {
        let table = SymbolTable::new(fruit()).unwrap();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let draws_a: Vec<u32> = (0..200).map(|_| table.sample(&mut a).id).collect();
        let draws_b: Vec<u32> = (0..200).map(|_| table.sample(&mut b).id).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_sample_single_symbol() {
        let table = SymbolTable::new(vec![Symbol::triple(9, "ONLY", 3, 2)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(table.sample(&mut rng).id, 9);
        }
    }

    #[test]
    fn test_sample_covers_all_symbols() {
        let table = SymbolTable::new(vec![
            Symbol::triple(1, "A", 1, 2),
            Symbol::triple(2, "B", 1, 2),
            Symbol::triple(3, "C", 1, 2),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(table.sample(&mut rng).id);
        }
        assert_eq!(seen.len(), 3);
    }
}
