//! Distribution checks for the symbol sampler

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sl_payout::SymbolTable;

/// Chi-square critical values at p = 0.001, degrees of freedom 1..=10
const CRITICAL_P001: [f64; 10] = [
    10.828, 13.816, 16.266, 18.467, 20.515, 22.458, 24.322, 26.124, 27.877, 29.588,
];

/// Critical value at p = 0.001 for `df` degrees of freedom (1..=10)
pub fn chi_square_critical_p001(df: usize) -> Option<f64> {
    df.checked_sub(1).and_then(|i| CRITICAL_P001.get(i)).copied()
}

/// Pearson chi-square statistic of observed counts against probabilities
///
/// Cells with zero expected probability are skipped.
pub fn chi_square(observed: &[u64], probabilities: &[f64]) -> f64 {
    let total: u64 = observed.iter().sum();
    observed
        .iter()
        .zip(probabilities)
        .filter(|(_, p)| **p > 0.0)
        .map(|(&o, &p)| {
            let expected = total as f64 * p;
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Draw `draws` symbols and count them, in table order
pub fn sample_frequencies(table: &SymbolTable, draws: u64, seed: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut counts = vec![0u64; table.len()];
    for _ in 0..draws {
        let id = table.sample(&mut rng).id;
        if let Some(pos) = table.symbols().iter().position(|s| s.id == id) {
            counts[pos] += 1;
        }
    }
    counts
}

/// Expected draw probability of each symbol, in table order
pub fn expected_probabilities(table: &SymbolTable) -> Vec<f64> {
    table
        .symbols()
        .iter()
        .map(|s| table.probability(s.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi_square_exact_fit_is_zero() {
        let stat = chi_square(&[50, 30, 20], &[0.5, 0.3, 0.2]);
        assert!(stat.abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_hand_computed() {
        // expected 50/50: (60-50)²/50 + (40-50)²/50 = 4
        let stat = chi_square(&[60, 40], &[0.5, 0.5]);
        assert!((stat - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_critical_table() {
        assert_eq!(chi_square_critical_p001(6), Some(22.458));
        assert_eq!(chi_square_critical_p001(0), None);
        assert_eq!(chi_square_critical_p001(11), None);
    }
}
