//! Wire payloads exchanged with the host

use serde::{Deserialize, Serialize};

use sl_core::Amount;
use sl_payout::{SpinOutcome, SymbolTable};

/// Event name the host listens for
pub const GAME_RESULT_EVENT: &str = "game_result";

/// Win / loss flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
}

/// One settled spin, as reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinReport {
    pub event: String,
    pub user_id: String,
    /// Total stake debited
    pub bet: Amount,
    /// Line win plus any jackpot
    pub win: Amount,
    pub result: GameResult,
    /// Balance after the spin, if acknowledged
    pub balance: Amount,
    /// Symbol names, row-major
    pub grid: Vec<String>,
    pub winning_cells: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jackpot: Option<Amount>,
    /// Unix time, milliseconds
    pub timestamp: i64,
}

impl SpinReport {
    /// Build from a settled spin, stamped with the current time
    pub fn from_outcome(user_id: impl Into<String>, outcome: &SpinOutcome, table: &SymbolTable) -> Self {
        Self {
            event: GAME_RESULT_EVENT.to_string(),
            user_id: user_id.into(),
            bet: outcome.spin.stake,
            win: outcome.payout,
            result: if outcome.is_win() {
                GameResult::Win
            } else {
                GameResult::Loss
            },
            balance: outcome.balance_after,
            grid: outcome.spin.grid.symbol_names(table),
            winning_cells: outcome.spin.report.winning_cells.iter().copied().collect(),
            jackpot: outcome.jackpot_award,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Host reply to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAck {
    pub accepted: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl DeliveryAck {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sl_payout::{GameConfig, PayoutEngine, SessionState, play_spin};

    #[test]
    fn test_report_from_outcome() {
        let engine = PayoutEngine::from_config(GameConfig::classic()).unwrap();
        let state = SessionState::new(1000, 10);
        let (_, outcome) = play_spin(&state, &engine, None, &mut StdRng::seed_from_u64(4)).unwrap();

        let report = SpinReport::from_outcome("42", &outcome, engine.symbol_table());
        assert_eq!(report.event, "game_result");
        assert_eq!(report.bet, 10);
        assert_eq!(report.grid.len(), 3);
        assert_eq!(report.balance, outcome.balance_after);
        assert_eq!(report.result == GameResult::Win, outcome.payout > 0);
        assert!(report.timestamp > 0);
    }

    #[test]
    fn test_json_shape() {
        let report = SpinReport {
            event: GAME_RESULT_EVENT.into(),
            user_id: "7".into(),
            bet: 10,
            win: 20,
            result: GameResult::Win,
            balance: 1010,
            grid: vec!["🍒".into(), "🍒".into(), "🍋".into()],
            winning_cells: vec![0, 1],
            jackpot: None,
            timestamp: 1_700_000_000_000,
        };
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["event"], "game_result");
        assert_eq!(value["result"], "win");
        assert_eq!(value["winning_cells"], serde_json::json!([0, 1]));
        assert!(value.get("jackpot").is_none());
    }

    #[test]
    fn test_ack_defaults() {
        let ack: DeliveryAck = serde_json::from_str(r#"{"accepted": true}"#).unwrap();
        assert_eq!(ack, DeliveryAck::accepted());
    }
}
