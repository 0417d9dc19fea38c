//! Win evaluation: one evaluator per game variant
//!
//! Every variant is a pure function of (grid, bet, symbol table): no state is
//! carried between spins. Amounts saturate instead of wrapping.

use std::collections::BTreeSet;

use serde::Serialize;

use sl_core::{Amount, ConfigError, ConfigResult};

use crate::grid::{Cell, Grid};
use crate::paylines::{Payline, PaylineSet};
use crate::symbols::SymbolTable;

/// Flat multiplier paid by any pair in the three-reel game
pub const PAIR_MULTIPLIER: u64 = 2;
/// Shortest run that pays on a payline
pub const MIN_RUN: usize = 3;
/// Shortest global tally that pays on the square grid
pub const MIN_TALLY: usize = 3;
/// Diagonals pay double
pub const DIAGONAL_FACTOR: u64 = 2;

/// Win evaluation strategy for a game variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WinEvaluator {
    /// 1×3 grid: triple pays the symbol multiplier, any pair pays flat 2×
    ThreeOfAKind,
    /// Left-to-right runs along enabled paylines, with wild substitution
    FixedPaylineSet {
        rows: usize,
        cols: usize,
        paylines: PaylineSet,
    },
    /// N×N grid: global tally + full rows/columns + doubled diagonals
    LinesAndDiagonals { size: usize },
}

impl WinEvaluator {
    /// Three-reel, single-row evaluator
    pub fn three_of_a_kind() -> Self {
        Self::ThreeOfAKind
    }

    /// Payline evaluator for a rows × cols grid
    pub fn fixed_paylines(rows: usize, cols: usize, paylines: PaylineSet) -> ConfigResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidDimensions { rows, cols });
        }
        paylines.validate(rows, cols)?;
        Ok(Self::FixedPaylineSet {
            rows,
            cols,
            paylines,
        })
    }

    /// Square-grid evaluator
    pub fn lines_and_diagonals(size: usize) -> ConfigResult<Self> {
        if size == 0 {
            return Err(ConfigError::InvalidDimensions { rows: 0, cols: 0 });
        }
        Ok(Self::LinesAndDiagonals { size })
    }

    /// Grid shape this evaluator accepts (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::ThreeOfAKind => (1, 3),
            Self::FixedPaylineSet { rows, cols, .. } => (*rows, *cols),
            Self::LinesAndDiagonals { size } => (*size, *size),
        }
    }

    /// Total amount debited for one spin at `bet`
    ///
    /// Payline games stake `bet` on every enabled line.
    pub fn stake(&self, bet: Amount) -> Amount {
        match self {
            Self::FixedPaylineSet { paylines, .. } => {
                bet.saturating_mul(paylines.active_count() as u64)
            }
            _ => bet,
        }
    }

    pub fn paylines(&self) -> Option<&PaylineSet> {
        match self {
            Self::FixedPaylineSet { paylines, .. } => Some(paylines),
            _ => None,
        }
    }

    pub fn paylines_mut(&mut self) -> Option<&mut PaylineSet> {
        match self {
            Self::FixedPaylineSet { paylines, .. } => Some(paylines),
            _ => None,
        }
    }

    /// Check the symbol table carries what this variant reads
    pub fn validate(&self, table: &SymbolTable) -> ConfigResult<()> {
        if table.is_empty() {
            return Err(ConfigError::EmptyPaytable);
        }

        match self {
            Self::ThreeOfAKind => {
                if table.has_wild() {
                    return Err(ConfigError::WildNotSupported);
                }
                if let Some(s) = table.symbols().iter().find(|s| !s.pays.contains_key(&3)) {
                    return Err(ConfigError::MissingMultipliers {
                        symbol: s.name.clone(),
                        length: 3,
                    });
                }
            }
            Self::FixedPaylineSet { .. } => {
                if let Some(s) = table.symbols().iter().find(|s| !s.wild && s.pays.is_empty()) {
                    return Err(ConfigError::MissingMultipliers {
                        symbol: s.name.clone(),
                        length: MIN_RUN as u8,
                    });
                }
            }
            Self::LinesAndDiagonals { size } => {
                if table.has_wild() {
                    return Err(ConfigError::WildNotSupported);
                }
                if let Some(s) = table.symbols().iter().find(|s| s.pays.is_empty()) {
                    return Err(ConfigError::MissingMultipliers {
                        symbol: s.name.clone(),
                        length: u8::try_from(*size).unwrap_or(u8::MAX),
                    });
                }
            }
        }
        Ok(())
    }

    /// Evaluate a grid at `bet` (per line for payline games)
    pub fn evaluate(&self, grid: &Grid, bet: Amount, table: &SymbolTable) -> ConfigResult<WinReport> {
        if bet == 0 {
            return Err(ConfigError::ZeroBet);
        }

        let (rows, cols) = self.shape();
        if grid.rows() != rows || grid.cols() != cols {
            return Err(ConfigError::ShapeMismatch {
                rows,
                cols,
                actual_rows: grid.rows(),
                actual_cols: grid.cols(),
            });
        }

        self.validate(table)?;
        for &id in grid.cells() {
            table.lookup(id)?;
        }

        let report = match self {
            Self::ThreeOfAKind => evaluate_three_of_a_kind(grid, bet, table)?,
            Self::FixedPaylineSet { paylines, .. } => evaluate_paylines(grid, paylines, bet, table)?,
            Self::LinesAndDiagonals { size } => evaluate_lines_and_diagonals(grid, *size, bet, table)?,
        };

        log::debug!(
            "[Evaluator] bet={} total_win={} cells={}",
            bet,
            report.total_win,
            report.winning_cells.len()
        );
        Ok(report)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete result of evaluating one grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinReport {
    /// Sum of every winning condition
    pub total_win: Amount,
    /// Row-major indices of winning cells, deduplicated
    pub winning_cells: BTreeSet<usize>,
    /// Longest matched run (or largest tally) and its symbol
    pub longest_run: Option<RunInfo>,
    /// Variant-specific breakdown
    pub detail: WinDetail,
}

impl WinReport {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    /// Number of distinct paying conditions
    pub fn win_count(&self) -> usize {
        match &self.detail {
            WinDetail::ThreeOfAKind { outcome } => {
                usize::from(!matches!(outcome, MatchOutcome::NoMatch))
            }
            WinDetail::Paylines { line_wins } => line_wins.len(),
            WinDetail::LinesAndDiagonals { tally, line_wins } => {
                line_wins.len() + usize::from(tally.is_some())
            }
        }
    }
}

/// A run of identical (or wild-substituted) symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    pub symbol_id: u32,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WinDetail {
    ThreeOfAKind {
        outcome: MatchOutcome,
    },
    Paylines {
        line_wins: Vec<LineWin>,
    },
    LinesAndDiagonals {
        tally: Option<TallyWin>,
        line_wins: Vec<GridLineWin>,
    },
}

/// Three-reel match classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    Triple { symbol_id: u32, multiplier: u64 },
    Pair { symbol_id: u32 },
    NoMatch,
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineWin {
    /// Payline index
    pub line_index: u8,
    /// Anchor symbol ID
    pub symbol_id: u32,
    /// Number of matching cells, wilds included
    pub run_length: usize,
    pub multiplier: u64,
    /// Bet per line × multiplier
    pub win_amount: Amount,
    /// Symbols along the whole line, left to right
    pub symbols: Vec<u32>,
    /// Row-major indices of the run's cells
    pub cells: Vec<usize>,
    /// Wild cells inside the run
    pub wild_cells: Vec<usize>,
}

/// Most-frequent-symbol win on the square grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyWin {
    pub symbol_id: u32,
    pub count: usize,
    pub multiplier: u64,
    pub win_amount: Amount,
}

/// Which full line of the square grid matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum GridLine {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl GridLine {
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Self::Diagonal | Self::AntiDiagonal)
    }
}

/// A full row, column or diagonal of identical symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLineWin {
    pub line: GridLine,
    pub symbol_id: u32,
    pub multiplier: u64,
    pub win_amount: Amount,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANT A: THREE OF A KIND
// ═══════════════════════════════════════════════════════════════════════════════

fn evaluate_three_of_a_kind(grid: &Grid, bet: Amount, table: &SymbolTable) -> ConfigResult<WinReport> {
    let cells = grid.cells();
    let (a, b, c) = (cells[0], cells[1], cells[2]);

    let (outcome, total_win, winning, longest_run) = if a == b && b == c {
        let multiplier = table.lookup(a)?.get_pay(3);
        (
            MatchOutcome::Triple {
                symbol_id: a,
                multiplier,
            },
            bet.saturating_mul(multiplier),
            vec![0, 1, 2],
            RunInfo {
                symbol_id: a,
                length: 3,
            },
        )
    } else if a == b || a == c || b == c {
        let (symbol_id, pair) = if a == b {
            (a, vec![0, 1])
        } else if a == c {
            (a, vec![0, 2])
        } else {
            (b, vec![1, 2])
        };
        (
            MatchOutcome::Pair { symbol_id },
            bet.saturating_mul(PAIR_MULTIPLIER),
            pair,
            RunInfo {
                symbol_id,
                length: 2,
            },
        )
    } else {
        (
            MatchOutcome::NoMatch,
            0,
            Vec::new(),
            RunInfo {
                symbol_id: a,
                length: 1,
            },
        )
    };

    Ok(WinReport {
        total_win,
        winning_cells: winning.into_iter().collect(),
        longest_run: Some(longest_run),
        detail: WinDetail::ThreeOfAKind { outcome },
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANT B: FIXED PAYLINE SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Run found along one payline, before pay lookup
struct LineRun {
    anchor: Option<u32>,
    length: usize,
    symbols: Vec<u32>,
    cells: Vec<usize>,
    wild_cells: Vec<usize>,
}

fn walk_line(grid: &Grid, line: &Payline, table: &SymbolTable) -> ConfigResult<LineRun> {
    let mut positions = Vec::with_capacity(line.positions.len());
    for cell in line.cells() {
        let index = grid.index_of(cell).ok_or_else(|| ConfigError::InvalidPayline {
            index: line.index,
            reason: format!("cell ({}, {}) outside the grid", cell.col, cell.row),
        })?;
        positions.push(index);
    }
    let symbols: Vec<u32> = positions.iter().map(|&i| grid.cells()[i]).collect();

    let mut anchor = None;
    let mut length = 0;
    let mut wild_cells = Vec::new();

    for (&index, &symbol) in positions.iter().zip(&symbols) {
        if table.is_wild(symbol) {
            wild_cells.push(index);
        } else {
            match anchor {
                None => anchor = Some(symbol),
                Some(a) if a == symbol => {}
                Some(_) => break,
            }
        }
        length += 1;
    }

    Ok(LineRun {
        anchor,
        length,
        symbols,
        cells: positions[..length].to_vec(),
        wild_cells,
    })
}

fn evaluate_paylines(
    grid: &Grid,
    paylines: &PaylineSet,
    bet_per_line: Amount,
    table: &SymbolTable,
) -> ConfigResult<WinReport> {
    let mut line_wins = Vec::new();
    let mut winning_cells = BTreeSet::new();
    let mut longest_run: Option<RunInfo> = None;

    for line in paylines.active() {
        let run = walk_line(grid, line, table)?;

        // An all-wild line never establishes an anchor and never pays
        let Some(anchor) = run.anchor else {
            continue;
        };

        if longest_run.is_none_or(|r| run.length > r.length) {
            longest_run = Some(RunInfo {
                symbol_id: anchor,
                length: run.length,
            });
        }

        if run.length < MIN_RUN {
            continue;
        }

        let multiplier = table.lookup(anchor)?.get_pay(run.length);
        let win_amount = bet_per_line.saturating_mul(multiplier);
        if win_amount == 0 {
            continue;
        }

        winning_cells.extend(run.cells.iter().copied());
        line_wins.push(LineWin {
            line_index: line.index,
            symbol_id: anchor,
            run_length: run.length,
            multiplier,
            win_amount,
            symbols: run.symbols,
            cells: run.cells,
            wild_cells: run.wild_cells,
        });
    }

    let total_win = line_wins
        .iter()
        .fold(0u64, |acc, w| acc.saturating_add(w.win_amount));

    Ok(WinReport {
        total_win,
        winning_cells,
        longest_run,
        detail: WinDetail::Paylines { line_wins },
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANT C: LINES AND DIAGONALS
// ═══════════════════════════════════════════════════════════════════════════════

/// Symbol counts in first-seen (row-major) order
fn tally(grid: &Grid) -> Vec<(u32, usize)> {
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for &id in grid.cells() {
        match counts.iter_mut().find(|(s, _)| *s == id) {
            Some(entry) => entry.1 += 1,
            None => counts.push((id, 1)),
        }
    }
    counts
}

/// Shared symbol of a full line, if every cell matches
fn uniform(grid: &Grid, cells: &[Cell]) -> Option<u32> {
    let first = grid.get(*cells.first()?)?;
    cells
        .iter()
        .all(|&c| grid.get(c) == Some(first))
        .then_some(first)
}

fn evaluate_lines_and_diagonals(
    grid: &Grid,
    size: usize,
    bet: Amount,
    table: &SymbolTable,
) -> ConfigResult<WinReport> {
    let mut winning_cells = BTreeSet::new();

    // 1. Global tally: strictly greater keeps the first-seen symbol on ties
    let counts = tally(grid);
    let (top_symbol, top_count) = counts
        .iter()
        .copied()
        .fold(counts[0], |best, entry| if entry.1 > best.1 { entry } else { best });

    let mut tally_win = None;
    if top_count >= MIN_TALLY {
        let multiplier = table.lookup(top_symbol)?.get_pay(top_count);
        let win_amount = bet.saturating_mul(multiplier);
        if win_amount > 0 {
            winning_cells.extend(
                grid.cells()
                    .iter()
                    .enumerate()
                    .filter(|(_, id)| **id == top_symbol)
                    .map(|(i, _)| i),
            );
            tally_win = Some(TallyWin {
                symbol_id: top_symbol,
                count: top_count,
                multiplier,
                win_amount,
            });
        }
    }

    // 2 + 3. Rows, columns, diagonals
    let mut lines: Vec<(GridLine, Vec<Cell>)> = Vec::with_capacity(2 * size + 2);
    for row in 0..size {
        lines.push((GridLine::Row(row), (0..size).map(|col| Cell::new(col, row)).collect()));
    }
    for col in 0..size {
        lines.push((GridLine::Column(col), (0..size).map(|row| Cell::new(col, row)).collect()));
    }
    lines.push((GridLine::Diagonal, (0..size).map(|i| Cell::new(i, i)).collect()));
    lines.push((
        GridLine::AntiDiagonal,
        (0..size).map(|i| Cell::new(size - 1 - i, i)).collect(),
    ));

    let mut line_wins = Vec::new();
    for (line, cells) in lines {
        let Some(symbol_id) = uniform(grid, &cells) else {
            continue;
        };
        let multiplier = table.lookup(symbol_id)?.get_pay(size);
        let factor = if line.is_diagonal() { DIAGONAL_FACTOR } else { 1 };
        let win_amount = bet.saturating_mul(multiplier).saturating_mul(factor);
        if win_amount == 0 {
            continue;
        }

        winning_cells.extend(cells.iter().filter_map(|&c| grid.index_of(c)));
        line_wins.push(GridLineWin {
            line,
            symbol_id,
            multiplier,
            win_amount,
        });
    }

    let total_win = line_wins
        .iter()
        .map(|w| w.win_amount)
        .chain(tally_win.as_ref().map(|t| t.win_amount))
        .fold(0u64, |acc, w| acc.saturating_add(w));

    Ok(WinReport {
        total_win,
        winning_cells,
        longest_run: Some(RunInfo {
            symbol_id: top_symbol,
            length: top_count,
        }),
        detail: WinDetail::LinesAndDiagonals {
            tally: tally_win,
            line_wins,
        },
    })
}
