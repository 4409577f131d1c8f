use crate::catalog::SymbolStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rectangular clip region shown while a cascade is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Board construction options. Every field has a usable default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub columns: usize,
    pub cell_size: f64,
    pub cell_texture: String,
    /// Number of staging-strip slots offered for drag-in.
    pub option_count: usize,
    pub symbols: BTreeMap<String, SymbolStyle>,
    pub mask: Option<MaskRegion>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: 5,
            columns: 5,
            cell_size: 100.,
            cell_texture: "default-tile".to_string(),
            option_count: 3,
            symbols: BTreeMap::new(),
            mask: None,
        }
    }
}

impl BoardConfig {
    pub fn board_width(&self) -> f64 {
        self.columns as f64 * self.cell_size
    }

    pub fn board_height(&self) -> f64 {
        self.rows as f64 * self.cell_size
    }

    /// Clip region used during cascades: the configured mask, or the board.
    pub fn mask_region(&self) -> MaskRegion {
        self.mask.unwrap_or(MaskRegion {
            x: 0.,
            y: 0.,
            width: self.board_width(),
            height: self.board_height(),
        })
    }
}

fn default_win_check(moves: u32, score: u32) -> bool {
    moves <= 25 && score >= 1000
}

fn default_calc_score(moves: u32) -> u32 {
    moves * moves * 10
}

/// Move and scoring policy. The predicates are plain function pointers so the
/// whole rule set stays `Copy` and caller-overridable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameRules {
    pub max_moves: u32,
    pub min_win_count: usize,
    pub win_check: fn(moves: u32, score: u32) -> bool,
    pub calc_score: fn(moves: u32) -> u32,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            max_moves: 25,
            min_win_count: 3,
            win_check: default_win_check,
            calc_score: default_calc_score,
        }
    }
}
