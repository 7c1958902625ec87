//! # Stoichiometric Analysis
//!
//! ## Purpose
//! Builds the net stoichiometric matrix of a model (rows = species in model order,
//! columns = reactions in model order) and decides whether it has full column rank.
//! The rank decides which convenience kinetics variant is used: with full column rank the
//! reactions are thermodynamically independent and the simple form is sufficient, otherwise the
//! thermodynamically independent form with global parameters is required.
//!
//! ## Key Features
//! - net coefficients: products add, reactants subtract
//! - Gaussian elimination with partial pivoting on the largest absolute value
//! - lazy, once-per-run rank cache
use crate::Kinetics::model::{Model, ModelIndex};
use log::{info, warn};
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table};

/// values below this magnitude are treated as zero during elimination
const EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct StoichiometricMatrix {
    pub species: Vec<String>,
    pub reactions: Vec<String>,
    pub matrix: DMatrix<f64>,
}

impl StoichiometricMatrix {
    pub fn from_model(model: &Model, index: &ModelIndex) -> Self {
        let species = index.keys().to_vec();
        let reactions: Vec<String> = model.reactions.iter().map(|r| r.id.clone()).collect();
        let mut matrix = DMatrix::zeros(species.len(), reactions.len());
        for (j, reaction) in model.reactions.iter().enumerate() {
            for (references, sign) in [(&reaction.reactants, -1.0), (&reaction.products, 1.0)] {
                for reference in references.iter().filter(|r| r.has_valid_stoichiometry()) {
                    match index.position(&reference.species) {
                        Some(i) => matrix[(i, j)] += sign * reference.stoichiometry,
                        None => warn!(
                            "reaction {} references unknown species {}, left out of the stoichiometric matrix",
                            reaction.id, reference.species
                        ),
                    }
                }
            }
        }
        Self {
            species,
            reactions,
            matrix,
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self {
            species: (0..nrows).map(|i| format!("s{}", i)).collect(),
            reactions: (0..ncols).map(|j| format!("r{}", j)).collect(),
            matrix: DMatrix::from_row_slice(nrows, ncols, &flat),
        }
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        let mut header = vec![Cell::new("")];
        header.extend(self.reactions.iter().map(|r| Cell::new(r)));
        table.add_row(Row::new(header));
        for (i, species) in self.species.iter().enumerate() {
            let mut row = vec![Cell::new(species)];
            row.extend((0..self.reactions.len()).map(|j| Cell::new(&self.matrix[(i, j)].to_string())));
            table.add_row(Row::new(row));
        }
        table.printstd();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAnalysis {
    pub column_rank: usize,
    pub has_full_column_rank: bool,
}

pub struct StoichiometricRankAnalyzer;

impl StoichiometricRankAnalyzer {
    pub fn analyze(stoichiometry: &StoichiometricMatrix) -> RankAnalysis {
        let (nrows, ncols) = stoichiometry.matrix.shape();
        let mut m = stoichiometry.matrix.clone();
        Self::reduce(&mut m, 0, 0);
        let column_rank = (0..nrows)
            .filter(|&i| (0..ncols).any(|j| m[(i, j)].abs() > EPS))
            .count();
        RankAnalysis {
            column_rank,
            has_full_column_rank: column_rank == ncols && nrows >= ncols,
        }
    }

    /// Row echelon form of the sub-matrix starting at (`row`, `col`).
    fn reduce(m: &mut DMatrix<f64>, row: usize, col: usize) {
        let (nrows, ncols) = m.shape();
        if row >= nrows || col >= ncols {
            return;
        }
        let mut pivot = row;
        for i in row + 1..nrows {
            if m[(i, col)].abs() > m[(pivot, col)].abs() {
                pivot = i;
            }
        }
        if m[(pivot, col)].abs() < EPS {
            // no pivot in this column, the row stays
            Self::reduce(m, row, col + 1);
            return;
        }
        m.swap_rows(row, pivot);
        for i in row + 1..nrows {
            let factor = m[(i, col)] / m[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for j in col..ncols {
                let value = m[(row, j)];
                m[(i, j)] -= factor * value;
            }
            m[(i, col)] = 0.0;
        }
        Self::reduce(m, row + 1, col + 1);
    }
}

/// Rank of the model's stoichiometric matrix, computed on first use within a run.
#[derive(Debug, Clone, Default)]
pub struct RankCache {
    analysis: Option<RankAnalysis>,
}

impl RankCache {
    pub fn reset(&mut self) {
        self.analysis = None;
    }

    pub fn get_or_compute(&mut self, model: &Model, index: &ModelIndex) -> RankAnalysis {
        if let Some(analysis) = self.analysis {
            return analysis;
        }
        let stoichiometry = StoichiometricMatrix::from_model(model, index);
        let analysis = StoichiometricRankAnalyzer::analyze(&stoichiometry);
        info!(
            "stoichiometric matrix {}x{} has column rank {} (full column rank: {})",
            stoichiometry.species.len(),
            stoichiometry.reactions.len(),
            analysis.column_rank,
            analysis.has_full_column_rank
        );
        self.analysis = Some(analysis);
        analysis
    }

    pub fn cached(&self) -> Option<RankAnalysis> {
        self.analysis
    }
}
