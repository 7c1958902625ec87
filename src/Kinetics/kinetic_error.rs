//! Error taxonomy of the kinetic law engine.
//!
//! A `RateLawNotApplicable` error always names the reaction and the violated rule.
//! Structural errors (`MissingSpecies`, `UnknownReaction`) abort the work for one
//! reaction only; the generator records them and continues with the batch.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KineticError {
    /// The reaction shape or its modifiers violate a precondition of the mechanism
    #[error("rate law not applicable to reaction {reaction}: {reason}")]
    RateLawNotApplicable { reaction: String, reason: String },

    /// The reaction references a species that is not declared in the model
    #[error("reaction {reaction} references unknown species {species}")]
    MissingSpecies { reaction: String, species: String },

    /// Negative, NaN or infinite coefficient of a reactant or product
    #[error("reaction {reaction}: invalid stoichiometry {stoichiometry} of species {species}")]
    InvalidStoichiometry {
        reaction: String,
        species: String,
        stoichiometry: f64,
    },

    #[error("no reaction with id {0} in the model")]
    UnknownReaction(String),

    /// An existing formula could not be read back into a formula tree
    #[error("cannot parse formula '{formula}': {reason}")]
    FormulaParse { formula: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl KineticError {
    pub fn not_applicable(reaction: &str, reason: impl Into<String>) -> Self {
        KineticError::RateLawNotApplicable {
            reaction: reaction.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, KineticError::RateLawNotApplicable { .. })
    }
}
