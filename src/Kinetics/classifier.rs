//! # Reaction Classifier
//!
//! ## Purpose
//! Decides from the topology of a reaction (summed stoichiometry of both sides, role of the
//! sole reactant, modifiers) which mechanisms are admissible and which one the generator uses.
//!
//! ## Decision rules
//! - without an enzyme (and without `forceAllReactionsEnzymeCatalyzed`) the choice is generalized
//!   mass action, unless the sole reactant is a gene or RNA (Hill equation)
//! - with an enzyme the `(S_r, S_p)` pair selects the configured uni-uni, bi-uni or bi-bi
//!   mechanism; everything else falls back to convenience kinetics
//! - a Hill choice without any regulator degrades to zeroth order forward mass action (genes,
//!   irreversible reactions) or to generalized mass action (reversible RNA reactions)
//!
//! Gene regulation is checked up front: a gene may only carry transcriptional regulators, an RNA
//! only translational ones, and regular activators/inhibitors never mix with either.
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{ModelIndex, Reaction, ReactionKind, SpeciesRole};
use crate::Kinetics::rate_laws::{KineticLawType, ModifierClassification};
use crate::settings::KineticsOptions;
use std::collections::BTreeSet;

/// Result of the classification of one reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub admissible: BTreeSet<KineticLawType>,
    pub chosen: KineticLawType,
    /// genes used as sole reactant, to be fixed as boundary species
    pub buffered_genes: Vec<String>,
}

/// Topological summary of a reaction.
struct Topology {
    reactant_order: f64,
    product_order: f64,
    sole_reactant: Option<(String, SpeciesRole)>,
    sole_product_role: Option<SpeciesRole>,
    has_gene: bool,
    has_rna: bool,
    integer_reactants: bool,
    integer_all: bool,
}

impl Topology {
    fn new(reaction: &Reaction, index: &ModelIndex) -> Self {
        let role = |species: &str| index.role(species).unwrap_or_default();
        let sole_reactant = match reaction.reactants.as_slice() {
            [single] => Some((single.species.clone(), role(&single.species))),
            _ => None,
        };
        let sole_product_role = match reaction.products.as_slice() {
            [single] => Some(role(&single.species)),
            _ => None,
        };
        Topology {
            reactant_order: reaction.reactant_order(),
            product_order: reaction.product_order(),
            sole_reactant,
            sole_product_role,
            has_gene: reaction
                .reactants
                .iter()
                .any(|r| role(&r.species) == SpeciesRole::Gene),
            has_rna: reaction
                .reactants
                .iter()
                .any(|r| role(&r.species) == SpeciesRole::Rna),
            integer_reactants: reaction.reactants.iter().all(|r| r.has_integer_stoichiometry()),
            integer_all: reaction
                .reactants
                .iter()
                .chain(reaction.products.iter())
                .all(|r| r.has_integer_stoichiometry()),
        }
    }

    fn sole_role(&self) -> Option<SpeciesRole> {
        self.sole_reactant.as_ref().map(|(_, role)| *role)
    }

    fn sole_gene(&self) -> Vec<String> {
        match &self.sole_reactant {
            Some((species, SpeciesRole::Gene)) => vec![species.clone()],
            _ => Vec::new(),
        }
    }

    fn gene_or_rna_reactant(&self) -> bool {
        matches!(self.sole_role(), Some(SpeciesRole::Gene | SpeciesRole::Rna))
    }

    /// synthesis of a protein or RNA from the empty set
    fn synthesis_from_sink(&self) -> bool {
        self.sole_role() == Some(SpeciesRole::Degraded)
            && matches!(
                self.sole_product_role,
                Some(SpeciesRole::Protein | SpeciesRole::Rna)
            )
    }

    fn is_uni(&self) -> bool {
        self.reactant_order == 1.0 && self.sole_reactant.is_some()
    }
}

pub struct ReactionClassifier<'a> {
    index: &'a ModelIndex,
    options: &'a KineticsOptions,
}

impl<'a> ReactionClassifier<'a> {
    pub fn new(index: &'a ModelIndex, options: &'a KineticsOptions) -> Self {
        Self { index, options }
    }

    /// Classifies one reaction. `reaction.reversible` must already include the
    /// `treatAsReversible` option. `full_rank` is only evaluated when the admissibility of
    /// convenience kinetics depends on it.
    pub fn classify(
        &self,
        reaction: &Reaction,
        mods: &ModifierClassification,
        full_rank: impl FnOnce() -> bool,
    ) -> Result<Classification, KineticError> {
        let topology = Topology::new(reaction, self.index);
        self.check_gene_regulation(reaction, mods, &topology)?;
        let chosen = self.choose(reaction, mods, &topology)?;
        let admissible = self.admissible(reaction, mods, &topology, full_rank);
        Ok(Classification {
            admissible,
            chosen,
            buffered_genes: topology.sole_gene(),
        })
    }

    /// Gene/RNA regulation rules alone, for a mechanism picked by the caller.
    pub fn check_regulation(
        &self,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<(), KineticError> {
        let topology = Topology::new(reaction, self.index);
        self.check_gene_regulation(reaction, mods, &topology)
    }

    /// The gene used as sole reactant, whatever law the reaction finally gets.
    pub fn genes_to_buffer(&self, reaction: &Reaction) -> Vec<String> {
        Topology::new(reaction, self.index).sole_gene()
    }

    fn check_gene_regulation(
        &self,
        reaction: &Reaction,
        mods: &ModifierClassification,
        topology: &Topology,
    ) -> Result<(), KineticError> {
        if mods.has_regular_regulators() && mods.has_trans_regulators() {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "Mixture of translational/transcriptional and regular activation/inhibition is not allowed.",
            ));
        }
        let transcriptional = reaction.modifiers.iter().any(|m| m.role.is_transcriptional());
        let translational = reaction.modifiers.iter().any(|m| m.role.is_translational());
        match topology.sole_role() {
            Some(SpeciesRole::Gene) => {
                if reaction.kind == ReactionKind::Translation {
                    return Err(KineticError::not_applicable(
                        &reaction.id,
                        format!("Reaction {} must be a transcription.", reaction.id),
                    ));
                }
                if mods.has_regular_regulators() || translational {
                    return Err(KineticError::not_applicable(
                        &reaction.id,
                        "A gene can only be regulated by transcriptional activation or inhibition.",
                    ));
                }
            }
            Some(SpeciesRole::Rna) => {
                if reaction.kind == ReactionKind::Transcription {
                    return Err(KineticError::not_applicable(
                        &reaction.id,
                        format!("Reaction {} must be a translation.", reaction.id),
                    ));
                }
                if mods.has_regular_regulators() || transcriptional {
                    return Err(KineticError::not_applicable(
                        &reaction.id,
                        "An RNA can only be regulated by translational activation or inhibition.",
                    ));
                }
            }
            _ => {}
        }
        if reaction.kind == ReactionKind::Transcription && !topology.has_gene {
            return Err(KineticError::not_applicable(
                &reaction.id,
                format!("Reaction {} must not be a transcription.", reaction.id),
            ));
        }
        if reaction.kind == ReactionKind::Translation && !topology.has_rna {
            return Err(KineticError::not_applicable(
                &reaction.id,
                format!("Reaction {} must not be a translation.", reaction.id),
            ));
        }
        Ok(())
    }

    fn choose(
        &self,
        reaction: &Reaction,
        mods: &ModifierClassification,
        topology: &Topology,
    ) -> Result<KineticLawType, KineticError> {
        let options = self.options;
        let (s_r, s_p) = (topology.reactant_order, topology.product_order);
        let mut chosen = if options.force_enzyme_for_all || !mods.enzymes.is_empty() {
            if topology.is_uni() {
                if s_p == 1.0 {
                    if topology.gene_or_rna_reactant() {
                        KineticLawType::Hill
                    } else {
                        options.uni_uni_mechanism.law_type()
                    }
                } else if !reaction.reversible {
                    options.uni_uni_mechanism.law_type()
                } else {
                    KineticLawType::Convenience
                }
            } else if s_r == 2.0 && s_p == 1.0 {
                options.bi_uni_mechanism.law_type()
            } else if s_r == 2.0 && s_p == 2.0 {
                options.bi_bi_mechanism.law_type()
            } else {
                KineticLawType::Convenience
            }
        } else if reaction.reactants.len() == 1 && reaction.products.len() == 1 {
            if topology.sole_product_role == Some(SpeciesRole::Degraded) {
                KineticLawType::GeneralizedMassAction
            } else if topology.synthesis_from_sink() || topology.gene_or_rna_reactant() {
                KineticLawType::Hill
            } else {
                KineticLawType::GeneralizedMassAction
            }
        } else {
            KineticLawType::GeneralizedMassAction
        };

        if chosen == KineticLawType::Hill && !mods.has_trans_regulators() {
            let gene = topology.has_gene;
            chosen = if !reaction.reversible || gene {
                if mods.has_regular_regulators()
                    || !mods.enzymes.is_empty()
                    || !mods.catalysts.is_empty()
                {
                    KineticLawType::Hill
                } else {
                    KineticLawType::ZerothOrderForward
                }
            } else {
                KineticLawType::GeneralizedMassAction
            };
        }
        if reaction.kind != ReactionKind::StateTransition
            && !matches!(chosen, KineticLawType::Hill | KineticLawType::ZerothOrderForward)
        {
            return Err(KineticError::not_applicable(
                &reaction.id,
                format!("Reaction {} must be a state transition.", reaction.id),
            ));
        }
        Ok(chosen)
    }

    /// All mechanisms that can be offered for the reaction.
    fn admissible(
        &self,
        reaction: &Reaction,
        mods: &ModifierClassification,
        topology: &Topology,
        full_rank: impl FnOnce() -> bool,
    ) -> BTreeSet<KineticLawType> {
        use KineticLawType::*;
        let (s_r, s_p) = (topology.reactant_order, topology.product_order);
        let mut types = BTreeSet::from([GeneralizedMassAction]);
        if reaction.kind != ReactionKind::StateTransition {
            types.insert(Hill);
        }
        let non_enzyme = !mods.catalysts.is_empty()
            || topology.sole_product_role == Some(SpeciesRole::Degraded);

        if !reaction.reversible && !non_enzyme && topology.integer_reactants {
            if !mods.is_modulated() && s_r > 1.0 {
                types.insert(IrreversibleNonModulated);
            }
            if topology.is_uni() && (mods.inhibitors.len() > 1 || !mods.trans_inhibitors.is_empty()) {
                types.insert(IrreversibleCompetitive);
            }
        }

        let mut uni_uni_without_modulation = false;
        if topology.is_uni() {
            if s_p == 1.0 {
                if topology.gene_or_rna_reactant() || topology.synthesis_from_sink() {
                    types.insert(Hill);
                }
                let single_product = reaction.products.len() == 1;
                let many_inhibitors =
                    mods.inhibitors.len() > 1 || mods.trans_inhibitors.len() > 1;
                if !non_enzyme && !(reaction.reversible && (many_inhibitors || !single_product)) {
                    types.insert(MichaelisMenten);
                }
                uni_uni_without_modulation = !mods.is_modulated();
            } else if !reaction.reversible && !non_enzyme {
                types.insert(MichaelisMenten);
            }
        } else if s_r == 2.0 && !non_enzyme && topology.integer_all {
            if s_p == 1.0 {
                types.insert(RandomOrder);
                types.insert(Ordered);
            } else if s_p == 2.0 {
                types.insert(RandomOrder);
                types.insert(PingPong);
                types.insert(Ordered);
            }
        }
        if !non_enzyme && topology.integer_all && !(uni_uni_without_modulation && full_rank()) {
            types.insert(Convenience);
        }

        if topology.has_gene {
            types.insert(ZerothOrderForward);
            types.remove(&GeneralizedMassAction);
        } else if reaction.reversible && types.contains(&GeneralizedMassAction) {
            types.insert(ZerothOrderReverse);
        }

        let unregulated = mods.trans_activators.is_empty()
            && mods.trans_inhibitors.is_empty()
            && mods.activators.is_empty()
            && mods.enzymes.is_empty()
            && mods.catalysts.is_empty();
        if unregulated {
            if topology.has_gene {
                types = BTreeSet::from([ZerothOrderForward, Hill]);
            }
        } else if types.contains(&Hill) && types.contains(&ZerothOrderForward) && !reaction.reversible {
            types.remove(&ZerothOrderForward);
        }
        if types.contains(&GeneralizedMassAction) {
            types.insert(ZerothOrderForward);
        }
        types
    }
}
