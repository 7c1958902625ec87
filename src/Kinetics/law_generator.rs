//! # Kinetic Law Generator
//!
//! ## Purpose
//! Drives the generation of kinetic laws for a whole model: for every reaction it decides
//! whether a law is needed, classifies the reaction, synthesizes the chosen mechanism, writes
//! the result back into the model and finally assembles the species balance equations.
//!
//! ## Workflow
//! 1. reset the parameter registry and the rank cache of the run
//! 2. per reaction in model order:
//!    - structural check (unknown species are recorded as failures, the run continues)
//!    - existing laws are kept unless `regenerateExistingLaws` is set; blank laws are
//!      reported and regenerated
//!    - classify → synthesize; with `fallbackToMassAction` a mechanism that does not apply is
//!      replaced by generalized mass action
//!    - the law text and the final reversibility are written back, genes used as sole reactant
//!      become boundary species
//! 3. assemble the ODEs
//!
//! ## Example
//! ```rust, ignore
//! use KiLaw::Kinetics::law_generator::KineticLawGenerator;
//! use KiLaw::settings::KineticsOptions;
//!
//! let mut generator = KineticLawGenerator::new(KineticsOptions::default());
//! let report = generator.generate(&mut model)?;
//! report.pretty_print_laws();
//! report.pretty_print_odes();
//! ```
use crate::Kinetics::classifier::{Classification, ReactionClassifier};
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{Model, ModelIndex, Reaction};
use crate::Kinetics::ode_assembler::{OdeAssembler, ReactionRate, SpeciesOde};
use crate::Kinetics::parameters::ParameterRegistry;
use crate::Kinetics::rate_laws::{
    GeneratedLaw, KineticLawType, LawContext, Mechanism, ModifierClassification,
    RateLawSynthesis,
};
use crate::Kinetics::stoichiometry_analyzer::RankCache;
use crate::settings::KineticsOptions;
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// Law that was already present in the model and kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingLaw {
    pub reaction_id: String,
    pub formula: String,
    /// LaTeX form, absent when the formula could not be parsed
    pub typeset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionFailure {
    pub reaction_id: String,
    pub message: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub laws: Vec<GeneratedLaw>,
    pub existing: Vec<ExistingLaw>,
    pub failures: Vec<ReactionFailure>,
    pub odes: Vec<SpeciesOde>,
    /// global parameters introduced during the run, in order of first use
    pub global_parameters: Vec<String>,
    /// species whose boundary flag was set during the run
    pub buffered_species: Vec<String>,
    /// `None` when no convenience kinetics needed the rank
    pub has_full_column_rank: Option<bool>,
}

impl GenerationReport {
    pub fn law(&self, reaction_id: &str) -> Option<&GeneratedLaw> {
        self.laws.iter().find(|l| l.reaction_id == reaction_id)
    }

    pub fn ode(&self, species: &str) -> Option<&SpeciesOde> {
        self.odes.iter().find(|o| o.species == species)
    }

    pub fn pretty_print_laws(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("reaction"),
            Cell::new("mechanism"),
            Cell::new("rate law"),
            Cell::new("parameters"),
        ]));
        for law in &self.laws {
            let parameters: Vec<&str> = law
                .local_parameters
                .iter()
                .chain(law.global_parameters.iter())
                .map(|p| p.as_str())
                .collect();
            table.add_row(Row::new(vec![
                Cell::new(&law.reaction_id),
                Cell::new(&law.name),
                Cell::new(&law.text),
                Cell::new(&parameters.join(", ")),
            ]));
        }
        for law in &self.existing {
            table.add_row(Row::new(vec![
                Cell::new(&law.reaction_id),
                Cell::new("existing kinetic law"),
                Cell::new(&law.formula),
                Cell::new(""),
            ]));
        }
        table.printstd();
        for failure in &self.failures {
            println!("\x1b[31m{}: {}\x1b[0m", failure.reaction_id, failure.message);
        }
    }

    pub fn pretty_print_odes(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("species"),
            Cell::new("d[S]/dt"),
            Cell::new("expanded"),
        ]));
        for ode in &self.odes {
            table.add_row(Row::new(vec![
                Cell::new(&ode.name),
                Cell::new(&ode.simple),
                Cell::new(&ode.expanded),
            ]));
        }
        table.printstd();
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KineticError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

pub struct KineticLawGenerator {
    options: KineticsOptions,
    registry: ParameterRegistry,
    rank: RankCache,
}

impl KineticLawGenerator {
    pub fn new(options: KineticsOptions) -> Self {
        Self {
            options,
            registry: ParameterRegistry::new(),
            rank: RankCache::default(),
        }
    }

    pub fn options(&self) -> &KineticsOptions {
        &self.options
    }

    /// Parameters registered since the last `generate`.
    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    fn prepare(&self, reaction: &Reaction) -> Reaction {
        let mut reaction = reaction.clone();
        reaction.reversible = reaction.reversible || self.options.treat_as_reversible;
        reaction
    }

    fn classify(
        &mut self,
        model: &Model,
        index: &ModelIndex,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<Classification, KineticError> {
        let classifier = ReactionClassifier::new(index, &self.options);
        let rank = &mut self.rank;
        classifier.classify(reaction, mods, || {
            rank.get_or_compute(model, index).has_full_column_rank
        })
    }

    fn synthesize(
        &mut self,
        model: &Model,
        index: &ModelIndex,
        reaction: &Reaction,
        mods: &ModifierClassification,
        law_type: KineticLawType,
    ) -> Result<GeneratedLaw, KineticError> {
        let full_rank = law_type == KineticLawType::Convenience
            && self.rank.get_or_compute(model, index).has_full_column_rank;
        let mechanism = Mechanism::for_law_type(law_type, full_rank);
        self.registry.begin_law();
        let mut ctx = LawContext::new(&mut self.registry, index, self.options.store_parameters_globally);
        mechanism.synthesize(&mut ctx, reaction, mods)
    }

    /// Admissible mechanisms of one reaction, for presenting a choice to the user.
    pub fn possible_law_types(
        &mut self,
        model: &Model,
        reaction_id: &str,
    ) -> Result<BTreeSet<KineticLawType>, KineticError> {
        let position = model
            .reaction_position(reaction_id)
            .ok_or_else(|| KineticError::UnknownReaction(reaction_id.to_string()))?;
        let index = ModelIndex::new(model);
        let reaction = self.prepare(&model.reactions[position]);
        index.validate_reaction(&reaction)?;
        let mods = ModifierClassification::from_reaction(
            &reaction,
            &index,
            &self.options.enzyme_species_roles,
        );
        Ok(self.classify(model, &index, &reaction, &mods)?.admissible)
    }

    /// Builds the law of the chosen mechanism for one reaction and writes it into the model.
    /// Parameters registered by earlier calls stay registered, so repeated calls never
    /// issue a global parameter twice.
    pub fn create_law(
        &mut self,
        model: &mut Model,
        reaction_id: &str,
        law_type: KineticLawType,
    ) -> Result<GeneratedLaw, KineticError> {
        let position = model
            .reaction_position(reaction_id)
            .ok_or_else(|| KineticError::UnknownReaction(reaction_id.to_string()))?;
        let index = ModelIndex::new(model);
        let reaction = self.prepare(&model.reactions[position]);
        index.validate_reaction(&reaction)?;
        let mods = ModifierClassification::from_reaction(
            &reaction,
            &index,
            &self.options.enzyme_species_roles,
        );
        let classifier = ReactionClassifier::new(&index, &self.options);
        classifier.check_regulation(&reaction, &mods)?;
        let buffered_genes = classifier.genes_to_buffer(&reaction);
        let law = self.synthesize(model, &index, &reaction, &mods, law_type)?;
        store_law(&mut model.reactions[position], &law);
        if self.options.set_boundary_condition_for_genes {
            let mut buffered = Vec::new();
            for gene in buffered_genes {
                set_boundary(model, &gene, &mut buffered);
            }
        }
        info!("reaction {}: {}", reaction_id, law.name);
        Ok(law)
    }

    /// Generates the missing laws of the model and assembles its ODEs.
    pub fn generate(&mut self, model: &mut Model) -> Result<GenerationReport, KineticError> {
        self.registry.reset();
        self.rank.reset();
        let index = ModelIndex::new(model);
        let reactions = model.reactions.clone();
        let mut report = GenerationReport::default();
        let mut rates = Vec::with_capacity(reactions.len());

        for (j, declared) in reactions.iter().enumerate() {
            if let Err(e) = index.validate_reaction(declared) {
                warn!("{}", e);
                report.failures.push(ReactionFailure {
                    reaction_id: declared.id.clone(),
                    message: e.to_string(),
                });
                rates.push(ReactionRate::Missing);
                continue;
            }
            if declared.has_blank_law() {
                warn!(
                    "reaction {} has an empty kinetic law, a new law is generated",
                    declared.id
                );
            } else if declared.has_existing_law() && !self.options.regenerate_existing_laws {
                let (existing, rate) = keep_existing_law(declared, &index);
                report.existing.push(existing);
                rates.push(rate);
                continue;
            }

            let reaction = self.prepare(declared);
            let mods = ModifierClassification::from_reaction(
                &reaction,
                &index,
                &self.options.enzyme_species_roles,
            );
            let outcome = self
                .classify(model, &index, &reaction, &mods)
                .and_then(|classification| {
                    let law =
                        self.synthesize(model, &index, &reaction, &mods, classification.chosen)?;
                    Ok((law, classification.buffered_genes))
                });
            let (law, buffered_genes) = match outcome {
                Ok(result) => result,
                Err(e) if e.is_not_applicable() && self.options.fallback_to_mass_action => {
                    warn!("{}; falling back to generalized mass action", e);
                    match self.synthesize(
                        model,
                        &index,
                        &reaction,
                        &mods,
                        KineticLawType::GeneralizedMassAction,
                    ) {
                        Ok(law) => {
                            let classifier = ReactionClassifier::new(&index, &self.options);
                            (law, classifier.genes_to_buffer(&reaction))
                        }
                        Err(e) => {
                            record_failure(&mut report, &reaction, &e);
                            rates.push(ReactionRate::Missing);
                            continue;
                        }
                    }
                }
                Err(e) => {
                    record_failure(&mut report, &reaction, &e);
                    rates.push(ReactionRate::Missing);
                    continue;
                }
            };

            info!("reaction {}: {} ({})", reaction.id, law.name, law.law_type);
            store_law(&mut model.reactions[j], &law);
            if self.options.set_boundary_condition_for_genes {
                for gene in buffered_genes {
                    set_boundary(model, &gene, &mut report.buffered_species);
                }
            }
            rates.push(ReactionRate::Formula(law.formula.clone()));
            report.laws.push(law);
        }

        let boundary: HashSet<String> = model
            .species
            .iter()
            .filter(|s| s.boundary_condition)
            .map(|s| s.key().to_string())
            .collect();
        let assembler = OdeAssembler::new(&index)?;
        report.odes = assembler.assemble(&model.reactions, &rates, &boundary);
        report.global_parameters = self.registry.global_parameters().to_vec();
        report.has_full_column_rank = self.rank.cached().map(|r| r.has_full_column_rank);
        info!(
            "{} laws generated, {} kept, {} failed",
            report.laws.len(),
            report.existing.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

fn store_law(reaction: &mut Reaction, law: &GeneratedLaw) {
    reaction.kinetic_law = Some(law.text.clone());
    reaction.reversible = law.reversible;
}

fn record_failure(report: &mut GenerationReport, reaction: &Reaction, e: &KineticError) {
    warn!("{}", e);
    report.failures.push(ReactionFailure {
        reaction_id: reaction.id.clone(),
        message: e.to_string(),
    });
}

fn set_boundary(model: &mut Model, key: &str, buffered: &mut Vec<String>) {
    if let Some(species) = model.species.iter_mut().find(|s| s.key() == key) {
        if !species.boundary_condition {
            warn!("gene {} is now a boundary species", key);
            species.boundary_condition = true;
        }
        if !buffered.iter().any(|b| b == key) {
            buffered.push(key.to_string());
        }
    }
}

/// Parses an existing law for typesetting; a formula that cannot be parsed is kept verbatim.
fn keep_existing_law(reaction: &Reaction, index: &ModelIndex) -> (ExistingLaw, ReactionRate) {
    let formula = reaction.kinetic_law.clone().unwrap_or_default();
    match Formula::parse(&formula, &|s: &str| index.contains(s)) {
        Ok(parsed) => {
            info!(
                "reaction {} keeps its law, species {:?}, parameters {:?}",
                reaction.id,
                parsed.species_symbols(),
                parsed.parameter_symbols()
            );
            let typeset = parsed.to_typeset_with(&|key: &str| index.display_name(key).to_string());
            (
                ExistingLaw {
                    reaction_id: reaction.id.clone(),
                    formula,
                    typeset: Some(typeset),
                },
                ReactionRate::Formula(parsed),
            )
        }
        Err(e) => {
            warn!("reaction {}: {}, the law is kept as written", reaction.id, e);
            (
                ExistingLaw {
                    reaction_id: reaction.id.clone(),
                    formula: formula.clone(),
                    typeset: None,
                },
                ReactionRate::Verbatim(formula),
            )
        }
    }
}
