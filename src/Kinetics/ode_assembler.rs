//! # ODE Assembler
//!
//! ## Purpose
//! Turns the rates of all reactions into one balance equation per species:
//! `d[S]/dt = Σ products − Σ reactants`. Four renderings are produced for every species:
//! - **simple**: rate symbols only, `-v0+v1`
//! - **expanded**: the rate formulas themselves, species ids replaced by display names
//! - **typeset simple** / **typeset expanded**: the LaTeX counterparts, `-v_{0}+v_{1}`
//!
//! Boundary species are pinned to `0`. A species that takes part in no reaction gets `0`.
//! Stoichiometric coefficients other than one multiply the rate (`-2*v0`).
use crate::Kinetics::formula::{Formula, escape_tex};
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{ModelIndex, Reaction};
use log::warn;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rate of one reaction as seen by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionRate {
    /// generated law, or an existing law that could be parsed
    Formula(Formula),
    /// existing law kept as written
    Verbatim(String),
    Missing,
}

/// Balance equation of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesOde {
    pub species: String,
    pub name: String,
    pub expanded: String,
    pub simple: String,
    pub typeset_expanded: String,
    pub typeset_simple: String,
}

/// Rendered rate of one reaction.
struct RateTerms {
    expanded: String,
    typeset: String,
}

#[derive(Default)]
struct Accumulator {
    expanded: String,
    simple: String,
    typeset_expanded: String,
    typeset_simple: String,
}

impl Accumulator {
    fn add(&mut self, sign: char, coefficient: f64, j: usize, terms: &RateTerms) {
        let (text_coef, tex_coef) = if coefficient == 1.0 {
            (String::new(), String::new())
        } else {
            (format!("{}*", coefficient), format!("{} \\cdot ", coefficient))
        };
        self.simple.push_str(&format!("{}{}v{}", sign, text_coef, j));
        self.typeset_simple
            .push_str(&format!("{}{}v_{{{}}}", sign, tex_coef, j));
        self.expanded
            .push_str(&format!("{}{}({})", sign, text_coef, terms.expanded));
        self.typeset_expanded.push_str(&format!(
            "{}{}\\left({}\\right)",
            sign, tex_coef, terms.typeset
        ));
    }
}

/// Drops a leading `+`; an empty right-hand side is `0`.
fn finish(rhs: String) -> String {
    match rhs.strip_prefix('+') {
        Some(rest) => rest.to_string(),
        None if rhs.is_empty() => "0".to_string(),
        None => rhs,
    }
}

pub struct OdeAssembler<'a> {
    index: &'a ModelIndex,
    token: Regex,
}

impl<'a> OdeAssembler<'a> {
    pub fn new(index: &'a ModelIndex) -> Result<Self, KineticError> {
        Ok(Self {
            index,
            token: Regex::new(r"[\p{Alphabetic}_][\p{Alphabetic}\p{N}_]*")?,
        })
    }

    /// Replaces whole species-id tokens by display names. Parameter names containing a
    /// species id (`kM_r1_S`) are single tokens and stay untouched.
    pub fn ids_to_names(&self, text: &str) -> String {
        self.token
            .replace_all(text, |caps: &Captures| {
                let token = &caps[0];
                if self.index.contains(token) {
                    self.index.display_name(token).to_string()
                } else {
                    token.to_string()
                }
            })
            .into_owned()
    }

    fn render(&self, j: usize, rate: &ReactionRate) -> RateTerms {
        match rate {
            ReactionRate::Formula(formula) => RateTerms {
                expanded: self.ids_to_names(&formula.to_text()),
                typeset: formula
                    .to_typeset_with(&|key: &str| self.index.display_name(key).to_string()),
            },
            ReactionRate::Verbatim(text) => RateTerms {
                expanded: self.ids_to_names(text),
                typeset: format!("\\mathrm{{{}}}", escape_tex(text)),
            },
            ReactionRate::Missing => RateTerms {
                expanded: format!("v{}", j),
                typeset: format!("v_{{{}}}", j),
            },
        }
    }

    /// One equation per species in model order. `rates[j]` is the rate of `reactions[j]`.
    pub fn assemble(
        &self,
        reactions: &[Reaction],
        rates: &[ReactionRate],
        boundary: &HashSet<String>,
    ) -> Vec<SpeciesOde> {
        let mut accumulators: Vec<Accumulator> =
            (0..self.index.len()).map(|_| Accumulator::default()).collect();
        for (j, reaction) in reactions.iter().enumerate() {
            let rate = rates.get(j).unwrap_or(&ReactionRate::Missing);
            if *rate == ReactionRate::Missing {
                warn!("reaction {} has no rate, using the symbol v{}", reaction.id, j);
            }
            let terms = self.render(j, rate);
            let sides = [('-', &reaction.reactants), ('+', &reaction.products)];
            for (sign, references) in sides {
                for reference in references.iter() {
                    if boundary.contains(&reference.species) {
                        continue;
                    }
                    if !reference.has_valid_stoichiometry() {
                        warn!(
                            "reaction {}: stoichiometry {} of {} skipped in the ODEs",
                            reaction.id, reference.stoichiometry, reference.species
                        );
                        continue;
                    }
                    match self.index.position(&reference.species) {
                        Some(position) => accumulators[position].add(
                            sign,
                            reference.stoichiometry,
                            j,
                            &terms,
                        ),
                        None => warn!(
                            "reaction {} references unknown species {}, skipped in the ODEs",
                            reaction.id, reference.species
                        ),
                    }
                }
            }
        }

        self.index
            .keys()
            .iter()
            .zip(accumulators)
            .map(|(key, acc)| {
                let name = self.index.display_name(key).to_string();
                if boundary.contains(key) {
                    return SpeciesOde {
                        species: key.clone(),
                        name,
                        expanded: "0".to_string(),
                        simple: "0".to_string(),
                        typeset_expanded: "0".to_string(),
                        typeset_simple: "0".to_string(),
                    };
                }
                SpeciesOde {
                    species: key.clone(),
                    name,
                    expanded: finish(acc.expanded),
                    simple: finish(acc.simple),
                    typeset_expanded: finish(acc.typeset_expanded),
                    typeset_simple: finish(acc.typeset_simple),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::model::{Model, Species, SpeciesRole};

    fn model() -> Model {
        let mut model = Model::new("m");
        model
            .add_species(Species::new("A", "glucose", SpeciesRole::SimpleMolecule))
            .add_species(Species::new("B", "fructose", SpeciesRole::SimpleMolecule))
            .add_species(Species::new("X", "", SpeciesRole::SimpleMolecule))
            .add_reaction(Reaction::new("r0").with_reactant("A", 1.0).with_product("B", 1.0))
            .add_reaction(Reaction::new("r1").with_reactant("B", 1.0).with_product("A", 1.0));
        model
    }

    fn rates() -> Vec<ReactionRate> {
        vec![
            ReactionRate::Formula(Formula::product(vec![
                Formula::param("k_r0_A"),
                Formula::species("A"),
            ])),
            ReactionRate::Formula(Formula::product(vec![
                Formula::param("k_r1_B"),
                Formula::species("B"),
            ])),
        ]
    }

    #[test]
    fn test_simple_odes() {
        let model = model();
        let index = ModelIndex::new(&model);
        let assembler = OdeAssembler::new(&index).unwrap();
        let odes = assembler.assemble(&model.reactions, &rates(), &HashSet::new());
        assert_eq!(odes.len(), 3);
        assert_eq!(odes[0].simple, "-v0+v1");
        assert_eq!(odes[1].simple, "v0-v1");
        assert_eq!(odes[0].typeset_simple, "-v_{0}+v_{1}");
        assert_eq!(odes[1].typeset_simple, "v_{0}-v_{1}");
        // species in no reaction
        assert_eq!(odes[2].simple, "0");
        assert_eq!(odes[2].expanded, "0");
    }

    #[test]
    fn test_expanded_uses_names_on_whole_tokens() {
        let model = model();
        let index = ModelIndex::new(&model);
        let assembler = OdeAssembler::new(&index).unwrap();
        let odes = assembler.assemble(&model.reactions, &rates(), &HashSet::new());
        assert_eq!(odes[0].expanded, "-(k_r0_A*glucose)+(k_r1_B*fructose)");
        assert!(odes[0].typeset_expanded.starts_with("-\\left("));
        assert!(odes[0].typeset_expanded.contains("glucose"));
    }

    #[test]
    fn test_non_ascii_ids_are_replaced() {
        let mut model = Model::new("m");
        model
            .add_species(Species::new("α", "alpha_glucose", SpeciesRole::SimpleMolecule))
            .add_species(Species::new("β2", "beta_glucose", SpeciesRole::SimpleMolecule));
        let index = ModelIndex::new(&model);
        let assembler = OdeAssembler::new(&index).unwrap();
        assert_eq!(
            assembler.ids_to_names("kass_r0*α-kdiss_r0*β2"),
            "kass_r0*alpha_glucose-kdiss_r0*beta_glucose"
        );
    }

    #[test]
    fn test_boundary_species_are_zero() {
        let model = model();
        let index = ModelIndex::new(&model);
        let assembler = OdeAssembler::new(&index).unwrap();
        let boundary: HashSet<String> = ["A".to_string()].into_iter().collect();
        let odes = assembler.assemble(&model.reactions, &rates(), &boundary);
        assert_eq!(odes[0].simple, "0");
        assert_eq!(odes[0].typeset_expanded, "0");
        assert_eq!(odes[1].simple, "v0-v1");
    }

    #[test]
    fn test_coefficients_and_missing_rates() {
        let mut model = Model::new("m");
        model
            .add_species(Species::new("A", "A", SpeciesRole::SimpleMolecule))
            .add_species(Species::new("B", "B", SpeciesRole::SimpleMolecule))
            .add_reaction(Reaction::new("r0").with_reactant("A", 2.0).with_product("B", 1.0));
        let index = ModelIndex::new(&model);
        let assembler = OdeAssembler::new(&index).unwrap();
        let odes = assembler.assemble(&model.reactions, &[], &HashSet::new());
        assert_eq!(odes[0].simple, "-2*v0");
        assert_eq!(odes[0].expanded, "-2*(v0)");
        assert_eq!(odes[1].simple, "v0");
    }
}
