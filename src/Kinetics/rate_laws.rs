//! # Rate Law Catalog
//!
//! ## Purpose
//! Symbolic synthesis of kinetic laws. Every kinetic mechanism is a strategy struct
//! implementing [`RateLawSynthesis`]; the strategies are collected in the closed enum
//! [`Mechanism`] and dispatched through `enum_dispatch`.
//!
//! ## Key Features
//! - `KineticLawType`: the 11 user-facing mechanism selections with stable numeric codes
//! - `ModifierClassification`: modifiers of a reaction split into enzymes, activators, inhibitors,
//!   gene-regulatory activators/inhibitors and non-enzyme catalysts
//! - `LawBuilder`: parameter declaration with per-law and per-run deduplication
//! - shared factors used by several mechanisms (activation, inhibition, enzyme fan-out)
//!
//! ## Mechanisms
//! | module | mechanisms |
//! |---|---|
//! | `mass_action` | generalized mass action, zeroth order forward/reverse |
//! | `convenience` | convenience kinetics (full rank), thermodynamically independent convenience kinetics |
//! | `michaelis_menten` | Michaelis-Menten with mixed-type inhibition |
//! | `bi_substrate` | random order, ordered and ping-pong mechanisms |
//! | `hill` | Hill equation for gene regulation |
//! | `enzyme_kinetics` | irreversible non-modulated and competitive inhibition kinetics |
pub mod bi_substrate;
pub mod convenience;
pub mod enzyme_kinetics;
pub mod hill;
pub mod mass_action;
pub mod michaelis_menten;

use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{ModelIndex, ModifierRole, Reaction, SpeciesReference, SpeciesRole};
use crate::Kinetics::parameters::{ParameterNamer, ParameterRegistry, ParameterScope};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use bi_substrate::{OrderedMechanism, PingPongMechanism, RandomOrderMechanism};
use convenience::{ConvenienceIndependent, ConvenienceKinetics};
use enzyme_kinetics::{IrreversibleCompetitiveInhibition, IrreversibleNonModulated};
use hill::HillEquation;
use mass_action::{GeneralizedMassAction, ZerothOrderForward, ZerothOrderReverse};
use michaelis_menten::MichaelisMenten;

/// Mechanism selection offered to the user and recorded on every generated law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KineticLawType {
    GeneralizedMassAction,
    Convenience,
    MichaelisMenten,
    RandomOrder,
    PingPong,
    Ordered,
    Hill,
    IrreversibleNonModulated,
    ZerothOrderForward,
    ZerothOrderReverse,
    IrreversibleCompetitive,
}

impl KineticLawType {
    pub fn all() -> [KineticLawType; 11] {
        use KineticLawType::*;
        [
            GeneralizedMassAction,
            Convenience,
            MichaelisMenten,
            RandomOrder,
            PingPong,
            Ordered,
            Hill,
            IrreversibleNonModulated,
            ZerothOrderForward,
            ZerothOrderReverse,
            IrreversibleCompetitive,
        ]
    }

    /// stable numeric code, also accepted in settings files
    pub fn code(&self) -> u8 {
        match self {
            KineticLawType::GeneralizedMassAction => 1,
            KineticLawType::Convenience => 2,
            KineticLawType::MichaelisMenten => 3,
            KineticLawType::RandomOrder => 4,
            KineticLawType::PingPong => 5,
            KineticLawType::Ordered => 6,
            KineticLawType::Hill => 7,
            KineticLawType::IrreversibleNonModulated => 8,
            KineticLawType::ZerothOrderForward => 9,
            KineticLawType::ZerothOrderReverse => 10,
            KineticLawType::IrreversibleCompetitive => 11,
        }
    }

    pub fn from_code(code: u8) -> Option<KineticLawType> {
        KineticLawType::all().into_iter().find(|t| t.code() == code)
    }

    pub fn key(&self) -> &'static str {
        match self {
            KineticLawType::GeneralizedMassAction => "mass-action",
            KineticLawType::Convenience => "convenience",
            KineticLawType::MichaelisMenten => "michaelis-menten",
            KineticLawType::RandomOrder => "random-order",
            KineticLawType::PingPong => "ping-pong",
            KineticLawType::Ordered => "ordered",
            KineticLawType::Hill => "hill",
            KineticLawType::IrreversibleNonModulated => "irreversible-non-modulated",
            KineticLawType::ZerothOrderForward => "zeroth-order-forward",
            KineticLawType::ZerothOrderReverse => "zeroth-order-reverse",
            KineticLawType::IrreversibleCompetitive => "irreversible-competitive",
        }
    }

    /// Accepts the key, the numeric code or the label, ignoring case.
    pub fn from_key(key: &str) -> Option<KineticLawType> {
        let key = key.trim();
        if let Ok(code) = key.parse::<u8>() {
            return KineticLawType::from_code(code);
        }
        KineticLawType::all().into_iter().find(|t| {
            t.key().eq_ignore_ascii_case(key) || t.label().eq_ignore_ascii_case(key)
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            KineticLawType::GeneralizedMassAction => "Generalized mass action",
            KineticLawType::Convenience => "Convenience kinetics",
            KineticLawType::MichaelisMenten => "Michaelis-Menten",
            KineticLawType::RandomOrder => "Random order mechanism",
            KineticLawType::PingPong => "Ping-pong mechanism",
            KineticLawType::Ordered => "Ordered mechanism",
            KineticLawType::Hill => "Hill equation",
            KineticLawType::IrreversibleNonModulated => {
                "Irreversible non-modulated non-interacting enzymes"
            }
            KineticLawType::ZerothOrderForward => "Zeroth order forward mass action",
            KineticLawType::ZerothOrderReverse => "Zeroth order reverse mass action",
            KineticLawType::IrreversibleCompetitive => {
                "Irreversible competitive non-cooperative inhibition"
            }
        }
    }
}

impl fmt::Display for KineticLawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Modifiers of one reaction, sorted by their kinetic function.
///
/// Transcriptional and translational regulators are kept apart from the regular
/// activators/inhibitors because the two groups must not be mixed in one reaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierClassification {
    pub enzymes: Vec<String>,
    pub activators: Vec<String>,
    pub inhibitors: Vec<String>,
    pub trans_activators: Vec<String>,
    pub trans_inhibitors: Vec<String>,
    /// non-enzyme catalysts
    pub catalysts: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, species: &str) {
    if !list.iter().any(|s| s == species) {
        list.push(species.to_string());
    }
}

impl ModifierClassification {
    pub fn from_reaction(
        reaction: &Reaction,
        index: &ModelIndex,
        enzyme_roles: &BTreeSet<SpeciesRole>,
    ) -> Self {
        let mut mods = ModifierClassification::default();
        for modifier in &reaction.modifiers {
            let species = modifier.species.as_str();
            match modifier.role {
                ModifierRole::Catalysis => {
                    let role = index.role(species).unwrap_or_default();
                    if role.can_be_enzyme() && enzyme_roles.contains(&role) {
                        push_unique(&mut mods.enzymes, species)
                    } else {
                        push_unique(&mut mods.catalysts, species)
                    }
                }
                ModifierRole::EnzymeCatalysis => push_unique(&mut mods.enzymes, species),
                ModifierRole::NonEnzymeCatalysis => push_unique(&mut mods.catalysts, species),
                ModifierRole::Activation
                | ModifierRole::Trigger
                | ModifierRole::PhysicalStimulation
                | ModifierRole::UnknownCatalysis => push_unique(&mut mods.activators, species),
                ModifierRole::Inhibition => push_unique(&mut mods.inhibitors, species),
                ModifierRole::Modulation => {
                    push_unique(&mut mods.activators, species);
                    push_unique(&mut mods.inhibitors, species);
                }
                ModifierRole::TranscriptionalActivation
                | ModifierRole::TranslationalActivation => {
                    push_unique(&mut mods.trans_activators, species)
                }
                ModifierRole::TranscriptionalInhibition
                | ModifierRole::TranslationalInhibition => {
                    push_unique(&mut mods.trans_inhibitors, species)
                }
            }
        }
        mods
    }

    pub fn has_regular_regulators(&self) -> bool {
        !self.activators.is_empty() || !self.inhibitors.is_empty()
    }

    pub fn has_trans_regulators(&self) -> bool {
        !self.trans_activators.is_empty() || !self.trans_inhibitors.is_empty()
    }

    pub fn is_modulated(&self) -> bool {
        self.has_regular_regulators() || self.has_trans_regulators()
    }

    /// regular and gene-regulatory activators together
    pub fn all_activators(&self) -> Vec<String> {
        let mut all = self.activators.clone();
        for species in &self.trans_activators {
            push_unique(&mut all, species);
        }
        all
    }

    pub fn all_inhibitors(&self) -> Vec<String> {
        let mut all = self.inhibitors.clone();
        for species in &self.trans_inhibitors {
            push_unique(&mut all, species);
        }
        all
    }
}

/// Result of one synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLaw {
    pub reaction_id: String,
    pub law_type: KineticLawType,
    /// display name of the mechanism
    pub name: String,
    pub formula: Formula,
    pub text: String,
    pub typeset: String,
    /// parameters newly introduced by this law, in order of first use
    pub local_parameters: Vec<String>,
    pub global_parameters: Vec<String>,
    /// reversibility of the reaction after synthesis
    pub reversible: bool,
}

/// State threaded through the synthesis of all laws of one run.
pub struct LawContext<'a> {
    pub registry: &'a mut ParameterRegistry,
    pub index: &'a ModelIndex,
    /// declare every parameter in the global scope
    pub store_globally: bool,
}

impl<'a> LawContext<'a> {
    pub fn new(registry: &'a mut ParameterRegistry, index: &'a ModelIndex, store_globally: bool) -> Self {
        Self {
            registry,
            index,
            store_globally,
        }
    }
}

/// Declares the parameters of one law and assembles the [`GeneratedLaw`].
pub struct LawBuilder<'c> {
    registry: &'c mut ParameterRegistry,
    index: &'c ModelIndex,
    store_globally: bool,
    reaction_id: String,
    local: Vec<String>,
    global: Vec<String>,
}

impl<'c> LawBuilder<'c> {
    pub fn new(ctx: &'c mut LawContext<'_>, reaction: &Reaction) -> Self {
        LawBuilder {
            registry: &mut *ctx.registry,
            index: ctx.index,
            store_globally: ctx.store_globally,
            reaction_id: reaction.id.clone(),
            local: Vec::new(),
            global: Vec::new(),
        }
    }

    pub fn reaction_id(&self) -> &str {
        &self.reaction_id
    }

    pub fn index(&self) -> &ModelIndex {
        self.index
    }

    /// local parameter `<kind>_<reaction>[_<enzyme>][_<species>]`
    pub fn local(&mut self, kind: &str, enzyme: Option<&str>, species: Option<&str>) -> Formula {
        let name = ParameterNamer::name(kind, &self.reaction_id, enzyme, species);
        self.declare(name, ParameterScope::Local)
    }

    /// global parameter `<kind>_<species>`, shared by all laws of the run
    pub fn global(&mut self, kind: &str, species: &str) -> Formula {
        let name = ParameterNamer::global_name(kind, species);
        self.declare(name, ParameterScope::Global)
    }

    fn declare(&mut self, name: String, scope: ParameterScope) -> Formula {
        let scope = if self.store_globally {
            ParameterScope::Global
        } else {
            scope
        };
        if self.registry.register(&name, scope) {
            match scope {
                ParameterScope::Local => self.local.push(name.clone()),
                ParameterScope::Global => self.global.push(name.clone()),
            }
        }
        Formula::Parameter(name)
    }

    pub fn finish(
        self,
        law_type: KineticLawType,
        name: impl Into<String>,
        formula: Formula,
        reversible: bool,
    ) -> GeneratedLaw {
        let index = self.index;
        let typeset = formula.to_typeset_with(&|key: &str| index.display_name(key).to_string());
        GeneratedLaw {
            reaction_id: self.reaction_id,
            law_type,
            name: name.into(),
            text: formula.to_text(),
            typeset,
            formula,
            local_parameters: self.local,
            global_parameters: self.global,
            reversible,
        }
    }
}

/// One kinetic mechanism.
#[enum_dispatch]
pub trait RateLawSynthesis {
    fn law_type(&self) -> KineticLawType;
    /// Builds the law of `reaction`. The reaction is not modified; the final
    /// reversibility is reported on the returned law.
    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError>;
}

/// All synthesis strategies. Convenience kinetics has two variants, selected by the
/// column rank of the stoichiometric matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[enum_dispatch(RateLawSynthesis)]
pub enum Mechanism {
    GeneralizedMassAction(GeneralizedMassAction),
    ZerothOrderForward(ZerothOrderForward),
    ZerothOrderReverse(ZerothOrderReverse),
    ConvenienceKinetics(ConvenienceKinetics),
    ConvenienceIndependent(ConvenienceIndependent),
    MichaelisMenten(MichaelisMenten),
    RandomOrderMechanism(RandomOrderMechanism),
    PingPongMechanism(PingPongMechanism),
    OrderedMechanism(OrderedMechanism),
    HillEquation(HillEquation),
    IrreversibleNonModulated(IrreversibleNonModulated),
    IrreversibleCompetitiveInhibition(IrreversibleCompetitiveInhibition),
}

impl Mechanism {
    pub fn for_law_type(law_type: KineticLawType, full_column_rank: bool) -> Mechanism {
        match law_type {
            KineticLawType::GeneralizedMassAction => GeneralizedMassAction.into(),
            KineticLawType::ZerothOrderForward => ZerothOrderForward.into(),
            KineticLawType::ZerothOrderReverse => ZerothOrderReverse.into(),
            KineticLawType::Convenience if full_column_rank => ConvenienceKinetics.into(),
            KineticLawType::Convenience => ConvenienceIndependent.into(),
            KineticLawType::MichaelisMenten => MichaelisMenten.into(),
            KineticLawType::RandomOrder => RandomOrderMechanism.into(),
            KineticLawType::PingPong => PingPongMechanism.into(),
            KineticLawType::Ordered => OrderedMechanism.into(),
            KineticLawType::Hill => HillEquation.into(),
            KineticLawType::IrreversibleNonModulated => IrreversibleNonModulated.into(),
            KineticLawType::IrreversibleCompetitive => IrreversibleCompetitiveInhibition.into(),
        }
    }
}

///////////////////////////////////SHARED FACTORS////////////////////////////////////////////

/// `species^stoichiometry`
pub(crate) fn species_power(reference: &SpeciesReference) -> Formula {
    Formula::pow(Formula::species(&reference.species), reference.stoichiometry)
}

/// One enzyme of the multi-enzyme fan-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EnzymeSlot<'m> {
    /// enzyme the term is multiplied with
    pub species: Option<&'m str>,
    /// enzyme id appended to the parameter names
    pub suffix: Option<&'m str>,
}

impl EnzymeSlot<'_> {
    pub fn factor(&self) -> Formula {
        match self.species {
            Some(enzyme) => Formula::species(enzyme),
            None => Formula::one(),
        }
    }
}

/// One slot per enzyme, or a single enzyme-less slot. Parameter names carry the
/// enzyme id only when there is more than one enzyme.
pub(crate) fn enzyme_slots(enzymes: &[String]) -> Vec<EnzymeSlot<'_>> {
    if enzymes.is_empty() {
        return vec![EnzymeSlot {
            species: None,
            suffix: None,
        }];
    }
    let several = enzymes.len() > 1;
    enzymes
        .iter()
        .map(|e| EnzymeSlot {
            species: Some(e.as_str()),
            suffix: if several { Some(e.as_str()) } else { None },
        })
        .collect()
}

/// `∏ A/(kA+A)` over the activators
pub(crate) fn activation_factor(b: &mut LawBuilder<'_>, activators: &[String]) -> Formula {
    let factors = activators
        .iter()
        .map(|a| {
            let k_a = b.local("kA", None, Some(a));
            Formula::frac(
                Formula::species(a),
                Formula::sum(vec![k_a, Formula::species(a)]),
            )
        })
        .collect();
    Formula::product(factors)
}

/// `∏ kI/(kI+I)` over the inhibitors
pub(crate) fn inhibition_factor(b: &mut LawBuilder<'_>, inhibitors: &[String]) -> Formula {
    let factors = inhibitors
        .iter()
        .map(|i| {
            let k_i = b.local("kI", None, Some(i));
            Formula::frac(
                k_i.clone(),
                Formula::sum(vec![k_i, Formula::species(i)]),
            )
        })
        .collect();
    Formula::product(factors)
}

pub(crate) fn require_integer_stoichiometry(
    reaction: &Reaction,
    mechanism: &str,
) -> Result<(), KineticError> {
    let fractional = reaction
        .reactants
        .iter()
        .chain(reaction.products.iter())
        .find(|r| !r.has_integer_stoichiometry());
    match fractional {
        Some(reference) => Err(KineticError::not_applicable(
            &reaction.id,
            format!(
                "{} requires integer stoichiometry, species {} has {}",
                mechanism, reference.species, reference.stoichiometry
            ),
        )),
        None => Ok(()),
    }
}
