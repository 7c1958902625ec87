//! Irreversible enzyme kinetics without cooperativity.
//!
//! - **IrreversibleNonModulated**: non-interacting binding sites,
//!   `E·kcat·∏(S/kM)^n / ∏(1+S/kM)^n`; activators, inhibitors and non-enzyme catalysts are
//!   rejected.
//! - **IrreversibleCompetitiveInhibition**: one substrate and competitive non-cooperative
//!   inhibitors, `E·kcat·S/(kM·∏(1+I/Ki)^m + S)` scaled by the activation factor.
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::Reaction;
use crate::Kinetics::rate_laws::{
    GeneratedLaw, KineticLawType, LawBuilder, LawContext, ModifierClassification,
    RateLawSynthesis, activation_factor, enzyme_slots,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IrreversibleNonModulated;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IrreversibleCompetitiveInhibition;

fn turnover_kind(mods: &ModifierClassification) -> &'static str {
    if mods.enzymes.is_empty() { "V" } else { "kcat" }
}

impl RateLawSynthesis for IrreversibleNonModulated {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::IrreversibleNonModulated
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        if mods.is_modulated() {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to non-modulated reactions.",
            ));
        }
        if !mods.catalysts.is_empty() {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to enzyme-catalyzed reactions.",
            ));
        }
        if reaction.reversible {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to irreversible reactions.",
            ));
        }
        if reaction.reactants.iter().any(|r| !r.has_integer_stoichiometry()) {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied if all reactants have integer stoichiometries.",
            ));
        }

        let mut b = LawBuilder::new(ctx, reaction);
        let mut terms = Vec::new();
        for slot in enzyme_slots(&mods.enzymes) {
            let kcat = b.local(turnover_kind(mods), slot.suffix, None);
            let mut numerator = vec![slot.factor(), kcat];
            let mut denominator = Vec::new();
            for reference in &reaction.reactants {
                let k_m = b.local("kM", slot.suffix, Some(&reference.species));
                let ratio = Formula::frac(Formula::species(&reference.species), k_m);
                denominator.push(Formula::pow(
                    Formula::sum(vec![Formula::one(), ratio.clone()]),
                    reference.stoichiometry,
                ));
                numerator.push(Formula::pow(ratio, reference.stoichiometry));
            }
            terms.push(Formula::frac(
                Formula::product(numerator),
                Formula::product(denominator),
            ));
        }
        let name = match reaction.reactant_order().round() as i64 {
            1 if mods.enzymes.is_empty() => "normalised kinetics of unireactant enzymes",
            1 => "Henri-Michaelis Menten equation",
            2 => "kinetics of irreversible non-modulated non-interacting bireactant enzymes",
            3 => "kinetics of irreversible non-modulated non-interacting trireactant enzymes",
            _ => "kinetics of irreversible non-modulated non-interacting reactant enzymes",
        };
        Ok(b.finish(
            KineticLawType::IrreversibleNonModulated,
            name,
            Formula::sum(terms),
            false,
        ))
    }
}

impl RateLawSynthesis for IrreversibleCompetitiveInhibition {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::IrreversibleCompetitive
    }

    /// Forces the reaction to be irreversible.
    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        if (!mods.trans_activators.is_empty() && !mods.activators.is_empty())
            || (!mods.trans_inhibitors.is_empty() && !mods.inhibitors.is_empty())
        {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "Mixture of translational/transcriptional and regular activation/inhibition is not allowed.",
            ));
        }
        if !mods.catalysts.is_empty() {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to enzyme-catalyzed reactions.",
            ));
        }
        if reaction.reactants.len() != 1 || reaction.reactants[0].stoichiometry != 1.0 {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to reactions with exactly one substrate.",
            ));
        }
        let activators = if mods.trans_activators.is_empty() {
            &mods.activators
        } else {
            &mods.trans_activators
        };
        let inhibitors = if mods.trans_inhibitors.is_empty() {
            &mods.inhibitors
        } else {
            &mods.trans_inhibitors
        };
        let substrate_id = reaction.reactants[0].species.as_str();
        let substrate = Formula::species(substrate_id);

        let mut b = LawBuilder::new(ctx, reaction);
        let mut terms = Vec::new();
        for slot in enzyme_slots(&mods.enzymes) {
            let kcat = b.local(turnover_kind(mods), slot.suffix, None);
            let k_m = b.local("kM", slot.suffix, Some(substrate_id));
            let mut competition = vec![k_m];
            for inhibitor in inhibitors {
                let k_i = b.local("Ki", slot.suffix, Some(inhibitor));
                let m = b.local("m", slot.suffix, Some(inhibitor));
                competition.push(Formula::pow_expr(
                    Formula::sum(vec![
                        Formula::one(),
                        Formula::frac(Formula::species(inhibitor), k_i),
                    ]),
                    m,
                ));
            }
            terms.push(Formula::frac(
                Formula::product(vec![slot.factor(), kcat, substrate.clone()]),
                Formula::sum(vec![Formula::product(competition), substrate.clone()]),
            ));
        }
        let activation = activation_factor(&mut b, activators);
        let name = match inhibitors.len() {
            0 if mods.enzymes.is_empty() => "normalised kinetics of unireactant enzymes",
            0 => "Henri-Michaelis Menten equation",
            1 => "competitive inhibition of irreversible unireactant enzymes by one inhibitor",
            _ => "competitive inhibition of irreversible unireactant enzymes by non-exclusive non-cooperative inhibitors",
        };
        Ok(b.finish(
            KineticLawType::IrreversibleCompetitive,
            name,
            Formula::product(vec![activation, Formula::sum(terms)]),
            false,
        ))
    }
}
