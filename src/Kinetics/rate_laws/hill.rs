//! Hill equation for gene regulation (transcription and translation).
//!
//! `kg · ∏ X^np/(X^np + kSp^np) · ∏ (1 − Y^nm/(Y^nm + kSm^nm))` over the activators `X` and
//! inhibitors `Y`. Enzymes and non-enzyme catalysts act as activators; in transcription and
//! translation steps the template (gene or RNA) is an activator as well. The law is always
//! irreversible.
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{Reaction, ReactionKind, SpeciesRole};
use crate::Kinetics::rate_laws::{
    GeneratedLaw, KineticLawType, LawBuilder, LawContext, ModifierClassification,
    RateLawSynthesis,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HillEquation;

fn add(list: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !list.contains(item) {
            list.push(item.clone());
        }
    }
}

/// `X^n/(X^n + k^n)`
fn saturation(species: &str, k: Formula, n: Formula) -> Formula {
    let x_n = Formula::pow_expr(Formula::species(species), n.clone());
    Formula::frac(
        x_n.clone(),
        Formula::sum(vec![x_n, Formula::pow_expr(k, n)]),
    )
}

impl RateLawSynthesis for HillEquation {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::Hill
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        if mods.has_regular_regulators() && mods.has_trans_regulators() {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "Hill equation: regular activators or inhibitors cannot be combined with transcriptional or translational regulation",
            ));
        }
        let mut activators = mods.trans_activators.clone();
        add(&mut activators, &mods.activators);
        add(&mut activators, &mods.enzymes);
        add(&mut activators, &mods.catalysts);
        if matches!(reaction.kind, ReactionKind::Transcription | ReactionKind::Translation) {
            let templates: Vec<String> = reaction.reactants.iter().map(|r| r.species.clone()).collect();
            add(&mut activators, &templates);
        }
        let mut inhibitors = mods.trans_inhibitors.clone();
        add(&mut inhibitors, &mods.inhibitors);

        let mut b = LawBuilder::new(ctx, reaction);
        let mut factors = Vec::new();
        let mut activation = Vec::new();
        for x in &activators {
            let n = b.local("np", None, Some(x));
            let k = b.local("kSp", None, Some(x));
            activation.push(saturation(x, k, n));
        }
        let mut inhibition = Vec::new();
        for y in &inhibitors {
            let n = b.local("nm", None, Some(y));
            let k = b.local("kSm", None, Some(y));
            inhibition.push(Formula::diff(Formula::one(), saturation(y, k, n)));
        }
        factors.push(b.local("kg", None, None));
        factors.extend(activation);
        factors.extend(inhibition);
        // genes enter through the regulation terms only; other reactants only with
        // a stoichiometry different from one
        for reference in &reaction.reactants {
            let is_gene = b.index().role(&reference.species) == Some(SpeciesRole::Gene);
            if !is_gene && reference.stoichiometry != 1.0 {
                factors.push(Formula::pow(
                    Formula::species(&reference.species),
                    reference.stoichiometry,
                ));
            }
        }
        let name = if reaction.modifiers.is_empty() {
            "mass action rate law for zeroth order irreversible reactions, continuous scheme"
        } else {
            "Hill equation, microscopic form"
        };
        Ok(b.finish(KineticLawType::Hill, name, Formula::product(factors), false))
    }
}
