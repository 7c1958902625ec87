//! Generalized mass action kinetics and its zeroth order variants.
//!
//! Every catalyst (enzyme or non-enzyme catalyst) contributes one term
//! `kass·∏R^n − kdiss·∏P^m` multiplied by the catalyst; the sum of the terms is
//! scaled by the activation and inhibition factors. Gene-regulatory activators and
//! inhibitors are treated like regular ones.
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{Reaction, SpeciesReference};
use crate::Kinetics::rate_laws::{
    GeneratedLaw, KineticLawType, LawBuilder, LawContext, ModifierClassification,
    RateLawSynthesis, activation_factor, inhibition_factor, species_power,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeneralizedMassAction;

/// mass action without dependency on the reactant concentrations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZerothOrderForward;

/// mass action without dependency on the product concentrations, reversible reactions only
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZerothOrderReverse;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Order {
    Full,
    ZerothForward,
    ZerothReverse,
}

impl RateLawSynthesis for GeneralizedMassAction {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::GeneralizedMassAction
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        mass_action_law(ctx, reaction, mods, Order::Full)
    }
}

impl RateLawSynthesis for ZerothOrderForward {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::ZerothOrderForward
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        mass_action_law(ctx, reaction, mods, Order::ZerothForward)
    }
}

impl RateLawSynthesis for ZerothOrderReverse {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::ZerothOrderReverse
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        if !reaction.reversible {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "zeroth order reverse mass action can only be applied to reversible reactions",
            ));
        }
        mass_action_law(ctx, reaction, mods, Order::ZerothReverse)
    }
}

fn mass_action_law(
    ctx: &mut LawContext<'_>,
    reaction: &Reaction,
    mods: &ModifierClassification,
    order: Order,
) -> Result<GeneratedLaw, KineticError> {
    let law_type = match order {
        Order::Full => KineticLawType::GeneralizedMassAction,
        Order::ZerothForward => KineticLawType::ZerothOrderForward,
        Order::ZerothReverse => KineticLawType::ZerothOrderReverse,
    };
    let catalysts: Vec<&str> = mods
        .enzymes
        .iter()
        .chain(mods.catalysts.iter())
        .map(|s| s.as_str())
        .collect();
    // every catalyst gets its own rate constants, even a single one
    let slots: Vec<Option<&str>> = if catalysts.is_empty() {
        vec![None]
    } else {
        catalysts.iter().map(|c| Some(*c)).collect()
    };

    let mut b = LawBuilder::new(ctx, reaction);
    let mut rates = Vec::with_capacity(slots.len());
    for catalyst in slots {
        let mut forward = vec![b.local("kass", catalyst, None)];
        if order != Order::ZerothForward {
            forward.extend(reaction.reactants.iter().map(species_power));
        }
        let mut rate = Formula::product(forward);
        if reaction.reversible {
            let mut reverse = vec![b.local("kdiss", catalyst, None)];
            if order != Order::ZerothReverse {
                reverse.extend(reaction.products.iter().map(species_power));
            }
            rate = Formula::diff(rate, Formula::product(reverse));
        }
        if let Some(catalyst) = catalyst {
            rate = Formula::product(vec![rate, Formula::species(catalyst)]);
        }
        rates.push(rate);
    }
    let activation = activation_factor(&mut b, &mods.all_activators());
    let inhibition = inhibition_factor(&mut b, &mods.all_inhibitors());
    let formula = Formula::product(vec![activation, inhibition, Formula::sum(rates)]);
    let name = mass_action_name(reaction, order);
    Ok(b.finish(law_type, name, formula, reaction.reversible))
}

/// Reaction order of one side and the participant count to mention in the name.
fn side_order(references: &[SpeciesReference], zeroth: bool) -> Option<(&'static str, Option<&'static str>)> {
    if zeroth || references.is_empty() {
        return Some(("zeroth", None));
    }
    let s: Vec<f64> = references.iter().map(|r| r.stoichiometry).collect();
    match s.as_slice() {
        [x] if *x == 1.0 => Some(("first", None)),
        [x] if *x == 2.0 => Some(("second", Some("one"))),
        [x] if *x == 3.0 => Some(("third", Some("one"))),
        [x, y] if *x == 1.0 && *y == 1.0 => Some(("second", Some("two"))),
        [x, y] if (*x == 1.0 && *y == 2.0) || (*x == 2.0 && *y == 1.0) => {
            Some(("third", Some("two")))
        }
        [x, y, z] if *x == 1.0 && *y == 1.0 && *z == 1.0 => Some(("third", Some("three"))),
        _ => None,
    }
}

fn participants(count: &str, noun: &str) -> String {
    if count == "one" {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn mass_action_name(reaction: &Reaction, order: Order) -> String {
    let forward = side_order(&reaction.reactants, order == Order::ZerothForward);
    if !reaction.reversible {
        return match forward {
            Some((word, count)) => format!(
                "mass action rate law for {} order irreversible reactions{}, continuous scheme",
                word,
                count
                    .map(|c| format!(", {}", participants(c, "reactant")))
                    .unwrap_or_default()
            ),
            None => "mass action rate law for irreversible reactions, continuous scheme".to_string(),
        };
    }
    let reverse = side_order(&reaction.products, order == Order::ZerothReverse);
    match (forward, reverse) {
        (Some((fwd, fwd_count)), Some((rev, rev_count))) => {
            let mut involved = String::new();
            if let Some(c) = fwd_count {
                involved.push_str(&participants(c, "reactant"));
                involved.push_str(", ");
            }
            if let Some(c) = rev_count {
                involved.push_str(&participants(c, "product"));
                involved.push_str(", ");
            }
            format!(
                "mass action rate law for {} order forward, {} order reverse, reversible reactions, {}continuous scheme",
                fwd, rev, involved
            )
        }
        _ => "mass action rate law for reversible reactions, continuous scheme".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_by_order() {
        let first = Reaction::new("r").with_reactant("A", 1.0).with_product("B", 1.0);
        assert_eq!(
            mass_action_name(&first, Order::Full),
            "mass action rate law for first order irreversible reactions, continuous scheme"
        );
        let second = Reaction::new("r")
            .with_reactant("A", 1.0)
            .with_reactant("B", 1.0)
            .with_product("C", 1.0);
        assert_eq!(
            mass_action_name(&second, Order::Full),
            "mass action rate law for second order irreversible reactions, two reactants, continuous scheme"
        );
        assert_eq!(
            mass_action_name(&second, Order::ZerothForward),
            "mass action rate law for zeroth order irreversible reactions, continuous scheme"
        );
        let rev = Reaction::new("r")
            .with_reactant("A", 2.0)
            .with_product("B", 1.0)
            .reversible(true);
        assert_eq!(
            mass_action_name(&rev, Order::Full),
            "mass action rate law for second order forward, first order reverse, reversible reactions, one reactant, continuous scheme"
        );
        let odd = Reaction::new("r")
            .with_reactant("A", 4.0)
            .with_product("B", 1.0)
            .reversible(true);
        assert_eq!(
            mass_action_name(&odd, Order::Full),
            "mass action rate law for reversible reactions, continuous scheme"
        );
    }
}
