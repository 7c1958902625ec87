//! Michaelis-Menten kinetics of unireactant enzymes.
//!
//! Irreversible: `kcat·S/(kM+S)`; reversible: `(kcatp/kMr·S − kcatn/kMp·P)/(1+S/kMr+P/kMp)`.
//! A single inhibitor gives the mixed-type form with the competitive constant `KIa` and the
//! uncompetitive constant `KIb`. Several inhibitors of an irreversible reaction are summed into
//! the same two factors, several inhibitors of a reversible reaction use the generic
//! inhibition factor.
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::Reaction;
use crate::Kinetics::rate_laws::{
    GeneratedLaw, KineticLawType, LawBuilder, LawContext, ModifierClassification,
    RateLawSynthesis, activation_factor, enzyme_slots, inhibition_factor,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MichaelisMenten;

pub(crate) fn check_unireactant(reaction: &Reaction) -> Result<(), KineticError> {
    if reaction.reactants.len() != 1 || reaction.reactants[0].stoichiometry != 1.0 {
        return Err(KineticError::not_applicable(
            &reaction.id,
            "This rate law can only be applied to reactions with exactly one reactant.",
        ));
    }
    Ok(())
}

/// `1 + Σ I/k` with one constant of the given kind per inhibitor
fn inhibitor_sum(
    b: &mut LawBuilder<'_>,
    kind: &str,
    enzyme: Option<&str>,
    inhibitors: &[String],
) -> Formula {
    let mut terms = vec![Formula::one()];
    for inhibitor in inhibitors {
        let k = b.local(kind, enzyme, Some(inhibitor));
        terms.push(Formula::frac(Formula::species(inhibitor), k));
    }
    Formula::sum(terms)
}

impl RateLawSynthesis for MichaelisMenten {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::MichaelisMenten
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        check_unireactant(reaction)?;
        if reaction.reversible
            && (reaction.products.len() != 1 || reaction.products[0].stoichiometry != 1.0)
        {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to reversible reactions with exactly one product.",
            ));
        }
        let substrate_id = reaction.reactants[0].species.as_str();
        let substrate = Formula::species(substrate_id);
        let activators = mods.all_activators();
        let inhibitors = mods.all_inhibitors();
        let has_enzyme = !mods.enzymes.is_empty();

        let mut b = LawBuilder::new(ctx, reaction);
        let mut terms = Vec::new();
        for slot in enzyme_slots(&mods.enzymes) {
            let kcat_p = b.local(if has_enzyme { "kcatp" } else { "Vp" }, slot.suffix, None);
            let k_mr = b.local("kM", slot.suffix, Some(substrate_id));

            let (numerator, denominator) = if !reaction.reversible {
                let numerator = Formula::product(vec![kcat_p, substrate.clone()]);
                let denominator = match inhibitors.len() {
                    0 => Formula::sum(vec![k_mr, substrate.clone()]),
                    1 => {
                        let inhibitor = Formula::species(&inhibitors[0]);
                        let k_ia = b.local("KIa", slot.suffix, None);
                        let k_ib = b.local("KIb", slot.suffix, None);
                        Formula::sum(vec![
                            Formula::product(vec![
                                k_mr,
                                Formula::sum(vec![
                                    Formula::one(),
                                    Formula::frac(inhibitor.clone(), k_ia),
                                ]),
                            ]),
                            Formula::product(vec![
                                substrate.clone(),
                                Formula::sum(vec![Formula::one(), Formula::frac(inhibitor, k_ib)]),
                            ]),
                        ])
                    }
                    _ => {
                        let sum_a = inhibitor_sum(&mut b, "kIa", slot.suffix, &inhibitors);
                        let sum_b = inhibitor_sum(&mut b, "kIb", slot.suffix, &inhibitors);
                        Formula::sum(vec![
                            Formula::product(vec![k_mr, sum_a]),
                            Formula::product(vec![substrate.clone(), sum_b]),
                        ])
                    }
                };
                (numerator, denominator)
            } else {
                let product_id = reaction.products[0].species.as_str();
                let product = Formula::species(product_id);
                let kcat_n = b.local(if has_enzyme { "kcatn" } else { "Vn" }, slot.suffix, None);
                let k_mp = b.local("kM", slot.suffix, Some(product_id));
                let numerator = Formula::diff(
                    Formula::product(vec![Formula::frac(kcat_p, k_mr.clone()), substrate.clone()]),
                    Formula::product(vec![Formula::frac(kcat_n, k_mp.clone()), product.clone()]),
                );
                let saturation = Formula::sum(vec![
                    Formula::frac(substrate.clone(), k_mr),
                    Formula::frac(product, k_mp),
                ]);
                let denominator = if inhibitors.len() == 1 {
                    let inhibitor = Formula::species(&inhibitors[0]);
                    let k_ia = b.local("KIa", slot.suffix, None);
                    let k_ib = b.local("KIb", slot.suffix, None);
                    Formula::sum(vec![
                        Formula::one(),
                        Formula::product(vec![
                            saturation,
                            Formula::sum(vec![
                                Formula::one(),
                                Formula::frac(inhibitor.clone(), k_ib),
                            ]),
                        ]),
                        Formula::frac(inhibitor, k_ia),
                    ])
                } else {
                    Formula::sum(vec![Formula::one(), saturation])
                };
                (numerator, denominator)
            };
            terms.push(Formula::product(vec![
                slot.factor(),
                Formula::frac(numerator, denominator),
            ]));
        }

        let inhibition = if reaction.reversible && inhibitors.len() > 1 {
            inhibition_factor(&mut b, &inhibitors)
        } else {
            Formula::one()
        };
        let activation = activation_factor(&mut b, &activators);
        let formula = Formula::product(vec![activation, inhibition, Formula::sum(terms)]);
        let name = michaelis_menten_name(
            reaction.reversible,
            mods.enzymes.len(),
            activators.len(),
            inhibitors.len(),
        );
        Ok(b.finish(KineticLawType::MichaelisMenten, name, formula, reaction.reversible))
    }
}

fn michaelis_menten_name(reversible: bool, enzymes: usize, activators: usize, inhibitors: usize) -> &'static str {
    if activators == 0 && inhibitors == 0 {
        match (enzymes, reversible) {
            (0, false) => return "normalised kinetics of unireactant enzymes",
            (0, true) | (1, true) => return "kinetics of non-modulated unireactant enzymes",
            (1, false) => return "Henri-Michaelis Menten equation",
            _ => {}
        }
    }
    if !reversible {
        return match inhibitors {
            0 => "kinetics of unireactant enzymes",
            1 => "simple mixed-type inhibition of irreversible unireactant enzymes",
            2 => "mixed-type inhibition of irreversible unireactant enzymes by two inhibitors",
            _ => "mixed-type inhibition of irreversible enzymes by mutually exclusive inhibitors",
        };
    }
    "kinetics of unireactant enzymes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(
            michaelis_menten_name(false, 1, 0, 0),
            "Henri-Michaelis Menten equation"
        );
        assert_eq!(
            michaelis_menten_name(false, 0, 0, 0),
            "normalised kinetics of unireactant enzymes"
        );
        assert_eq!(
            michaelis_menten_name(true, 1, 0, 0),
            "kinetics of non-modulated unireactant enzymes"
        );
        assert_eq!(
            michaelis_menten_name(false, 1, 0, 2),
            "mixed-type inhibition of irreversible unireactant enzymes by two inhibitors"
        );
        assert_eq!(michaelis_menten_name(true, 2, 1, 0), "kinetics of unireactant enzymes");
    }
}
