//! # Convenience Kinetics
//!
//! ## Purpose
//! Generalized Michaelis-Menten form for arbitrary reactant/product counts. Two variants:
//! - **ConvenienceKinetics** (stoichiometric matrix of full column rank): forward and
//!   reverse turnover rates `kcatp`/`kcatn` (`Vp`/`Vn` without enzyme) are independent
//! - **ConvenienceIndependent** (rank deficient): one velocity `kV` per enzyme and global
//!   energy constants `kG_<species>` keep the laws thermodynamically consistent across the model
//!
//! ## Denominator
//! Each species with stoichiometry `n` contributes `1 + S/kM + ... + (S/kM)^n`. The leading `1`
//! is dropped for a single species whose opposite side carries more than one species.
//! A reversible denominator adds the reactant and the product products and subtracts `1` when
//! both sides hold several species.
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{Reaction, SpeciesReference};
use crate::Kinetics::rate_laws::{
    EnzymeSlot, GeneratedLaw, KineticLawType, LawBuilder, LawContext, ModifierClassification,
    RateLawSynthesis, activation_factor, enzyme_slots, inhibition_factor,
    require_integer_stoichiometry,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConvenienceKinetics;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConvenienceIndependent;

/// highest stoichiometry expanded into a saturation sum
const MAX_SATURATION_ORDER: f64 = 64.0;

fn require_bounded_stoichiometry(reaction: &Reaction) -> Result<(), KineticError> {
    match reaction
        .reactants
        .iter()
        .chain(reaction.products.iter())
        .find(|r| r.stoichiometry > MAX_SATURATION_ORDER)
    {
        Some(reference) => Err(KineticError::not_applicable(
            &reaction.id,
            format!(
                "convenience kinetics expands at most {} saturation terms, species {} has stoichiometry {}",
                MAX_SATURATION_ORDER, reference.species, reference.stoichiometry
            ),
        )),
        None => Ok(()),
    }
}

/// `Σ_{j=start..n} x^j`
fn saturation_sum(ratio: &Formula, n: f64, with_one: bool) -> Formula {
    let start = if with_one { 0 } else { 1 };
    let terms = (start..=(n as i64))
        .map(|j| Formula::pow(ratio.clone(), j as f64))
        .collect();
    Formula::sum(terms)
}

fn ratio(species: &str, k_m: Formula) -> Formula {
    Formula::frac(Formula::species(species), k_m)
}

fn michaelis_constant(b: &mut LawBuilder<'_>, slot: &EnzymeSlot<'_>, reference: &SpeciesReference) -> Formula {
    b.local("kM", slot.suffix, Some(&reference.species))
}

impl RateLawSynthesis for ConvenienceKinetics {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::Convenience
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        require_integer_stoichiometry(reaction, "convenience kinetics")?;
        require_bounded_stoichiometry(reaction)?;
        let n_reactants = reaction.reactants.len();
        let n_products = reaction.products.len();
        let mut b = LawBuilder::new(ctx, reaction);
        let has_enzyme = !mods.enzymes.is_empty();
        let mut terms = Vec::new();

        for slot in enzyme_slots(&mods.enzymes) {
            let k_forward = b.local(if has_enzyme { "kcatp" } else { "Vp" }, slot.suffix, None);
            let mut numerator = vec![k_forward];
            let reactant_one = !reaction.reversible || n_reactants != 1 || n_products == 1;
            let mut reactant_terms = Vec::with_capacity(n_reactants);
            for reference in &reaction.reactants {
                let k_m = michaelis_constant(&mut b, &slot, reference);
                let x = ratio(&reference.species, k_m);
                reactant_terms.push(saturation_sum(&x, reference.stoichiometry, reactant_one));
                numerator.push(Formula::pow(x, reference.stoichiometry));
            }
            let mut numerator = Formula::product(numerator);
            let mut denominator = Formula::product(reactant_terms);

            if reaction.reversible {
                let k_reverse = b.local(if has_enzyme { "kcatn" } else { "Vn" }, slot.suffix, None);
                let mut reverse = vec![k_reverse];
                let product_one = n_products > 1;
                let mut product_terms = Vec::with_capacity(n_products);
                for reference in &reaction.products {
                    let k_m = michaelis_constant(&mut b, &slot, reference);
                    let x = ratio(&reference.species, k_m);
                    product_terms.push(saturation_sum(&x, reference.stoichiometry, product_one));
                    reverse.push(Formula::pow(x, reference.stoichiometry));
                }
                numerator = Formula::diff(numerator, Formula::product(reverse));
                denominator = Formula::sum(vec![denominator, Formula::product(product_terms)]);
                if n_products > 1 && n_reactants > 1 {
                    denominator = Formula::diff(denominator, Formula::one());
                }
            }
            terms.push(Formula::product(vec![
                slot.factor(),
                Formula::frac(numerator, denominator),
            ]));
        }

        let activation = activation_factor(&mut b, &mods.all_activators());
        let inhibition = inhibition_factor(&mut b, &mods.all_inhibitors());
        let formula = Formula::product(vec![activation, inhibition, Formula::sum(terms)]);
        let name = if reaction.reversible {
            "reversible simple convenience kinetics"
        } else {
            "irreversible simple convenience kinetics"
        };
        Ok(b.finish(KineticLawType::Convenience, name, formula, reaction.reversible))
    }
}

impl RateLawSynthesis for ConvenienceIndependent {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::Convenience
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        require_integer_stoichiometry(reaction, "convenience kinetics")?;
        require_bounded_stoichiometry(reaction)?;
        let n_reactants = reaction.reactants.len();
        let n_products = reaction.products.len();
        let mut b = LawBuilder::new(ctx, reaction);
        let mut terms = Vec::new();

        for slot in enzyme_slots(&mods.enzymes) {
            let velocity = b.local("kV", slot.suffix, None);
            let forward = Side::build(&mut b, &slot, &reaction.reactants);
            let reverse = Side::build(&mut b, &slot, &reaction.products);

            let forward_one = !(n_reactants == 1 && reaction.reversible && n_products > 1);
            let mut numerator = forward.numerator(&reverse);
            let mut denominator = forward.denominator(forward_one);
            if reaction.reversible {
                // a single product never keeps the leading one
                let reverse_one = n_products != 1;
                numerator = Formula::diff(numerator, reverse.numerator(&forward));
                denominator = Formula::sum(vec![denominator, reverse.denominator(reverse_one)]);
                if n_products > 1 && n_reactants > 1 {
                    denominator = Formula::diff(denominator, Formula::one());
                }
            }
            terms.push(Formula::product(vec![
                slot.factor(),
                velocity,
                Formula::frac(numerator, denominator),
            ]));
        }

        let activation = activation_factor(&mut b, &mods.all_activators());
        let inhibition = inhibition_factor(&mut b, &mods.all_inhibitors());
        let formula = Formula::product(vec![activation, inhibition, Formula::sum(terms)]);
        let name = if reaction.reversible {
            "reversible thermodynamically independent convenience kinetics"
        } else {
            "irreversible thermodynamically independent convenience kinetics"
        };
        Ok(b.finish(KineticLawType::Convenience, name, formula, reaction.reversible))
    }
}

/// Ratios `S/kM` and energy factors `(kG·kM)^n` of one reaction side.
struct Side {
    ratios: Vec<(Formula, f64)>,
    energies: Vec<Formula>,
}

impl Side {
    fn build(b: &mut LawBuilder<'_>, slot: &EnzymeSlot<'_>, references: &[SpeciesReference]) -> Side {
        let mut ratios = Vec::with_capacity(references.len());
        let mut energies = Vec::with_capacity(references.len());
        for reference in references {
            let k_m = michaelis_constant(b, slot, reference);
            let k_g = b.global("kG", &reference.species);
            energies.push(Formula::pow(
                Formula::product(vec![k_g, k_m.clone()]),
                reference.stoichiometry,
            ));
            ratios.push((ratio(&reference.species, k_m), reference.stoichiometry));
        }
        Side { ratios, energies }
    }

    /// `∏(S/kM)^n · sqrt(∏ own energies / ∏ opposite energies)`
    fn numerator(&self, opposite: &Side) -> Formula {
        let mut factors: Vec<Formula> = self
            .ratios
            .iter()
            .map(|(x, n)| Formula::pow(x.clone(), *n))
            .collect();
        factors.push(Formula::sqrt(Formula::frac(
            Formula::product(self.energies.clone()),
            Formula::product(opposite.energies.clone()),
        )));
        Formula::product(factors)
    }

    fn denominator(&self, with_one: bool) -> Formula {
        Formula::product(
            self.ratios
                .iter()
                .map(|(x, n)| saturation_sum(x, *n, with_one))
                .collect(),
        )
    }
}
