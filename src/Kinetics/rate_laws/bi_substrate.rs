//! # Bi-Substrate Mechanisms
//!
//! ## Purpose
//! Rate laws of enzymes binding two substrates `A` and `B`, following the Cleland forms:
//! - **random order**: rapid-equilibrium random order ternary-complex mechanism
//! - **ordered**: compulsory-order ternary-complex mechanism
//! - **ping-pong**: substituted-enzyme mechanism
//!
//! ## Shapes
//! Two reactants with stoichiometry 1, or one reactant with stoichiometry 2 (then `A = B` and
//! `A·B` becomes `A^2`). Products are `P` (bi-uni) or `P`, `Q` (bi-bi, one product with
//! stoichiometry 2 counts as `P = Q`). Random order and ordered accept both product shapes,
//! ping-pong needs two products.
//!
//! ## Parameters
//! Distinct species use `kM_<r>[_E]_<species>` and `ki_<r>[_E]_<species>`; a doubled species
//! uses positional names `kMr1`, `kMr2`, `kir1`, `kir2` (reactants) and `kMp1`, `kMp2`, `kip1`,
//! `kip2` (products). The turnover numbers are `kcatp`/`kcatn` (`Vp`/`Vn` without enzyme).
use crate::Kinetics::formula::Formula;
use crate::Kinetics::kinetic_error::KineticError;
use crate::Kinetics::model::{Reaction, SpeciesReference};
use crate::Kinetics::rate_laws::{
    EnzymeSlot, GeneratedLaw, KineticLawType, LawBuilder, LawContext, ModifierClassification,
    RateLawSynthesis, activation_factor, enzyme_slots, inhibition_factor,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RandomOrderMechanism;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrderedMechanism;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PingPongMechanism;

/// Two binding partners, identical when one species binds twice.
#[derive(Debug, Clone, PartialEq)]
struct Pair {
    first: String,
    second: String,
}

impl Pair {
    fn from_references(references: &[SpeciesReference]) -> Option<Pair> {
        match references {
            [x, y] if x.stoichiometry == 1.0 && y.stoichiometry == 1.0 => Some(Pair {
                first: x.species.clone(),
                second: y.species.clone(),
            }),
            [x] if x.stoichiometry == 2.0 => Some(Pair {
                first: x.species.clone(),
                second: x.species.clone(),
            }),
            _ => None,
        }
    }

    fn doubled(&self) -> bool {
        self.first == self.second
    }

    fn species(&self, position: usize) -> &str {
        if position == 1 { &self.first } else { &self.second }
    }

    fn first_formula(&self) -> Formula {
        Formula::species(&self.first)
    }

    fn second_formula(&self) -> Formula {
        Formula::species(&self.second)
    }

    /// `A·B`, or `A^2` for a doubled species
    fn joint(&self) -> Formula {
        if self.doubled() {
            Formula::pow(Formula::species(&self.first), 2.0)
        } else {
            Formula::product(vec![self.first_formula(), self.second_formula()])
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Products {
    Single(String),
    Pair(Pair),
}

impl Products {
    fn from_references(references: &[SpeciesReference]) -> Option<Products> {
        match references {
            [x] if x.stoichiometry == 1.0 => Some(Products::Single(x.species.clone())),
            _ => Pair::from_references(references).map(Products::Pair),
        }
    }

    fn count_word(&self) -> &'static str {
        match self {
            Products::Single(_) => "one product",
            Products::Pair(_) => "two products",
        }
    }
}

/// Parameter declarations of one enzyme slot.
struct Constants<'s> {
    suffix: Option<&'s str>,
}

impl Constants<'_> {
    fn constant(
        &self,
        b: &mut LawBuilder<'_>,
        kind: &str,
        side: char,
        pair: &Pair,
        position: usize,
    ) -> Formula {
        if pair.doubled() {
            b.local(&format!("{}{}{}", kind, side, position), self.suffix, None)
        } else {
            b.local(kind, self.suffix, Some(pair.species(position)))
        }
    }

    fn kmr(&self, b: &mut LawBuilder<'_>, pair: &Pair, position: usize) -> Formula {
        self.constant(b, "kM", 'r', pair, position)
    }

    fn kir(&self, b: &mut LawBuilder<'_>, pair: &Pair, position: usize) -> Formula {
        self.constant(b, "ki", 'r', pair, position)
    }

    fn kmp(&self, b: &mut LawBuilder<'_>, products: &Products, position: usize) -> Formula {
        match products {
            Products::Single(p) => b.local("kM", self.suffix, Some(p)),
            Products::Pair(pair) => self.constant(b, "kM", 'p', pair, position),
        }
    }

    fn kip(&self, b: &mut LawBuilder<'_>, products: &Products, position: usize) -> Formula {
        match products {
            Products::Single(p) => b.local("ki", self.suffix, Some(p)),
            Products::Pair(pair) => self.constant(b, "ki", 'p', pair, position),
        }
    }
}

fn mul(factors: Vec<Formula>) -> Formula {
    Formula::product(factors)
}

fn frac(numerator: Formula, denominator: Formula) -> Formula {
    Formula::frac(numerator, denominator)
}

fn turnover(b: &mut LawBuilder<'_>, has_enzyme: bool, forward: bool, slot: &EnzymeSlot<'_>) -> Formula {
    let kind = match (has_enzyme, forward) {
        (true, true) => "kcatp",
        (true, false) => "kcatn",
        (false, true) => "Vp",
        (false, false) => "Vn",
    };
    b.local(kind, slot.suffix, None)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    RandomOrder,
    Ordered,
    PingPong,
}

impl Kind {
    fn law_type(&self) -> KineticLawType {
        match self {
            Kind::RandomOrder => KineticLawType::RandomOrder,
            Kind::Ordered => KineticLawType::Ordered,
            Kind::PingPong => KineticLawType::PingPong,
        }
    }

    fn name(&self, reversible: bool, products: Option<&Products>) -> String {
        let direction = if reversible { "reversible" } else { "irreversible" };
        let count = products.map(|p| p.count_word()).unwrap_or("one product");
        match self {
            Kind::RandomOrder => format!(
                "{} rapid-equilibrium random order ternary-complex mechanism with {}",
                direction, count
            ),
            Kind::Ordered => format!(
                "{} compulsory-order ternary-complex mechanism with {}",
                direction, count
            ),
            Kind::PingPong => format!("{} substituted-enzyme mechanism (ping-pong)", direction),
        }
    }
}

fn synthesize_bi_substrate(
    kind: Kind,
    ctx: &mut LawContext<'_>,
    reaction: &Reaction,
    mods: &ModifierClassification,
) -> Result<GeneratedLaw, KineticError> {
    let substrates = Pair::from_references(&reaction.reactants).ok_or_else(|| {
        KineticError::not_applicable(
            &reaction.id,
            "This rate law can only be applied to reactions with exactly two reactants or one reactant with stoichiometry 2.",
        )
    })?;
    let products = Products::from_references(&reaction.products);
    match (&products, kind) {
        (Some(Products::Single(_)), Kind::PingPong) | (None, Kind::PingPong) => {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "The ping-pong mechanism can only be applied to reactions with exactly two products or one product with stoichiometry 2.",
            ));
        }
        (None, _) if reaction.reversible => {
            return Err(KineticError::not_applicable(
                &reaction.id,
                "This rate law can only be applied to reversible reactions with one or two products.",
            ));
        }
        _ => {}
    }

    let has_enzyme = !mods.enzymes.is_empty();
    let mut b = LawBuilder::new(ctx, reaction);
    let mut terms = Vec::new();
    for slot in enzyme_slots(&mods.enzymes) {
        let k = Constants { suffix: slot.suffix };
        let rate = match (&products, reaction.reversible) {
            (Some(products), true) => reversible_rate(kind, &mut b, &k, &slot, has_enzyme, &substrates, products),
            _ => irreversible_rate(kind, &mut b, &k, &slot, has_enzyme, &substrates),
        };
        terms.push(mul(vec![slot.factor(), rate]));
    }
    let activation = activation_factor(&mut b, &mods.all_activators());
    let inhibition = inhibition_factor(&mut b, &mods.all_inhibitors());
    let formula = mul(vec![activation, inhibition, Formula::sum(terms)]);
    let name = kind.name(reaction.reversible, products.as_ref());
    Ok(b.finish(kind.law_type(), name, formula, reaction.reversible))
}

fn irreversible_rate(
    kind: Kind,
    b: &mut LawBuilder<'_>,
    k: &Constants<'_>,
    slot: &EnzymeSlot<'_>,
    has_enzyme: bool,
    s: &Pair,
) -> Formula {
    let kcat = turnover(b, has_enzyme, true, slot);
    let kmr1 = k.kmr(b, s, 1);
    let kmr2 = k.kmr(b, s, 2);
    let (a, bb, ab) = (s.first_formula(), s.second_formula(), s.joint());
    let mut denominator = Vec::new();
    if kind != Kind::PingPong {
        let kir1 = k.kir(b, s, 1);
        denominator.push(mul(vec![kir1, kmr2.clone()]));
    }
    denominator.push(mul(vec![kmr2, a]));
    denominator.push(mul(vec![kmr1, bb]));
    denominator.push(ab.clone());
    frac(mul(vec![kcat, ab]), Formula::sum(denominator))
}

fn reversible_rate(
    kind: Kind,
    b: &mut LawBuilder<'_>,
    k: &Constants<'_>,
    slot: &EnzymeSlot<'_>,
    has_enzyme: bool,
    s: &Pair,
    products: &Products,
) -> Formula {
    let kcat_p = turnover(b, has_enzyme, true, slot);
    let kcat_n = turnover(b, has_enzyme, false, slot);
    let kir1 = k.kir(b, s, 1);
    let kmr2 = k.kmr(b, s, 2);
    let (a, bb, ab) = (s.first_formula(), s.second_formula(), s.joint());
    // kIr1·kMr2
    let forward_constant = mul(vec![kir1.clone(), kmr2.clone()]);
    let forward = mul(vec![frac(kcat_p, forward_constant.clone()), ab.clone()]);

    match products {
        Products::Single(p_id) => {
            let p = Formula::species(p_id);
            let kmp1 = k.kmp(b, products, 1);
            let numerator = Formula::diff(
                forward,
                mul(vec![frac(kcat_n, kmp1.clone()), p.clone()]),
            );
            let denominator = match kind {
                Kind::Ordered => {
                    let kmr1 = k.kmr(b, s, 1);
                    let kip1 = k.kip(b, products, 1);
                    Formula::sum(vec![
                        Formula::one(),
                        frac(a, kir1.clone()),
                        frac(mul(vec![kmr1.clone(), bb.clone()]), forward_constant.clone()),
                        frac(ab, forward_constant),
                        frac(
                            mul(vec![kmr1, bb, p.clone()]),
                            mul(vec![kir1, kmr2, kip1]),
                        ),
                        frac(p, kmp1),
                    ])
                }
                _ => {
                    let kir2 = k.kir(b, s, 2);
                    Formula::sum(vec![
                        Formula::one(),
                        frac(a, kir1),
                        frac(bb, kir2),
                        frac(ab, forward_constant),
                        frac(p, kmp1),
                    ])
                }
            };
            frac(numerator, denominator)
        }
        Products::Pair(pq_pair) => {
            let (p, q, pq) = (pq_pair.first_formula(), pq_pair.second_formula(), pq_pair.joint());
            let kmp1 = k.kmp(b, products, 1);
            let kip1 = k.kip(b, products, 1);
            let kip2 = k.kip(b, products, 2);
            match kind {
                Kind::RandomOrder => {
                    let kir2 = k.kir(b, s, 2);
                    // kIp2·kMp1
                    let reverse_constant = mul(vec![kip2.clone(), kmp1]);
                    let numerator = Formula::diff(
                        forward,
                        mul(vec![frac(kcat_n, reverse_constant.clone()), pq.clone()]),
                    );
                    let denominator = Formula::sum(vec![
                        Formula::one(),
                        frac(a, kir1),
                        frac(bb, kir2),
                        frac(p, kip1),
                        frac(q, kip2),
                        frac(pq, reverse_constant),
                        frac(ab, forward_constant),
                    ]);
                    frac(numerator, denominator)
                }
                Kind::PingPong => {
                    let kmr1 = k.kmr(b, s, 1);
                    let kmp2 = k.kmp(b, products, 2);
                    // kIp1·kMp2
                    let reverse_constant = mul(vec![kip1.clone(), kmp2]);
                    let numerator = Formula::diff(
                        forward,
                        mul(vec![frac(kcat_n, reverse_constant.clone()), pq.clone()]),
                    );
                    let denominator = Formula::sum(vec![
                        frac(a.clone(), kir1.clone()),
                        frac(mul(vec![kmr1.clone(), bb.clone()]), forward_constant.clone()),
                        frac(p.clone(), kip1.clone()),
                        frac(mul(vec![kmp1, q.clone()]), reverse_constant.clone()),
                        frac(ab, forward_constant),
                        frac(mul(vec![a, p]), mul(vec![kir1.clone(), kip1])),
                        frac(mul(vec![kmr1, bb, q]), mul(vec![kir1, kmr2, kip2])),
                        frac(pq, reverse_constant),
                    ]);
                    frac(numerator, denominator)
                }
                Kind::Ordered => {
                    let kmr1 = k.kmr(b, s, 1);
                    let kir2 = k.kir(b, s, 2);
                    let kmp2 = k.kmp(b, products, 2);
                    // kIp2·kMp1
                    let reverse_constant = mul(vec![kip2.clone(), kmp1.clone()]);
                    let numerator = Formula::diff(
                        forward,
                        mul(vec![frac(kcat_n, reverse_constant.clone()), pq.clone()]),
                    );
                    let denominator = Formula::sum(vec![
                        Formula::one(),
                        frac(a.clone(), kir1.clone()),
                        frac(mul(vec![kmr1.clone(), bb.clone()]), forward_constant.clone()),
                        frac(mul(vec![kmp2.clone(), p.clone()]), reverse_constant.clone()),
                        frac(q.clone(), kip2.clone()),
                        frac(ab.clone(), forward_constant),
                        frac(
                            mul(vec![kmp2, a, p.clone()]),
                            mul(vec![kir1.clone(), kmp1.clone(), kip2.clone()]),
                        ),
                        frac(
                            mul(vec![kmr1, bb.clone(), q]),
                            mul(vec![kir1.clone(), kmr2.clone(), kip2.clone()]),
                        ),
                        frac(pq.clone(), reverse_constant),
                        frac(mul(vec![ab, p]), mul(vec![kir1, kmr2, kip1])),
                        frac(mul(vec![bb, pq]), mul(vec![kir2, kmp1, kip2])),
                    ]);
                    frac(numerator, denominator)
                }
            }
        }
    }
}

impl RateLawSynthesis for RandomOrderMechanism {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::RandomOrder
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        synthesize_bi_substrate(Kind::RandomOrder, ctx, reaction, mods)
    }
}

impl RateLawSynthesis for OrderedMechanism {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::Ordered
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        synthesize_bi_substrate(Kind::Ordered, ctx, reaction, mods)
    }
}

impl RateLawSynthesis for PingPongMechanism {
    fn law_type(&self) -> KineticLawType {
        KineticLawType::PingPong
    }

    fn synthesize(
        &self,
        ctx: &mut LawContext<'_>,
        reaction: &Reaction,
        mods: &ModifierClassification,
    ) -> Result<GeneratedLaw, KineticError> {
        synthesize_bi_substrate(Kind::PingPong, ctx, reaction, mods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_shapes() {
        let two = [SpeciesReference::new("A", 1.0), SpeciesReference::new("B", 1.0)];
        let doubled = [SpeciesReference::new("A", 2.0)];
        let three = [SpeciesReference::new("A", 3.0)];
        let pair = Pair::from_references(&two).unwrap();
        assert!(!pair.doubled());
        assert_eq!(pair.joint().to_text(), "A*B");
        let pair = Pair::from_references(&doubled).unwrap();
        assert!(pair.doubled());
        assert_eq!(pair.joint().to_text(), "A^2");
        assert!(Pair::from_references(&three).is_none());
        assert_eq!(
            Products::from_references(&[SpeciesReference::new("P", 1.0)]),
            Some(Products::Single("P".to_string()))
        );
    }

    #[test]
    fn test_names() {
        let single = Products::Single("P".to_string());
        assert_eq!(
            Kind::RandomOrder.name(true, Some(&single)),
            "reversible rapid-equilibrium random order ternary-complex mechanism with one product"
        );
        assert_eq!(
            Kind::PingPong.name(false, None),
            "irreversible substituted-enzyme mechanism (ping-pong)"
        );
    }
}
