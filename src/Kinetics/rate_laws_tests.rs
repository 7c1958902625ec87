/////////////////////////////////////////////////////////////////////////////////////////////////
// RATE LAW CATALOG TESTS
/////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Kinetics::kinetic_error::KineticError;
    use crate::Kinetics::model::{
        Model, ModelIndex, ModifierRole, Reaction, ReactionKind, Species, SpeciesRole,
    };
    use crate::Kinetics::parameters::ParameterRegistry;
    use crate::Kinetics::rate_laws::bi_substrate::{
        OrderedMechanism, PingPongMechanism, RandomOrderMechanism,
    };
    use crate::Kinetics::rate_laws::convenience::{ConvenienceIndependent, ConvenienceKinetics};
    use crate::Kinetics::rate_laws::enzyme_kinetics::{
        IrreversibleCompetitiveInhibition, IrreversibleNonModulated,
    };
    use crate::Kinetics::rate_laws::hill::HillEquation;
    use crate::Kinetics::rate_laws::mass_action::{GeneralizedMassAction, ZerothOrderReverse};
    use crate::Kinetics::rate_laws::michaelis_menten::MichaelisMenten;
    use crate::Kinetics::rate_laws::{
        GeneratedLaw, LawContext, Mechanism, ModifierClassification, RateLawSynthesis,
    };
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn model() -> Model {
        let mut model = Model::new("catalog");
        model.add_species(Species::new("A", "glucose", SpeciesRole::SimpleMolecule));
        for (id, role) in [
            ("B", SpeciesRole::SimpleMolecule),
            ("C", SpeciesRole::SimpleMolecule),
            ("D", SpeciesRole::SimpleMolecule),
            ("E", SpeciesRole::Protein),
            ("E1", SpeciesRole::Protein),
            ("E2", SpeciesRole::Protein),
            ("X", SpeciesRole::SimpleMolecule),
            ("I", SpeciesRole::SimpleMolecule),
            ("I1", SpeciesRole::SimpleMolecule),
            ("I2", SpeciesRole::SimpleMolecule),
            ("g", SpeciesRole::Gene),
            ("mRNA", SpeciesRole::Rna),
            ("TF", SpeciesRole::Protein),
        ] {
            model.add_species(Species::new(id, id, role));
        }
        model
    }

    fn synthesize_with(
        mechanism: Mechanism,
        reaction: &Reaction,
        registry: &mut ParameterRegistry,
        store_globally: bool,
    ) -> Result<GeneratedLaw, KineticError> {
        let model = model();
        let index = ModelIndex::new(&model);
        let mods = ModifierClassification::from_reaction(
            reaction,
            &index,
            &SpeciesRole::default_enzyme_roles(),
        );
        registry.begin_law();
        let mut ctx = LawContext::new(registry, &index, store_globally);
        mechanism.synthesize(&mut ctx, reaction, &mods)
    }

    fn synthesize(mechanism: Mechanism, reaction: &Reaction) -> Result<GeneratedLaw, KineticError> {
        let mut registry = ParameterRegistry::new();
        synthesize_with(mechanism, reaction, &mut registry, false)
    }

    fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn uni(id: &str) -> Reaction {
        Reaction::new(id).with_reactant("A", 1.0).with_product("B", 1.0)
    }

    /// A + B ⇌ C + D
    fn bi_bi_reversible(id: &str) -> Reaction {
        Reaction::new(id)
            .with_reactant("A", 1.0)
            .with_reactant("B", 1.0)
            .with_product("C", 1.0)
            .with_product("D", 1.0)
            .reversible(true)
            .with_modifier("E", ModifierRole::EnzymeCatalysis)
    }

    fn bi_uni(id: &str) -> Reaction {
        Reaction::new(id)
            .with_reactant("A", 1.0)
            .with_reactant("B", 1.0)
            .with_product("C", 1.0)
    }

    #[test]
    fn test_michaelis_menten_irreversible() {
        let reaction = uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(MichaelisMenten.into(), &reaction).unwrap();
        assert_eq!(law.local_parameters, vec!["kcatp_r1", "kM_r1_A"]);
        assert!(law.global_parameters.is_empty());
        assert_eq!(law.text, "E*kcatp_r1*A/(kM_r1_A+A)");
        assert_eq!(law.name, "Henri-Michaelis Menten equation");
        assert!(law.typeset.contains("glucose"));
        assert!(law.typeset.contains("\\frac"));
        let v = values(&[("E", 1.0), ("kcatp_r1", 2.0), ("A", 3.0), ("kM_r1_A", 1.0)]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 1.5);
    }

    #[test]
    fn test_michaelis_menten_requires_one_reactant() {
        let reaction = Reaction::new("r3")
            .with_reactant("A", 1.0)
            .with_reactant("B", 1.0)
            .with_reactant("C", 1.0)
            .with_product("D", 1.0)
            .with_modifier("E", ModifierRole::EnzymeCatalysis);
        let err = synthesize(MichaelisMenten.into(), &reaction).unwrap_err();
        assert!(err.is_not_applicable());
        assert!(err.to_string().contains("exactly one reactant"));
    }

    #[test]
    fn test_michaelis_menten_reversible() {
        let reaction = uni("r1")
            .with_modifier("E", ModifierRole::EnzymeCatalysis)
            .reversible(true);
        let law = synthesize(MichaelisMenten.into(), &reaction).unwrap();
        assert_eq!(
            law.local_parameters,
            vec!["kcatp_r1", "kM_r1_A", "kcatn_r1", "kM_r1_B"]
        );
        assert!(law.reversible);
        let v = values(&[
            ("E", 1.0),
            ("kcatp_r1", 4.0),
            ("kM_r1_A", 2.0),
            ("kcatn_r1", 1.0),
            ("kM_r1_B", 1.0),
            ("A", 2.0),
            ("B", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 1.0);
    }

    #[test]
    fn test_single_inhibitor_mixed_form() {
        let reaction = uni("r1")
            .with_modifier("E", ModifierRole::EnzymeCatalysis)
            .with_modifier("I", ModifierRole::Inhibition);
        let law = synthesize(MichaelisMenten.into(), &reaction).unwrap();
        assert!(law.local_parameters.contains(&"KIa_r1".to_string()));
        assert!(law.local_parameters.contains(&"KIb_r1".to_string()));
        assert_eq!(
            law.name,
            "simple mixed-type inhibition of irreversible unireactant enzymes"
        );
        let v = values(&[
            ("E", 1.0),
            ("kcatp_r1", 1.0),
            ("kM_r1_A", 1.0),
            ("A", 1.0),
            ("I", 1.0),
            ("KIa_r1", 1.0),
            ("KIb_r1", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.25);
    }

    #[test]
    fn test_enzyme_fan_out() {
        let reaction = uni("r1")
            .with_modifier("E1", ModifierRole::EnzymeCatalysis)
            .with_modifier("E2", ModifierRole::EnzymeCatalysis);
        let law = synthesize(MichaelisMenten.into(), &reaction).unwrap();
        assert_eq!(
            law.local_parameters,
            vec!["kcatp_r1_E1", "kM_r1_E1_A", "kcatp_r1_E2", "kM_r1_E2_A"]
        );
        let v = values(&[
            ("E1", 1.0),
            ("E2", 2.0),
            ("kcatp_r1_E1", 1.0),
            ("kcatp_r1_E2", 1.0),
            ("kM_r1_E1_A", 1.0),
            ("kM_r1_E2_A", 1.0),
            ("A", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 1.5);
    }

    #[test]
    fn test_mass_action_reversible() {
        let reaction = bi_uni("r1").reversible(true);
        let law = synthesize(GeneralizedMassAction.into(), &reaction).unwrap();
        assert_eq!(law.text, "kass_r1*A*B-kdiss_r1*C");
        assert_eq!(law.local_parameters, vec!["kass_r1", "kdiss_r1"]);
        assert!(law.reversible);
    }

    #[test]
    fn test_activation_and_inhibition_factors() {
        let reaction = uni("r1")
            .with_modifier("X", ModifierRole::Activation)
            .with_modifier("I", ModifierRole::Inhibition);
        let law = synthesize(GeneralizedMassAction.into(), &reaction).unwrap();
        assert_eq!(law.local_parameters, vec!["kass_r1", "kA_r1_X", "kI_r1_I"]);
        let v = values(&[
            ("X", 1.0),
            ("kA_r1_X", 1.0),
            ("I", 1.0),
            ("kI_r1_I", 1.0),
            ("kass_r1", 2.0),
            ("A", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.5);
    }

    #[test]
    fn test_zeroth_order_reverse_requires_reversible_reaction() {
        let err = synthesize(ZerothOrderReverse.into(), &uni("r1")).unwrap_err();
        assert!(err.is_not_applicable());
        let law = synthesize(ZerothOrderReverse.into(), &uni("r1").reversible(true)).unwrap();
        assert_eq!(law.text, "kass_r1*A-kdiss_r1");
    }

    #[test]
    fn test_convenience_full_rank() {
        let reaction = bi_uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(ConvenienceKinetics.into(), &reaction).unwrap();
        assert_eq!(law.name, "irreversible simple convenience kinetics");
        assert_eq!(law.local_parameters, vec!["kcatp_r1", "kM_r1_A", "kM_r1_B"]);
        let v = values(&[
            ("E", 1.0),
            ("kcatp_r1", 1.0),
            ("kM_r1_A", 1.0),
            ("kM_r1_B", 1.0),
            ("A", 1.0),
            ("B", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.25);
    }

    #[test]
    fn test_independent_convenience_shares_energy_constants() {
        let mut registry = ParameterRegistry::new();
        let r1 = uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let r2 = Reaction::new("r2")
            .with_reactant("B", 1.0)
            .with_product("C", 1.0)
            .with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law1 = synthesize_with(ConvenienceIndependent.into(), &r1, &mut registry, false).unwrap();
        let law2 = synthesize_with(ConvenienceIndependent.into(), &r2, &mut registry, false).unwrap();
        assert_eq!(law1.global_parameters, vec!["kG_A", "kG_B"]);
        assert_eq!(law2.global_parameters, vec!["kG_C"]);
        assert!(law2.text.contains("kG_B"));
        assert!(law1.local_parameters.contains(&"kV_r1".to_string()));
        assert_eq!(registry.global_parameters(), &["kG_A", "kG_B", "kG_C"]);
    }

    #[test]
    fn test_store_parameters_globally() {
        let reaction = uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let mut registry = ParameterRegistry::new();
        let law = synthesize_with(MichaelisMenten.into(), &reaction, &mut registry, true).unwrap();
        assert!(law.local_parameters.is_empty());
        assert_eq!(law.global_parameters, vec!["kcatp_r1", "kM_r1_A"]);
    }

    #[test]
    fn test_random_order_irreversible() {
        let reaction = bi_uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(RandomOrderMechanism.into(), &reaction).unwrap();
        assert_eq!(
            law.name,
            "irreversible rapid-equilibrium random order ternary-complex mechanism with one product"
        );
        assert_eq!(
            law.local_parameters,
            vec!["kcatp_r1", "kM_r1_A", "kM_r1_B", "ki_r1_A"]
        );
        let v = values(&[
            ("E", 1.0),
            ("kcatp_r1", 1.0),
            ("kM_r1_A", 1.0),
            ("kM_r1_B", 1.0),
            ("ki_r1_A", 1.0),
            ("A", 1.0),
            ("B", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.25);
    }

    #[test]
    fn test_ordered_irreversible() {
        let reaction = bi_uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(OrderedMechanism.into(), &reaction).unwrap();
        assert_eq!(
            law.name,
            "irreversible compulsory-order ternary-complex mechanism with one product"
        );
        assert_eq!(
            law.local_parameters,
            vec!["kcatp_r1", "kM_r1_A", "kM_r1_B", "ki_r1_A"]
        );
        // 2*6 / (0.5*2 + 2*2 + 1*3 + 6)
        let v = values(&[
            ("E", 1.0),
            ("kcatp_r1", 2.0),
            ("kM_r1_A", 1.0),
            ("kM_r1_B", 2.0),
            ("ki_r1_A", 0.5),
            ("A", 2.0),
            ("B", 3.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 6.0 / 7.0);
    }

    fn bi_bi_values(extra: &[(&str, f64)]) -> HashMap<String, f64> {
        let mut v = values(&[
            ("E", 1.0),
            ("A", 2.0),
            ("B", 1.0),
            ("C", 1.0),
            ("D", 1.0),
            ("kcatp_r1", 1.0),
            ("kcatn_r1", 1.0),
        ]);
        for (name, value) in extra {
            v.insert(name.to_string(), *value);
        }
        v
    }

    #[test]
    fn test_ordered_reversible_two_products() {
        let law = synthesize(OrderedMechanism.into(), &bi_bi_reversible("r1")).unwrap();
        assert!(law.reversible);
        assert_eq!(
            law.name,
            "reversible compulsory-order ternary-complex mechanism with two products"
        );
        let expected = vec![
            "kcatp_r1", "kcatn_r1", "ki_r1_A", "kM_r1_B", "kM_r1_C", "ki_r1_C", "ki_r1_D",
            "kM_r1_A", "ki_r1_B", "kM_r1_D",
        ];
        assert_eq!(law.local_parameters, expected);
        let constants: Vec<(&str, f64)> = expected[2..].iter().map(|p| (*p, 1.0)).collect();
        // (2 - 1) / (1 + 2 + 1 + 1 + 1 + 2 + 2 + 1 + 1 + 2 + 1)
        assert_relative_eq!(
            law.formula.evaluate(&bi_bi_values(&constants)).unwrap(),
            1.0 / 15.0
        );
    }

    #[test]
    fn test_random_order_reversible_two_products() {
        let law = synthesize(RandomOrderMechanism.into(), &bi_bi_reversible("r1")).unwrap();
        assert_eq!(
            law.name,
            "reversible rapid-equilibrium random order ternary-complex mechanism with two products"
        );
        let expected = vec![
            "kcatp_r1", "kcatn_r1", "ki_r1_A", "kM_r1_B", "kM_r1_C", "ki_r1_C", "ki_r1_D",
            "ki_r1_B",
        ];
        assert_eq!(law.local_parameters, expected);
        let constants: Vec<(&str, f64)> = expected[2..].iter().map(|p| (*p, 1.0)).collect();
        // (2 - 1) / (1 + 2 + 1 + 1 + 1 + 1 + 2)
        assert_relative_eq!(
            law.formula.evaluate(&bi_bi_values(&constants)).unwrap(),
            1.0 / 9.0
        );
    }

    #[test]
    fn test_ping_pong_reversible() {
        let law = synthesize(PingPongMechanism.into(), &bi_bi_reversible("r1")).unwrap();
        assert_eq!(law.name, "reversible substituted-enzyme mechanism (ping-pong)");
        let expected = vec![
            "kcatp_r1", "kcatn_r1", "ki_r1_A", "kM_r1_B", "kM_r1_C", "ki_r1_C", "ki_r1_D",
            "kM_r1_A", "kM_r1_D",
        ];
        assert_eq!(law.local_parameters, expected);
        let constants: Vec<(&str, f64)> = expected[2..].iter().map(|p| (*p, 1.0)).collect();
        // (2 - 1) / (2 + 1 + 1 + 1 + 2 + 2 + 1 + 1), no leading one
        assert_relative_eq!(
            law.formula.evaluate(&bi_bi_values(&constants)).unwrap(),
            1.0 / 11.0
        );
    }

    #[test]
    fn test_doubled_species_use_positional_constants() {
        // 2A -> C
        let irreversible = Reaction::new("r1")
            .with_reactant("A", 2.0)
            .with_product("C", 1.0)
            .with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(OrderedMechanism.into(), &irreversible).unwrap();
        assert_eq!(
            law.local_parameters,
            vec!["kcatp_r1", "kMr1_r1", "kMr2_r1", "kir1_r1"]
        );
        let v = values(&[
            ("E", 1.0),
            ("A", 2.0),
            ("kcatp_r1", 1.0),
            ("kMr1_r1", 1.0),
            ("kMr2_r1", 1.0),
            ("kir1_r1", 1.0),
        ]);
        // 4 / (1 + 2 + 2 + 4)
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 4.0 / 9.0);

        // 2A <-> 2C
        let reversible = Reaction::new("r1")
            .with_reactant("A", 2.0)
            .with_product("C", 2.0)
            .reversible(true)
            .with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(RandomOrderMechanism.into(), &reversible).unwrap();
        assert!(law.name.ends_with("with two products"));
        assert_eq!(
            law.local_parameters,
            vec![
                "kcatp_r1", "kcatn_r1", "kir1_r1", "kMr2_r1", "kMp1_r1", "kip1_r1", "kip2_r1",
                "kir2_r1",
            ]
        );
        assert!(law.text.contains("A^2"));
        assert!(law.text.contains("C^2"));
        let v = values(&[
            ("E", 1.0),
            ("A", 2.0),
            ("C", 1.0),
            ("kcatp_r1", 1.0),
            ("kcatn_r1", 1.0),
            ("kir1_r1", 1.0),
            ("kMr2_r1", 1.0),
            ("kMp1_r1", 1.0),
            ("kip1_r1", 1.0),
            ("kip2_r1", 1.0),
            ("kir2_r1", 2.0),
        ]);
        // (4 - 1) / (1 + 2 + 1 + 1 + 1 + 1 + 4)
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 3.0 / 11.0);
    }

    #[test]
    fn test_ping_pong_needs_two_products() {
        let reaction = bi_uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        assert!(synthesize(PingPongMechanism.into(), &reaction).is_err());
    }

    #[test]
    fn test_hill_gene_regulation() {
        let reaction = Reaction::new("t1")
            .with_reactant("g", 1.0)
            .with_product("mRNA", 1.0)
            .with_kind(ReactionKind::Transcription)
            .with_modifier("TF", ModifierRole::TranscriptionalActivation);
        let law = synthesize(HillEquation.into(), &reaction).unwrap();
        assert_eq!(law.name, "Hill equation, microscopic form");
        assert!(!law.reversible);
        assert_eq!(
            law.local_parameters,
            vec!["np_t1_TF", "kSp_t1_TF", "np_t1_g", "kSp_t1_g", "kg_t1"]
        );
        let v = values(&[
            ("kg_t1", 2.0),
            ("TF", 1.0),
            ("np_t1_TF", 1.0),
            ("kSp_t1_TF", 1.0),
            ("g", 1.0),
            ("np_t1_g", 1.0),
            ("kSp_t1_g", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.5);
    }

    #[test]
    fn test_hill_rejects_mixed_regulation() {
        let reaction = Reaction::new("t1")
            .with_reactant("g", 1.0)
            .with_product("mRNA", 1.0)
            .with_kind(ReactionKind::Transcription)
            .with_modifier("TF", ModifierRole::TranscriptionalActivation)
            .with_modifier("X", ModifierRole::Activation);
        assert!(synthesize(HillEquation.into(), &reaction).is_err());
    }

    #[test]
    fn test_irreversible_non_modulated() {
        let reaction = bi_uni("r1").with_modifier("E", ModifierRole::EnzymeCatalysis);
        let law = synthesize(IrreversibleNonModulated.into(), &reaction).unwrap();
        assert_eq!(
            law.name,
            "kinetics of irreversible non-modulated non-interacting bireactant enzymes"
        );
        assert_eq!(law.local_parameters, vec!["kcat_r1", "kM_r1_A", "kM_r1_B"]);
        let v = values(&[
            ("E", 1.0),
            ("kcat_r1", 1.0),
            ("kM_r1_A", 1.0),
            ("kM_r1_B", 1.0),
            ("A", 1.0),
            ("B", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.25);

        let reversible = reaction.clone().reversible(true);
        assert!(synthesize(IrreversibleNonModulated.into(), &reversible).is_err());
        let modulated = reaction.with_modifier("X", ModifierRole::Activation);
        let err = synthesize(IrreversibleNonModulated.into(), &modulated).unwrap_err();
        assert!(err.to_string().contains("non-modulated"));
    }

    #[test]
    fn test_competitive_inhibition() {
        let reaction = uni("r1")
            .with_modifier("E", ModifierRole::EnzymeCatalysis)
            .with_modifier("I1", ModifierRole::Inhibition)
            .with_modifier("I2", ModifierRole::Inhibition)
            .reversible(true);
        let law = synthesize(IrreversibleCompetitiveInhibition.into(), &reaction).unwrap();
        assert!(!law.reversible);
        assert_eq!(
            law.name,
            "competitive inhibition of irreversible unireactant enzymes by non-exclusive non-cooperative inhibitors"
        );
        assert!(law.local_parameters.contains(&"Ki_r1_I1".to_string()));
        assert!(law.local_parameters.contains(&"m_r1_I2".to_string()));
        let v = values(&[
            ("E", 1.0),
            ("kcat_r1", 1.0),
            ("kM_r1_A", 1.0),
            ("A", 1.0),
            ("I1", 1.0),
            ("Ki_r1_I1", 1.0),
            ("m_r1_I1", 1.0),
            ("I2", 1.0),
            ("Ki_r1_I2", 1.0),
            ("m_r1_I2", 1.0),
        ]);
        assert_relative_eq!(law.formula.evaluate(&v).unwrap(), 0.2);
    }

    #[test]
    fn test_fractional_stoichiometry_rejected() {
        let reaction = Reaction::new("r1")
            .with_reactant("A", 0.5)
            .with_product("B", 1.0)
            .with_modifier("E", ModifierRole::EnzymeCatalysis);
        assert!(synthesize(ConvenienceKinetics.into(), &reaction).is_err());
        // mass action accepts any stoichiometry
        let law = synthesize(GeneralizedMassAction.into(), &reaction).unwrap();
        assert_eq!(law.text, "kass_r1_E*A^0.5*E");
    }
}
