use crate::Kinetics::law_generator::KineticLawGenerator;
use crate::Kinetics::model::{
    Model, ModelIndex, ModifierRole, Reaction, ReactionKind, Species, SpeciesRole,
};
use crate::Kinetics::rate_laws::KineticLawType;
use crate::Kinetics::stoichiometry_analyzer::{StoichiometricMatrix, StoichiometricRankAnalyzer};
use crate::settings::{BiUniMechanism, KineticsOptions, UniUniMechanism};

fn species(model: &mut Model, list: &[(&str, &str, SpeciesRole)]) {
    for (id, name, role) in list {
        model.add_species(Species::new(id, name, *role));
    }
}

/// Upper glycolysis fragment: bi-bi hexokinase step and the reversible isomerase.
pub fn glycolysis_model() -> Model {
    let mut model = Model::new("glycolysis_fragment");
    species(
        &mut model,
        &[
            ("glc", "glucose", SpeciesRole::SimpleMolecule),
            ("g6p", "glucose-6-phosphate", SpeciesRole::SimpleMolecule),
            ("f6p", "fructose-6-phosphate", SpeciesRole::SimpleMolecule),
            ("atp", "ATP", SpeciesRole::SimpleMolecule),
            ("adp", "ADP", SpeciesRole::SimpleMolecule),
            ("hk", "hexokinase", SpeciesRole::Protein),
            ("pgi", "phosphoglucose isomerase", SpeciesRole::Protein),
        ],
    );
    model
        .add_reaction(
            Reaction::new("HK")
                .with_reactant("glc", 1.0)
                .with_reactant("atp", 1.0)
                .with_product("g6p", 1.0)
                .with_product("adp", 1.0)
                .with_modifier("hk", ModifierRole::EnzymeCatalysis),
        )
        .add_reaction(
            Reaction::new("PGI")
                .with_reactant("g6p", 1.0)
                .with_product("f6p", 1.0)
                .with_modifier("pgi", ModifierRole::EnzymeCatalysis)
                .reversible(true),
        );
    model
}

/// Gene g transcribed under control of the transcription factor, the mRNA translated to a protein.
pub fn gene_expression_model() -> Model {
    let mut model = Model::new("gene_expression");
    species(
        &mut model,
        &[
            ("g", "gene", SpeciesRole::Gene),
            ("m", "mRNA", SpeciesRole::Rna),
            ("p", "protein", SpeciesRole::Protein),
            ("tf", "transcription factor", SpeciesRole::Protein),
            ("sink", "degraded", SpeciesRole::Degraded),
        ],
    );
    model
        .add_reaction(
            Reaction::new("transcription")
                .with_reactant("g", 1.0)
                .with_product("m", 1.0)
                .with_kind(ReactionKind::Transcription)
                .with_modifier("tf", ModifierRole::TranscriptionalActivation),
        )
        .add_reaction(
            Reaction::new("translation")
                .with_reactant("m", 1.0)
                .with_product("p", 1.0)
                .with_kind(ReactionKind::Translation),
        )
        .add_reaction(
            Reaction::new("degradation")
                .with_reactant("p", 1.0)
                .with_product("sink", 1.0),
        );
    model
}

pub fn law_examples(task: usize) {
    match task {
        0 => {
            // MASS ACTION FOR A NETWORK WITHOUT ENZYMES
            let mut model = Model::new("mass_action");
            species(
                &mut model,
                &[
                    ("A", "A", SpeciesRole::SimpleMolecule),
                    ("B", "B", SpeciesRole::SimpleMolecule),
                    ("C", "C", SpeciesRole::SimpleMolecule),
                ],
            );
            model
                .add_reaction(
                    Reaction::new("r0")
                        .with_reactant("A", 2.0)
                        .with_product("B", 1.0)
                        .reversible(true),
                )
                .add_reaction(
                    Reaction::new("r1")
                        .with_reactant("A", 1.0)
                        .with_reactant("B", 1.0)
                        .with_product("C", 1.0),
                );
            let mut generator = KineticLawGenerator::new(KineticsOptions::default());
            match generator.generate(&mut model) {
                Ok(report) => {
                    report.pretty_print_laws();
                    report.pretty_print_odes();
                }
                Err(e) => println!("generation failed: {}", e),
            }
        }
        1 => {
            // ENZYME KINETICS: MICHAELIS-MENTEN AND RANDOM ORDER
            let mut model = glycolysis_model();
            let options = KineticsOptions {
                uni_uni_mechanism: UniUniMechanism::MichaelisMenten,
                bi_uni_mechanism: BiUniMechanism::RandomOrder,
                ..KineticsOptions::default()
            };
            let mut generator = KineticLawGenerator::new(options);
            match generator.generate(&mut model) {
                Ok(report) => {
                    report.pretty_print_laws();
                    report.pretty_print_odes();
                    for law in &report.laws {
                        println!("{}: {}", law.reaction_id, law.typeset);
                    }
                }
                Err(e) => println!("generation failed: {}", e),
            }
        }
        2 => {
            // GENE REGULATION: HILL EQUATION AND BOUNDARY GENES
            let mut model = gene_expression_model();
            let mut generator = KineticLawGenerator::new(KineticsOptions::default());
            match generator.generate(&mut model) {
                Ok(report) => {
                    report.pretty_print_laws();
                    report.pretty_print_odes();
                    println!("boundary species: {:?}", report.buffered_species);
                }
                Err(e) => println!("generation failed: {}", e),
            }
        }
        3 => {
            // STOICHIOMETRIC RANK AND CONVENIENCE KINETICS
            let mut model = Model::new("cycle");
            species(
                &mut model,
                &[
                    ("A", "A", SpeciesRole::SimpleMolecule),
                    ("B", "B", SpeciesRole::SimpleMolecule),
                    ("C", "C", SpeciesRole::SimpleMolecule),
                    ("E", "enzyme", SpeciesRole::Protein),
                ],
            );
            for (id, from, to) in [("r1", "A", "B"), ("r2", "B", "C"), ("r3", "C", "A")] {
                model.add_reaction(
                    Reaction::new(id)
                        .with_reactant(from, 1.0)
                        .with_product(to, 1.0)
                        .with_modifier("E", ModifierRole::EnzymeCatalysis)
                        .reversible(true),
                );
            }
            let index = ModelIndex::new(&model);
            let matrix = StoichiometricMatrix::from_model(&model, &index);
            matrix.pretty_print();
            let analysis = StoichiometricRankAnalyzer::analyze(&matrix);
            println!(
                "column rank {} of {} reactions, full rank: {}",
                analysis.column_rank,
                model.reactions.len(),
                analysis.has_full_column_rank
            );
            let options = KineticsOptions {
                uni_uni_mechanism: UniUniMechanism::Convenience,
                ..KineticsOptions::default()
            };
            let mut generator = KineticLawGenerator::new(options);
            match generator.generate(&mut model) {
                Ok(report) => {
                    report.pretty_print_laws();
                    println!("global parameters: {:?}", report.global_parameters);
                }
                Err(e) => println!("generation failed: {}", e),
            }
        }
        4 => {
            // CHOOSING A MECHANISM FOR ONE REACTION
            let mut model = glycolysis_model();
            let mut generator = KineticLawGenerator::new(KineticsOptions::default());
            match generator.possible_law_types(&model, "PGI") {
                Ok(types) => {
                    for law_type in &types {
                        println!("{:>3} {}", law_type.code(), law_type.label());
                    }
                }
                Err(e) => println!("{}", e),
            }
            for law_type in [KineticLawType::Convenience, KineticLawType::MichaelisMenten] {
                match generator.create_law(&mut model, "PGI", law_type) {
                    Ok(law) => println!("{}: {}", law.name, law.text),
                    Err(e) => println!("{}", e),
                }
            }
        }
        _ => println!("no example with number {}", task),
    }
}
