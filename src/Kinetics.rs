/// Data model of a reaction network: species with their biological roles, reactions with
/// reactants, products and modifiers, and the lookup index used by all other modules.
/// Models are read from and written to JSON.
pub mod model;
/// Symbolic formula tree of a kinetic law. Builders simplify on construction (`x^1 = x`,
/// unit factors and zero terms are dropped), the tree renders to infix text and to LaTeX,
/// can be evaluated numerically and parsed back from infix text.
pub mod formula;
/// Error type shared by the kinetics modules.
pub mod kinetic_error;
/// Naming and registration of the parameters of generated laws.
/// Local parameters are named `<kind>_<reaction>[_<enzyme>][_<species>]`, global ones
/// `<kind>_<species>`. A global parameter is registered only once per run.
pub mod parameters;
/// Stoichiometric matrix of the model (species x reactions) and its column rank.
/// The rank decides between the two variants of convenience kinetics: a matrix of full
/// column rank allows independent forward and reverse rates, otherwise thermodynamically
/// consistent laws with global energy constants are generated.
/// # Examples
/// ```
/// use KiLaw::Kinetics::stoichiometry_analyzer::{StoichiometricMatrix, StoichiometricRankAnalyzer};
/// // A -> B, B -> C, A -> C
/// let matrix = StoichiometricMatrix::from_rows(&[
///     vec![-1.0, 0.0, -1.0],
///     vec![1.0, -1.0, 0.0],
///     vec![0.0, 1.0, 1.0],
/// ]);
/// let analysis = StoichiometricRankAnalyzer::analyze(&matrix);
/// assert_eq!(analysis.column_rank, 2);
/// assert!(!analysis.has_full_column_rank);
/// ```
pub mod stoichiometry_analyzer;
/// Catalog of rate-law mechanisms: generalized mass action (with zeroth order variants),
/// convenience kinetics, Michaelis-Menten, bi-substrate random order/ordered/ping-pong,
/// Hill equation, irreversible non-modulated and competitive inhibition kinetics.
/// Every mechanism implements `RateLawSynthesis`, dispatch goes through the `Mechanism` enum.
pub mod rate_laws;
/// Decides which mechanisms are admissible for a reaction and which one is chosen
/// under the current settings. Also enforces the gene/RNA regulation rules.
pub mod classifier;
/// Assembles `d[S]/dt` for every species from the reaction rates.
pub mod ode_assembler;
/// Orchestrates a whole run: classification, synthesis, write-back into the model,
/// boundary conditions of genes and the ODEs.
/// # Examples
/// ```
/// use KiLaw::Kinetics::law_generator::KineticLawGenerator;
/// use KiLaw::Kinetics::model::{Model, Reaction, Species, SpeciesRole};
/// use KiLaw::settings::KineticsOptions;
/// let mut model = Model::new("example");
/// model
///     .add_species(Species::new("A", "A", SpeciesRole::SimpleMolecule))
///     .add_species(Species::new("B", "B", SpeciesRole::SimpleMolecule))
///     .add_reaction(Reaction::new("r0").with_reactant("A", 1.0).with_product("B", 1.0));
/// let mut generator = KineticLawGenerator::new(KineticsOptions::default());
/// let report = generator.generate(&mut model).unwrap();
/// assert_eq!(model.reactions[0].kinetic_law.as_deref(), Some("kass_r0*A"));
/// assert_eq!(report.ode("B").unwrap().simple, "v0");
/// ```
pub mod law_generator;

mod rate_laws_tests;
