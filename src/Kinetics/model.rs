//! # Reaction Network Model
//!
//! ## Purpose
//! Data model of the reaction network consumed by the kinetic law engine: species with
//! their role tags and boundary flags, reactions with reactant/product/modifier references,
//! and the model container. The model is (de)serialized with serde so a network can be
//! stored as JSON and read back by the command line front end.
//!
//! ## Key Features
//! - **Role tags**: closed set of species roles (gene, RNA, protein, simple molecule ...)
//! - **Modifier roles**: catalysis, activation, inhibition and transcriptional/translational regulation
//! - **Species keys**: `ModelIndex` normalizes species keys once (id, or the name when the id is empty)
//!   so that downstream components never branch on how a species is addressed
//! - **Structural validation**: every reference of a reaction is checked against the index
use crate::Kinetics::kinetic_error::KineticError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Role tag of a species.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum SpeciesRole {
    Gene,
    Rna,
    AntisenseRna,
    /// protein or generic gene product
    Protein,
    TruncatedProtein,
    SimpleMolecule,
    Complex,
    Receptor,
    IonChannel,
    Ion,
    #[default]
    Unknown,
    /// the empty set / degradation sink
    Degraded,
    Other,
}

impl SpeciesRole {
    pub fn all() -> [SpeciesRole; 13] {
        use SpeciesRole::*;
        [
            Gene,
            Rna,
            AntisenseRna,
            Protein,
            TruncatedProtein,
            SimpleMolecule,
            Complex,
            Receptor,
            IonChannel,
            Ion,
            Unknown,
            Degraded,
            Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesRole::Gene => "GENE",
            SpeciesRole::Rna => "RNA",
            SpeciesRole::AntisenseRna => "ANTISENSE_RNA",
            SpeciesRole::Protein => "GENERIC",
            SpeciesRole::TruncatedProtein => "TRUNCATED",
            SpeciesRole::SimpleMolecule => "SIMPLE_MOLECULE",
            SpeciesRole::Complex => "COMPLEX",
            SpeciesRole::Receptor => "RECEPTOR",
            SpeciesRole::IonChannel => "ION_CHANNEL",
            SpeciesRole::Ion => "ION",
            SpeciesRole::Unknown => "UNKNOWN",
            SpeciesRole::Degraded => "DEGRADED",
            SpeciesRole::Other => "OTHER",
        }
    }

    /// Case-insensitive lookup; "PROTEIN" is accepted as an alias of "GENERIC".
    pub fn from_name(name: &str) -> Option<SpeciesRole> {
        let upper = name.trim().to_uppercase().replace(['-', ' '], "_");
        if upper == "PROTEIN" {
            return Some(SpeciesRole::Protein);
        }
        SpeciesRole::all()
            .into_iter()
            .find(|role| role.as_str() == upper)
    }

    /// Genes, ions, ion channels, sinks and phenotypes never act as enzymes.
    pub fn can_be_enzyme(&self) -> bool {
        !matches!(
            self,
            SpeciesRole::Gene
                | SpeciesRole::IonChannel
                | SpeciesRole::Ion
                | SpeciesRole::Degraded
                | SpeciesRole::Other
        )
    }

    pub fn default_enzyme_roles() -> BTreeSet<SpeciesRole> {
        [
            SpeciesRole::AntisenseRna,
            SpeciesRole::SimpleMolecule,
            SpeciesRole::Unknown,
            SpeciesRole::Complex,
            SpeciesRole::TruncatedProtein,
            SpeciesRole::Protein,
            SpeciesRole::Rna,
            SpeciesRole::Receptor,
        ]
        .into_iter()
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: SpeciesRole,
    #[serde(default)]
    pub boundary_condition: bool,
}

impl Species {
    pub fn new(id: &str, name: &str, role: SpeciesRole) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
            boundary_condition: false,
        }
    }

    pub fn with_boundary_condition(mut self, boundary: bool) -> Self {
        self.boundary_condition = boundary;
        self
    }

    /// canonical key: the identifier, or the name for models without identifiers
    pub fn key(&self) -> &str {
        if self.id.trim().is_empty() {
            &self.name
        } else {
            &self.id
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

fn unit_stoichiometry() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesReference {
    pub species: String,
    #[serde(default = "unit_stoichiometry")]
    pub stoichiometry: f64,
}

impl SpeciesReference {
    pub fn new(species: &str, stoichiometry: f64) -> Self {
        Self {
            species: species.to_string(),
            stoichiometry,
        }
    }

    pub fn has_integer_stoichiometry(&self) -> bool {
        self.stoichiometry.fract() == 0.0
    }

    /// finite and not negative
    pub fn has_valid_stoichiometry(&self) -> bool {
        self.stoichiometry.is_finite() && self.stoichiometry >= 0.0
    }
}

/// Role of a modifier in a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierRole {
    /// generic catalysis, resolved to enzyme or non-enzyme catalyst by the species role
    Catalysis,
    EnzymeCatalysis,
    NonEnzymeCatalysis,
    Activation,
    Inhibition,
    TranscriptionalActivation,
    TranscriptionalInhibition,
    TranslationalActivation,
    TranslationalInhibition,
    /// acts as activator and inhibitor at the same time
    Modulation,
    Trigger,
    PhysicalStimulation,
    UnknownCatalysis,
}

impl ModifierRole {
    pub fn is_transcriptional(&self) -> bool {
        matches!(
            self,
            ModifierRole::TranscriptionalActivation | ModifierRole::TranscriptionalInhibition
        )
    }

    pub fn is_translational(&self) -> bool {
        matches!(
            self,
            ModifierRole::TranslationalActivation | ModifierRole::TranslationalInhibition
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierReference {
    pub species: String,
    pub role: ModifierRole,
}

/// Biological kind of a reaction, used by the gene/RNA eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReactionKind {
    #[default]
    StateTransition,
    Transcription,
    Translation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reactants: Vec<SpeciesReference>,
    #[serde(default)]
    pub products: Vec<SpeciesReference>,
    #[serde(default)]
    pub modifiers: Vec<ModifierReference>,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default)]
    pub kind: ReactionKind,
    /// formula of a kinetic law already present in the model
    #[serde(default)]
    pub kinetic_law: Option<String>,
}

impl Reaction {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            reactants: Vec::new(),
            products: Vec::new(),
            modifiers: Vec::new(),
            reversible: false,
            kind: ReactionKind::StateTransition,
            kinetic_law: None,
        }
    }

    pub fn with_reactant(mut self, species: &str, stoichiometry: f64) -> Self {
        self.reactants
            .push(SpeciesReference::new(species, stoichiometry));
        self
    }

    pub fn with_product(mut self, species: &str, stoichiometry: f64) -> Self {
        self.products.push(SpeciesReference::new(species, stoichiometry));
        self
    }

    pub fn with_modifier(mut self, species: &str, role: ModifierRole) -> Self {
        self.modifiers.push(ModifierReference {
            species: species.to_string(),
            role,
        });
        self
    }

    pub fn reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    pub fn with_kind(mut self, kind: ReactionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_kinetic_law(mut self, formula: &str) -> Self {
        self.kinetic_law = Some(formula.to_string());
        self
    }

    /// summed reactant stoichiometry
    pub fn reactant_order(&self) -> f64 {
        self.reactants.iter().map(|r| r.stoichiometry).sum()
    }

    /// summed product stoichiometry
    pub fn product_order(&self) -> f64 {
        self.products.iter().map(|p| p.stoichiometry).sum()
    }

    /// An empty or whitespace-only formula does not count as an existing law.
    pub fn has_existing_law(&self) -> bool {
        matches!(&self.kinetic_law, Some(formula) if !formula.trim().is_empty())
    }

    pub fn has_blank_law(&self) -> bool {
        matches!(&self.kinetic_law, Some(formula) if formula.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Model {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: Vec<Species>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Model {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn add_species(&mut self, species: Species) -> &mut Self {
        self.species.push(species);
        self
    }

    pub fn add_reaction(&mut self, reaction: Reaction) -> &mut Self {
        self.reactions.push(reaction);
        self
    }

    pub fn reaction_position(&self, reaction_id: &str) -> Option<usize> {
        self.reactions.iter().position(|r| r.id == reaction_id)
    }

    pub fn from_json_str(content: &str) -> Result<Self, KineticError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, KineticError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KineticError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Normalized view of the species of a model.
///
/// Built once per run. Maps every canonical species key to its position in
/// `Model::species`, its display name and its role tag.
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    keys: Vec<String>,
    positions: HashMap<String, usize>,
    names: HashMap<String, String>,
    roles: HashMap<String, SpeciesRole>,
}

impl ModelIndex {
    pub fn new(model: &Model) -> Self {
        let mut index = ModelIndex::default();
        for (position, species) in model.species.iter().enumerate() {
            let key = species.key().to_string();
            if index.positions.contains_key(&key) {
                log::warn!("species key {} is declared twice, keeping the first one", key);
                continue;
            }
            index.positions.insert(key.clone(), position);
            index
                .names
                .insert(key.clone(), species.display_name().to_string());
            index.roles.insert(key.clone(), species.role);
            index.keys.push(key);
        }
        index
    }

    /// species keys in model order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn role(&self, key: &str) -> Option<SpeciesRole> {
        self.roles.get(key).copied()
    }

    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.names.get(key).map(|s| s.as_str()).unwrap_or(key)
    }

    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    /// Checks that every reactant, product and modifier of the reaction is declared.
    pub fn validate_reaction(&self, reaction: &Reaction) -> Result<(), KineticError> {
        if let Some(reference) = reaction
            .reactants
            .iter()
            .chain(reaction.products.iter())
            .find(|r| !r.has_valid_stoichiometry())
        {
            return Err(KineticError::InvalidStoichiometry {
                reaction: reaction.id.clone(),
                species: reference.species.clone(),
                stoichiometry: reference.stoichiometry,
            });
        }
        let referenced = reaction
            .reactants
            .iter()
            .chain(reaction.products.iter())
            .map(|r| r.species.as_str())
            .chain(reaction.modifiers.iter().map(|m| m.species.as_str()));
        for species in referenced {
            if !self.contains(species) {
                return Err(KineticError::MissingSpecies {
                    reaction: reaction.id.clone(),
                    species: species.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_key_falls_back_to_name() {
        let with_id = Species::new("s1", "Glucose", SpeciesRole::SimpleMolecule);
        let without_id = Species::new("", "ATP", SpeciesRole::SimpleMolecule);
        assert_eq!(with_id.key(), "s1");
        assert_eq!(with_id.display_name(), "Glucose");
        assert_eq!(without_id.key(), "ATP");
        assert_eq!(without_id.display_name(), "ATP");
    }

    #[test]
    fn test_role_lookup() {
        assert_eq!(SpeciesRole::from_name("gene"), Some(SpeciesRole::Gene));
        assert_eq!(SpeciesRole::from_name("Protein"), Some(SpeciesRole::Protein));
        assert_eq!(
            SpeciesRole::from_name("simple molecule"),
            Some(SpeciesRole::SimpleMolecule)
        );
        assert_eq!(SpeciesRole::from_name("phenotype"), None);
        assert!(!SpeciesRole::Gene.can_be_enzyme());
        assert!(SpeciesRole::Complex.can_be_enzyme());
        assert_eq!(SpeciesRole::default_enzyme_roles().len(), 8);
    }

    #[test]
    fn test_blank_law_is_not_existing() {
        let blank = Reaction::new("r1").with_kinetic_law("  ");
        let real = Reaction::new("r2").with_kinetic_law("k*A");
        let none = Reaction::new("r3");
        assert!(!blank.has_existing_law());
        assert!(blank.has_blank_law());
        assert!(real.has_existing_law());
        assert!(!none.has_existing_law());
        assert!(!none.has_blank_law());
    }

    #[test]
    fn test_orders() {
        let r = Reaction::new("r1")
            .with_reactant("A", 2.0)
            .with_reactant("B", 1.0)
            .with_product("C", 1.0);
        assert_eq!(r.reactant_order(), 3.0);
        assert_eq!(r.product_order(), 1.0);
    }

    #[test]
    fn test_index_validation() {
        let mut model = Model::new("m");
        model
            .add_species(Species::new("A", "alpha", SpeciesRole::SimpleMolecule))
            .add_species(Species::new("B", "", SpeciesRole::SimpleMolecule));
        let index = ModelIndex::new(&model);
        assert_eq!(index.keys(), &["A".to_string(), "B".to_string()]);
        assert_eq!(index.display_name("A"), "alpha");
        assert_eq!(index.display_name("B"), "B");

        let good = Reaction::new("r1").with_reactant("A", 1.0).with_product("B", 1.0);
        assert!(index.validate_reaction(&good).is_ok());
        let bad = Reaction::new("r2")
            .with_reactant("A", 1.0)
            .with_modifier("E", ModifierRole::EnzymeCatalysis);
        match index.validate_reaction(&bad) {
            Err(KineticError::MissingSpecies { reaction, species }) => {
                assert_eq!(reaction, "r2");
                assert_eq!(species, "E");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_bad_stoichiometry() {
        let mut model = Model::new("m");
        model
            .add_species(Species::new("A", "", SpeciesRole::SimpleMolecule))
            .add_species(Species::new("B", "", SpeciesRole::SimpleMolecule));
        let index = ModelIndex::new(&model);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let reaction = Reaction::new("r1").with_reactant("A", 1.0).with_product("B", bad);
            match index.validate_reaction(&reaction) {
                Err(KineticError::InvalidStoichiometry { reaction, species, .. }) => {
                    assert_eq!(reaction, "r1");
                    assert_eq!(species, "B");
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
        let empty_side = Reaction::new("r2").with_reactant("A", 0.0).with_product("B", 1.0);
        assert!(index.validate_reaction(&empty_side).is_ok());
    }

    #[test]
    fn test_model_json_roundtrip_with_defaults() {
        let json = r#"{
            "id": "toy",
            "species": [{"id": "A"}, {"id": "B", "role": "Gene", "boundary_condition": true}],
            "reactions": [{"id": "r0", "reactants": [{"species": "A"}], "products": [{"species": "B", "stoichiometry": 2.0}]}]
        }"#;
        let model = Model::from_json_str(json).unwrap();
        assert_eq!(model.species[0].role, SpeciesRole::Unknown);
        assert!(model.species[1].boundary_condition);
        assert_eq!(model.reactions[0].reactants[0].stoichiometry, 1.0);
        assert_eq!(model.reactions[0].products[0].stoichiometry, 2.0);
        assert_eq!(model.reactions[0].kind, ReactionKind::StateTransition);
        assert!(!model.reactions[0].reversible);
    }
}
