//! # Settings Module
//!
//! ## Purpose
//! Options of the kinetic law generator and their persistence. The options are an immutable
//! bundle handed to the generator; the `SettingsManager` reads and writes them in a plain
//! `key:value` file framed by `START`/`END` and imports/exports them as JSON.
//!
//! ## Key Features
//! - **Mechanism selection**: default mechanism for uni-uni, bi-uni and bi-bi enzyme reactions
//! - **Lenient loading**: unknown keys and out-of-range values are reported with `log::warn!`
//!   and replaced by the default, a load never aborts because of a bad value
//! - **JSON exchange**: the same options serialized with serde_json (camelCase keys)
//!
//! ## File Format
//! ```text
//! KiLaw kinetic law settings
//! version:1
//! START
//! uniUniMechanism:michaelis-menten
//! biUniMechanism:random-order
//! biBiMechanism:random-order
//! forceAllReactionsEnzymeCatalyzed:false
//! enzymeSpeciesRoles:GENERIC,RNA,COMPLEX
//! END
//! ```
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use KiLaw::settings::SettingsManager;
//!
//! let mut manager = SettingsManager::with_settings_file("kilaw_settings.txt");
//! manager.options_mut().store_parameters_globally = true;
//! manager.save()?;
//! ```
use crate::Kinetics::model::SpeciesRole;
use crate::Kinetics::rate_laws::KineticLawType;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const SETTINGS_HEADER: &str = "KiLaw kinetic law settings";
pub const SETTINGS_VERSION: &str = "1";
pub const DEFAULT_SETTINGS_FILE: &str = "kilaw_settings.txt";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings pattern error: {0}")]
    Regex(#[from] regex::Error),
}

/// Default mechanism of enzyme reactions with one reactant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UniUniMechanism {
    MassAction,
    Convenience,
    #[default]
    MichaelisMenten,
}

/// Default mechanism of enzyme reactions with two reactants and one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BiUniMechanism {
    MassAction,
    Convenience,
    #[default]
    RandomOrder,
    Ordered,
}

/// Default mechanism of enzyme reactions with two reactants and two products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BiBiMechanism {
    MassAction,
    Convenience,
    #[default]
    RandomOrder,
    PingPong,
    Ordered,
}

impl UniUniMechanism {
    pub fn law_type(&self) -> KineticLawType {
        match self {
            UniUniMechanism::MassAction => KineticLawType::GeneralizedMassAction,
            UniUniMechanism::Convenience => KineticLawType::Convenience,
            UniUniMechanism::MichaelisMenten => KineticLawType::MichaelisMenten,
        }
    }

    pub fn from_law_type(law_type: KineticLawType) -> Option<Self> {
        [
            UniUniMechanism::MassAction,
            UniUniMechanism::Convenience,
            UniUniMechanism::MichaelisMenten,
        ]
        .into_iter()
        .find(|m| m.law_type() == law_type)
    }
}

impl BiUniMechanism {
    pub fn law_type(&self) -> KineticLawType {
        match self {
            BiUniMechanism::MassAction => KineticLawType::GeneralizedMassAction,
            BiUniMechanism::Convenience => KineticLawType::Convenience,
            BiUniMechanism::RandomOrder => KineticLawType::RandomOrder,
            BiUniMechanism::Ordered => KineticLawType::Ordered,
        }
    }

    pub fn from_law_type(law_type: KineticLawType) -> Option<Self> {
        [
            BiUniMechanism::MassAction,
            BiUniMechanism::Convenience,
            BiUniMechanism::RandomOrder,
            BiUniMechanism::Ordered,
        ]
        .into_iter()
        .find(|m| m.law_type() == law_type)
    }
}

impl BiBiMechanism {
    pub fn law_type(&self) -> KineticLawType {
        match self {
            BiBiMechanism::MassAction => KineticLawType::GeneralizedMassAction,
            BiBiMechanism::Convenience => KineticLawType::Convenience,
            BiBiMechanism::RandomOrder => KineticLawType::RandomOrder,
            BiBiMechanism::PingPong => KineticLawType::PingPong,
            BiBiMechanism::Ordered => KineticLawType::Ordered,
        }
    }

    pub fn from_law_type(law_type: KineticLawType) -> Option<Self> {
        [
            BiBiMechanism::MassAction,
            BiBiMechanism::Convenience,
            BiBiMechanism::RandomOrder,
            BiBiMechanism::PingPong,
            BiBiMechanism::Ordered,
        ]
        .into_iter()
        .find(|m| m.law_type() == law_type)
    }
}

fn default_true() -> bool {
    true
}

/// Options of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KineticsOptions {
    #[serde(default)]
    pub uni_uni_mechanism: UniUniMechanism,
    #[serde(default)]
    pub bi_uni_mechanism: BiUniMechanism,
    #[serde(default)]
    pub bi_bi_mechanism: BiBiMechanism,
    /// treat every reaction as enzyme catalyzed, with or without an enzyme modifier
    #[serde(default, rename = "forceAllReactionsEnzymeCatalyzed")]
    pub force_enzyme_for_all: bool,
    /// replace laws already present in the model
    #[serde(default = "default_true")]
    pub regenerate_existing_laws: bool,
    /// generate reversible laws for every reaction (sets the reversibility flag)
    #[serde(default)]
    pub treat_as_reversible: bool,
    /// species roles that count as enzymes when a modifier is a plain catalysis
    #[serde(default = "SpeciesRole::default_enzyme_roles")]
    pub enzyme_species_roles: BTreeSet<SpeciesRole>,
    #[serde(default)]
    pub store_parameters_globally: bool,
    /// substitute generalized mass action when the chosen mechanism does not apply
    #[serde(default)]
    pub fallback_to_mass_action: bool,
    #[serde(default = "default_true")]
    pub set_boundary_condition_for_genes: bool,
}

impl Default for KineticsOptions {
    fn default() -> Self {
        Self {
            uni_uni_mechanism: UniUniMechanism::default(),
            bi_uni_mechanism: BiUniMechanism::default(),
            bi_bi_mechanism: BiBiMechanism::default(),
            force_enzyme_for_all: false,
            regenerate_existing_laws: true,
            treat_as_reversible: false,
            enzyme_species_roles: SpeciesRole::default_enzyme_roles(),
            store_parameters_globally: false,
            fallback_to_mass_action: false,
            set_boundary_condition_for_genes: true,
        }
    }
}

///////////////////////////////////KEY:VALUE FILE////////////////////////////////////////////

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_roles(value: &str) -> Option<BTreeSet<SpeciesRole>> {
    let mut roles = BTreeSet::new();
    for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        roles.insert(SpeciesRole::from_name(item)?);
    }
    Some(roles)
}

fn format_roles(roles: &BTreeSet<SpeciesRole>) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

impl KineticsOptions {
    /// Applies one `key:value` entry. Returns false when the key is unknown or the
    /// value is out of range; the option then keeps its current value.
    pub fn apply_entry(&mut self, key: &str, value: &str) -> bool {
        let law_type = KineticLawType::from_key(value);
        match key {
            "uniUniMechanism" => match law_type.and_then(UniUniMechanism::from_law_type) {
                Some(m) => self.uni_uni_mechanism = m,
                None => return false,
            },
            "biUniMechanism" => match law_type.and_then(BiUniMechanism::from_law_type) {
                Some(m) => self.bi_uni_mechanism = m,
                None => return false,
            },
            "biBiMechanism" => match law_type.and_then(BiBiMechanism::from_law_type) {
                Some(m) => self.bi_bi_mechanism = m,
                None => return false,
            },
            "enzymeSpeciesRoles" => match parse_roles(value) {
                Some(roles) => self.enzyme_species_roles = roles,
                None => return false,
            },
            _ => {
                let Some(flag) = parse_bool(value) else {
                    return false;
                };
                match key {
                    "forceAllReactionsEnzymeCatalyzed" => self.force_enzyme_for_all = flag,
                    "regenerateExistingLaws" => self.regenerate_existing_laws = flag,
                    "treatAsReversible" => self.treat_as_reversible = flag,
                    "storeParametersGlobally" => self.store_parameters_globally = flag,
                    "fallbackToMassAction" => self.fallback_to_mass_action = flag,
                    "setBoundaryConditionForGenes" => self.set_boundary_condition_for_genes = flag,
                    _ => return false,
                }
            }
        }
        true
    }

    /// `key:value` entries in file order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("uniUniMechanism", self.uni_uni_mechanism.law_type().key().to_string()),
            ("biUniMechanism", self.bi_uni_mechanism.law_type().key().to_string()),
            ("biBiMechanism", self.bi_bi_mechanism.law_type().key().to_string()),
            ("forceAllReactionsEnzymeCatalyzed", self.force_enzyme_for_all.to_string()),
            ("regenerateExistingLaws", self.regenerate_existing_laws.to_string()),
            ("treatAsReversible", self.treat_as_reversible.to_string()),
            ("enzymeSpeciesRoles", format_roles(&self.enzyme_species_roles)),
            ("storeParametersGlobally", self.store_parameters_globally.to_string()),
            ("fallbackToMassAction", self.fallback_to_mass_action.to_string()),
            (
                "setBoundaryConditionForGenes",
                self.set_boundary_condition_for_genes.to_string(),
            ),
        ]
    }

    /// Parses the START/END file layout. Lines outside the START/END frame are ignored,
    /// bad lines are reported and skipped.
    pub fn from_settings_text(content: &str) -> Result<Self, SettingsError> {
        let line_re = Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_]*)\s*:\s*(.*?)\s*$")?;
        let mut options = KineticsOptions::default();
        let mut inside = false;
        for (number, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed {
                "START" => {
                    inside = true;
                    continue;
                }
                "END" => break,
                _ => {}
            }
            if let Some(version) = trimmed.strip_prefix("version:") {
                if version.trim() != SETTINGS_VERSION {
                    warn!(
                        "settings file version {} differs from {}, reading it anyway",
                        version.trim(),
                        SETTINGS_VERSION
                    );
                }
                continue;
            }
            if !inside {
                continue;
            }
            match line_re.captures(trimmed) {
                Some(caps) => {
                    let key = &caps[1];
                    let value = &caps[2];
                    if !options.apply_entry(key, value) {
                        warn!(
                            "settings line {}: unknown key or invalid value '{}:{}', keeping default",
                            number + 1,
                            key,
                            value
                        );
                    }
                }
                None => warn!("settings line {}: cannot parse '{}'", number + 1, trimmed),
            }
        }
        Ok(options)
    }

    pub fn to_settings_text(&self) -> String {
        let mut text = format!("{}\nversion:{}\nSTART\n", SETTINGS_HEADER, SETTINGS_VERSION);
        for (key, value) in self.entries() {
            text.push_str(&format!("{}:{}\n", key, value));
        }
        text.push_str("END\n");
        text
    }
}

/// Holds the options and the file they are persisted in.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    options: KineticsOptions,
    settings_file: String,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    /// Loads `kilaw_settings.txt` from the working directory or uses the defaults.
    pub fn new() -> Self {
        Self::with_settings_file(DEFAULT_SETTINGS_FILE)
    }

    /// Uses a custom settings file. A missing or unreadable file gives the defaults.
    pub fn with_settings_file(settings_file: &str) -> Self {
        let options = match Self::load_file(settings_file) {
            Ok(options) => options,
            Err(e) => {
                warn!("cannot read settings from {}: {}, using defaults", settings_file, e);
                KineticsOptions::default()
            }
        };
        Self {
            options,
            settings_file: settings_file.to_string(),
        }
    }

    fn load_file(settings_file: &str) -> Result<KineticsOptions, SettingsError> {
        if Path::new(settings_file).exists() {
            let content = fs::read_to_string(settings_file)?;
            KineticsOptions::from_settings_text(&content)
        } else {
            Ok(KineticsOptions::default())
        }
    }

    pub fn options(&self) -> &KineticsOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut KineticsOptions {
        &mut self.options
    }

    pub fn settings_file(&self) -> &str {
        &self.settings_file
    }

    /// Re-reads the settings file, I/O errors are returned.
    pub fn load(&mut self) -> Result<(), SettingsError> {
        self.options = Self::load_file(&self.settings_file)?;
        info!("settings loaded from {}", self.settings_file);
        Ok(())
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        fs::write(&self.settings_file, self.options.to_settings_text())?;
        info!("settings saved to {}", self.settings_file);
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.options = KineticsOptions::default();
    }

    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(&self.options)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn import_json<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SettingsError> {
        let content = fs::read_to_string(path)?;
        self.options = serde_json::from_str(&content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let options = KineticsOptions::default();
        assert_eq!(options.uni_uni_mechanism, UniUniMechanism::MichaelisMenten);
        assert!(options.regenerate_existing_laws);
        assert!(!options.store_parameters_globally);
        assert!(options.set_boundary_condition_for_genes);
        assert!(options.enzyme_species_roles.contains(&SpeciesRole::Protein));
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let mut manager = SettingsManager::with_settings_file(&path);
        manager.options_mut().bi_bi_mechanism = BiBiMechanism::PingPong;
        manager.options_mut().store_parameters_globally = true;
        manager.options_mut().enzyme_species_roles =
            [SpeciesRole::Protein, SpeciesRole::Complex].into_iter().collect();
        manager.save().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(SETTINGS_HEADER));
        assert!(text.contains("biBiMechanism:ping-pong"));
        assert!(text.trim_end().ends_with("END"));

        let reloaded = SettingsManager::with_settings_file(&path);
        assert_eq!(reloaded.options(), manager.options());
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "{}\nversion:1\nSTART\nuniUniMechanism:ping-pong\nbiUniMechanism:4\nnoSuchKey:true\ntreatAsReversible:maybe\nstoreParametersGlobally:true\nEND",
            SETTINGS_HEADER
        )
        .unwrap();
        let manager = SettingsManager::with_settings_file(file.path().to_str().unwrap());
        let options = manager.options();
        // ping-pong is not a uni-uni mechanism
        assert_eq!(options.uni_uni_mechanism, UniUniMechanism::MichaelisMenten);
        assert_eq!(options.bi_uni_mechanism, BiUniMechanism::RandomOrder);
        assert!(!options.treat_as_reversible);
        assert!(options.store_parameters_globally);
    }

    #[test]
    fn test_lines_outside_frame_are_ignored() {
        let text = "header\nuniUniMechanism:mass-action\nSTART\nbiUniMechanism:ordered\nEND\nbiBiMechanism:ordered\n";
        let options = KineticsOptions::from_settings_text(text).unwrap();
        assert_eq!(options.uni_uni_mechanism, UniUniMechanism::MichaelisMenten);
        assert_eq!(options.bi_uni_mechanism, BiUniMechanism::Ordered);
        assert_eq!(options.bi_bi_mechanism, BiBiMechanism::RandomOrder);
    }

    #[test]
    fn test_json_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let mut manager = SettingsManager::with_settings_file("no_such_settings_file.txt");
        manager.options_mut().fallback_to_mass_action = true;
        manager.export_json(file.path()).unwrap();
        let json = fs::read_to_string(file.path()).unwrap();
        assert!(json.contains("\"fallbackToMassAction\": true"));
        assert!(json.contains("\"forceAllReactionsEnzymeCatalyzed\""));

        let mut other = SettingsManager::with_settings_file("no_such_settings_file.txt");
        other.import_json(file.path()).unwrap();
        assert!(other.options().fallback_to_mass_action);
    }

    #[test]
    fn test_missing_file_reports_io_error_on_import() {
        let mut manager = SettingsManager::with_settings_file("no_such_settings_file.txt");
        assert!(matches!(
            manager.import_json("no_such_settings_file.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
