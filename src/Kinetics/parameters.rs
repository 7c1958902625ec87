//! Parameter naming and the per-run parameter registry.
//!
//! Local parameter names follow `<kind>_<reactionId>[_<enzyme>][_<species>]`, global ones
//! `<kind>_<species>`. The registry guarantees that a name is declared at most once per
//! scope: locals are reset at the start of each law, globals live for the whole run.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterScope {
    Local,
    Global,
}

pub struct ParameterNamer;

impl ParameterNamer {
    pub fn name(kind: &str, reaction: &str, enzyme: Option<&str>, species: Option<&str>) -> String {
        let mut name = format!("{}_{}", kind, reaction);
        if let Some(enzyme) = enzyme {
            name.push('_');
            name.push_str(enzyme);
        }
        if let Some(species) = species {
            name.push('_');
            name.push_str(species);
        }
        name
    }

    pub fn global_name(kind: &str, species: &str) -> String {
        format!("{}_{}", kind, species)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    local: Vec<String>,
    local_seen: HashSet<String>,
    global: Vec<String>,
    global_seen: HashSet<String>,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` in `scope`. Returns false if it was already declared there.
    pub fn register(&mut self, name: &str, scope: ParameterScope) -> bool {
        let (list, seen) = match scope {
            ParameterScope::Local => (&mut self.local, &mut self.local_seen),
            ParameterScope::Global => (&mut self.global, &mut self.global_seen),
        };
        if seen.insert(name.to_string()) {
            list.push(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, name: &str, scope: ParameterScope) -> bool {
        match scope {
            ParameterScope::Local => self.local_seen.contains(name),
            ParameterScope::Global => self.global_seen.contains(name),
        }
    }

    /// starts the local scope of the next law
    pub fn begin_law(&mut self) {
        self.local.clear();
        self.local_seen.clear();
    }

    /// forgets everything, used at the start of a run
    pub fn reset(&mut self) {
        self.begin_law();
        self.global.clear();
        self.global_seen.clear();
    }

    pub fn local_parameters(&self) -> &[String] {
        &self.local
    }

    pub fn global_parameters(&self) -> &[String] {
        &self.global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ParameterNamer::name("kcat", "r1", None, None), "kcat_r1");
        assert_eq!(
            ParameterNamer::name("kM", "r1", Some("E2"), Some("S")),
            "kM_r1_E2_S"
        );
        assert_eq!(ParameterNamer::name("kM", "r1", None, Some("S")), "kM_r1_S");
        assert_eq!(ParameterNamer::global_name("kG", "ATP"), "kG_ATP");
    }

    #[test]
    fn test_registry_scopes() {
        let mut reg = ParameterRegistry::new();
        assert!(reg.register("kG_A", ParameterScope::Global));
        assert!(!reg.register("kG_A", ParameterScope::Global));
        assert!(reg.register("kM_r1_A", ParameterScope::Local));
        assert!(!reg.register("kM_r1_A", ParameterScope::Local));
        // same name in the other scope is a separate declaration
        assert!(reg.register("kM_r1_A", ParameterScope::Global));

        reg.begin_law();
        assert!(reg.local_parameters().is_empty());
        assert!(reg.contains("kG_A", ParameterScope::Global));
        assert!(reg.register("kM_r1_A", ParameterScope::Local));

        reg.reset();
        assert!(reg.global_parameters().is_empty());
        assert!(!reg.contains("kG_A", ParameterScope::Global));
    }
}
