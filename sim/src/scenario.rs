//! JSON scenario files for headless combats
//!
//! A scenario names both parties and optionally overrides the ability catalog
//! and the combat rules. Units are either full combatant records or references
//! to one of the built-in templates.

use blight_battle::{starter, AbilityCatalog, AbilityDefinition, CombatConfig, CombatResult, Combatant};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root scenario document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    pub heroes: Vec<UnitSpec>,
    pub monsters: Vec<UnitSpec>,
    /// Replaces the starter catalog when present
    #[serde(default)]
    pub catalog: Option<Vec<AbilityDefinition>>,
    #[serde(default)]
    pub config: CombatConfig,
}

/// A party member, either inline or built from a template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitSpec {
    Template(TemplateUnit),
    Custom(Combatant),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateUnit {
    pub template: String,
    pub id: u32,
    #[serde(default = "default_position")]
    pub position: u8,
    #[serde(default = "default_rank")]
    pub rank: u8,
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_position() -> u8 {
    1
}

fn default_rank() -> u8 {
    1
}

impl Scenario {
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let scenario: Scenario =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks what the engine cannot: template names and the rule block.
    /// Roster shape is left to `start_combat`, which reports it as an abort.
    fn validate(&self) -> Result<(), String> {
        for spec in self.heroes.iter().chain(self.monsters.iter()) {
            if let UnitSpec::Template(unit) = spec {
                if template(&unit.template, unit.id).is_none() {
                    return Err(format!(
                        "Unknown template '{}'. Valid templates: {}",
                        unit.template,
                        TEMPLATES.join(", ")
                    ));
                }
            }
        }
        self.config
            .validate()
            .map_err(|reason| format!("Invalid config: {}", reason))
    }

    pub fn catalog(&self) -> CombatResult<AbilityCatalog> {
        let catalog = match &self.catalog {
            Some(abilities) => AbilityCatalog::new(abilities.clone())?,
            None => starter::starter_catalog()?,
        };
        Ok(catalog)
    }

    pub fn heroes(&self) -> Vec<Combatant> {
        self.heroes.iter().filter_map(UnitSpec::build).collect()
    }

    pub fn monsters(&self) -> Vec<Combatant> {
        self.monsters.iter().filter_map(UnitSpec::build).collect()
    }
}

impl UnitSpec {
    fn build(&self) -> Option<Combatant> {
        match self {
            UnitSpec::Custom(unit) => Some(unit.clone()),
            UnitSpec::Template(unit) => {
                template(&unit.template, unit.id).map(|c| c.at_position(unit.position).at_rank(unit.rank))
            }
        }
    }
}

const TEMPLATES: [&str; 5] = ["warden", "duelist", "chaplain", "plague_hound", "bone_priest"];

fn template(name: &str, id: u32) -> Option<Combatant> {
    match name.to_lowercase().as_str() {
        "warden" => Some(starter::warden(id)),
        "duelist" => Some(starter::duelist(id)),
        "chaplain" => Some(starter::chaplain(id)),
        "plague_hound" => Some(starter::plague_hound(id)),
        "bone_priest" => Some(starter::bone_priest(id)),
        _ => None,
    }
}
