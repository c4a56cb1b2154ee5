//! Static catalog of locations and the closing checklist.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Placeholder used by the roster for locations without a responsible.
pub const NO_RESPONSIBLE: &str = "SIN AUXILIAR EN EL MOMENTO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Valle,
    Cauca,
    Antioquia,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Valle => "VALLE",
            Region::Cauca => "CAUCA",
            Region::Antioquia => "ANTIOQUIA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "VALLE" => Some(Region::Valle),
            "CAUCA" => Some(Region::Cauca),
            "ANTIOQUIA" => Some(Region::Antioquia),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterLocation {
    pub id: String,
    pub name: String,
    pub responsible: String,
    pub group: Region,
}

impl RosterLocation {
    /// Build an entry whose id is derived from the first token of the name
    /// (`"001 CARIBE - PRINCIPAL"` -> `"loc-001"`).
    pub fn new(name: &str, responsible: &str, group: Region) -> Self {
        let code = name.split_whitespace().next().unwrap_or(name);
        Self {
            id: format!("loc-{code}"),
            name: name.to_string(),
            responsible: responsible.to_string(),
            group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub key: String,
    pub label: String,
}

/// Shape of a roster YAML file.
#[derive(Debug, Deserialize)]
struct RosterFile {
    locations: Vec<RosterFileLocation>,
    activities: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct RosterFileLocation {
    name: String,
    responsible: String,
    group: Region,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    locations: Vec<RosterLocation>,
    activities: Vec<Activity>,
}

const CARIBE_LOCATIONS: &[(&str, &str, Region)] = &[
    ("001 CARIBE - PRINCIPAL", "DIEGO FERNANDO QUINTERO GALLEGO", Region::Valle),
    ("003 CARIBE - CENTRO", "ERICK DENILSON VILLA FERNANDEZ", Region::Valle),
    ("004 CARIBE - MAS CARNES", NO_RESPONSIBLE, Region::Cauca),
    ("005 CARIBE - PUERTO TEJADA", "GUSTAVO DIAZ VALDEZ", Region::Cauca),
    ("009 CARIBE - PANAMERICANA", "JULIAN ANDRES VELEZ CUAICAL", Region::Valle),
    ("010 CARIBE - BUGA", "DAVID MUELAS EDINSON", Region::Valle),
    ("013 CARIBE - EL RETIRO", "MARIA JOSE ROLDAN RENDON", Region::Antioquia),
    ("014 CARIBE - MARINILLA", "STEVEN CASTRO GOMEZ", Region::Antioquia),
    ("018 CARIBE - VILLARICA", "CESAR ANDRES REYES RENGIFO", Region::Cauca),
    ("019 CARIBE - EL ROSARIO", "KEVIN ANDRES VIDAL ZAMORANO", Region::Valle),
    ("021 CARIBE - TERRANOVA", "CARLOS ANDRES VALENCIA SALAZAR", Region::Valle),
    ("022 CARIBE - FARALLONES", "VICTOR EDUARDO GUZMAN DEL CAMPO", Region::Valle),
    ("024 CARIBE - EL DORADO", "DEYNER PAZ TALAGA", Region::Valle),
    ("027 CARIBE - SURTO MAYORISTA", "YONY FERNANDO TOBAR", Region::Valle),
    ("029 CARIBE - BUGA MAYORISTA", NO_RESPONSIBLE, Region::Valle),
    ("030 CARIBE - PUERTO MAYORISTA", NO_RESPONSIBLE, Region::Cauca),
];

const CARIBE_ACTIVITIES: &[(&str, &str)] = &[
    ("revision_bod_transito", "Revisión bodega de tránsito"),
    ("consumos_internos", "Consumos internos"),
    ("consumos_clientes", "Consumos clientes"),
    ("averias_donaciones", "Averías y donaciones"),
    ("talleres_reclasificaciones", "Talleres y reclasificaciones"),
    ("ajustes_inventarios", "Ajustes de inventarios"),
    ("saldo_costo_mcia_no_cod", "Saldo costo mercancía no codificada"),
    ("motivos", "Motivos"),
    ("acumulacion_inferior_500", "Acumulación inferior a 500"),
    ("ajuste_al_costo", "Ajuste al costo"),
];

impl Roster {
    /// Build a roster, rejecting duplicate location ids or activity keys.
    pub fn new(locations: Vec<RosterLocation>, activities: Vec<Activity>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for loc in &locations {
            if !seen.insert(loc.id.as_str()) {
                return Err(AppError::InvalidRoster(format!(
                    "duplicate location id '{}'",
                    loc.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for act in &activities {
            if !seen.insert(act.key.as_str()) {
                return Err(AppError::InvalidRoster(format!(
                    "duplicate activity key '{}'",
                    act.key
                )));
            }
        }

        Ok(Self {
            locations,
            activities,
        })
    }

    /// The built-in CARIBE roster: sixteen locations, ten closing activities.
    pub fn caribe() -> Self {
        Self {
            locations: CARIBE_LOCATIONS
                .iter()
                .map(|(name, responsible, group)| RosterLocation::new(name, responsible, *group))
                .collect(),
            activities: CARIBE_ACTIVITIES
                .iter()
                .map(|(key, label)| Activity {
                    key: key.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    /// Load a roster from a YAML file.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let file: RosterFile = serde_yaml::from_str(content)
            .map_err(|e| AppError::InvalidRoster(e.to_string()))?;

        let locations = file
            .locations
            .into_iter()
            .map(|l| {
                let mut loc = RosterLocation::new(&l.name, &l.responsible, l.group);
                if let Some(id) = l.id {
                    loc.id = id;
                }
                loc
            })
            .collect();

        Self::new(locations, file.activities)
    }

    pub fn locations(&self) -> &[RosterLocation] {
        &self.locations
    }

    /// Activities in display order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn location(&self, id: &str) -> Option<&RosterLocation> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn has_activity(&self, key: &str) -> bool {
        self.activities.iter().any(|a| a.key == key)
    }

    /// Resolve user input to a location id: the id itself, the bare code
    /// (`001`), or a case-insensitive exact name.
    pub fn resolve_location(&self, input: &str) -> AppResult<&RosterLocation> {
        let needle = input.trim();
        let prefixed = format!("loc-{needle}");

        self.locations
            .iter()
            .find(|l| l.id == needle || l.id == prefixed || l.name.eq_ignore_ascii_case(needle))
            .ok_or_else(|| AppError::UnknownLocation(input.to_string()))
    }

    /// Resolve user input to an activity key: the key or a 1-based position.
    pub fn resolve_activity(&self, input: &str) -> AppResult<&Activity> {
        let needle = input.trim();

        if let Ok(n) = needle.parse::<usize>()
            && let Some(act) = n.checked_sub(1).and_then(|i| self.activities.get(i))
        {
            return Ok(act);
        }

        self.activities
            .iter()
            .find(|a| a.key == needle)
            .ok_or_else(|| AppError::UnknownActivity(input.to_string()))
    }
}
