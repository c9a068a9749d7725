//! Deterministic in-memory character catalog.
//!
//! 195 characters: a handful of well-known names with their real ids, padded
//! with generated "Agent NNN" entries. Related comics, events, series and
//! stories are derived from the character id, so every list has a stable
//! total without storing it.

use serde::{Deserialize, Serialize};

/// Number of characters served by the mock gateway.
pub const CATALOG_SIZE: usize = 195;

pub const RESOURCE_ROOT: &str = "http://gateway.marvel.com/v1/public";

const KNOWN: &[(u64, &str)] = &[
    (1011334, "3-D Man"),
    (1017100, "A-Bomb (HAS)"),
    (1009146, "Abomination (Emil Blonsky)"),
    (1009189, "Black Widow"),
    (1009220, "Captain America"),
    (1009262, "Daredevil"),
    (1009351, "Hulk"),
    (1009368, "Iron Man"),
    (1009504, "Professor X"),
    (1009610, "Spider-Man (Peter Parker)"),
    (1009664, "Thor"),
    (1009718, "Wolverine"),
    (1010354, "Zemo"),
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub path: String,
    pub extension: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Available {
    pub available: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub modified: String,
    #[serde(rename = "resourceURI")]
    pub resource_uri: String,
    pub thumbnail: Image,
    pub comics: Available,
    pub events: Available,
    pub series: Available,
    pub stories: Available,
}

/// The relation lists reachable under `/characters/{id}/...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Comics,
    Events,
    Series,
    Stories,
}

impl Relation {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "comics" => Some(Relation::Comics),
            "events" => Some(Relation::Events),
            "series" => Some(Relation::Series),
            "stories" => Some(Relation::Stories),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Comics => "comics",
            Relation::Events => "events",
            Relation::Series => "series",
            Relation::Stories => "stories",
        }
    }

    /// How many related items character `id` has.
    pub fn total(self, id: u64) -> u64 {
        match self {
            Relation::Comics => id % 50 + 1,
            Relation::Events => id % 7,
            Relation::Series => id % 20 + 1,
            Relation::Stories => id % 60 + 2,
        }
    }
}

/// One comic, event, series or story. Only the fields that differ between
/// kinds are optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Related {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(rename = "resourceURI")]
    pub resource_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

pub fn characters() -> Vec<Character> {
    let known = KNOWN.iter().map(|&(id, name)| (id, name.to_string()));
    let agents = (1..=(CATALOG_SIZE - KNOWN.len()) as u64).map(|n| (1_012_000 + n, format!("Agent {n:03}")));

    known
        .chain(agents)
        .enumerate()
        .map(|(i, (id, name))| Character {
            id,
            description: format!("{name} is character number {} in the mock catalog.", i + 1),
            modified: format!("2014-{:02}-{:02}T12:00:00-0400", i % 12 + 1, i % 28 + 1),
            resource_uri: format!("{RESOURCE_ROOT}/characters/{id}"),
            thumbnail: Image {
                path: format!("http://i.annihil.us/u/prod/marvel/i/mg/mock/{id}"),
                extension: "jpg".to_string(),
            },
            comics: Available { available: Relation::Comics.total(id) },
            events: Available { available: Relation::Events.total(id) },
            series: Available { available: Relation::Series.total(id) },
            stories: Available { available: Relation::Stories.total(id) },
            name,
        })
        .collect()
}

/// All items of `relation` for `character`, in id order.
pub fn related(character: &Character, relation: Relation) -> Vec<Related> {
    (0..relation.total(character.id))
        .map(|n| {
            let id = character.id * 1000 + n;
            let title = match relation {
                Relation::Comics => format!("{} ({}) #{}", character.name, 2000 + n % 20, n + 1),
                Relation::Events => format!("{} Event {}", character.name, n + 1),
                Relation::Series => format!("{} ({} - {})", character.name, 1990 + n, 1995 + n),
                Relation::Stories => format!("Story {} of {}", n + 1, character.name),
            };
            Related {
                id,
                title,
                description: String::new(),
                resource_uri: format!("{RESOURCE_ROOT}/{}/{id}", relation.as_str()),
                issue_number: (relation == Relation::Comics).then(|| (n + 1) as f64),
                start: (relation == Relation::Events).then(|| format!("{}-01-01 00:00:00", 2005 + n)),
                start_year: (relation == Relation::Series).then(|| 1990 + n as i32),
                kind: (relation == Relation::Stories).then(|| "cover".to_string()),
            }
        })
        .collect()
}
