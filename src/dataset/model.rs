use std::collections::BTreeSet;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "entityType")]
    pub entity_type: String,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl Entity {
    /// Case-insensitive substring match over name, type and observations.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.entity_type.to_lowercase().contains(needle)
            || self
                .observations
                .iter()
                .any(|observation| observation.to_lowercase().contains(needle))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    #[serde(rename = "relationType")]
    pub relation_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

impl Dataset {
    pub fn new(entities: Vec<Entity>, relations: Vec<Relation>) -> Self {
        Self {
            entities,
            relations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }

    pub fn entity_types(&self) -> Vec<String> {
        self.entities
            .iter()
            .map(|entity| entity.entity_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn relation_types(&self) -> Vec<String> {
        self.relations
            .iter()
            .map(|relation| relation.relation_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{entity, people};

    #[test]
    fn type_lists_are_sorted_and_distinct() {
        let dataset = people();
        assert_eq!(dataset.entity_types(), vec!["Company", "Person"]);
        assert_eq!(dataset.relation_types(), vec!["knows", "works_at"]);
    }

    #[test]
    fn matching_covers_every_text_field() {
        let alice = entity("Alice", "Person", &["Likes Cats"]);
        assert!(alice.matches_lowercase("ali"));
        assert!(alice.matches_lowercase("person"));
        assert!(alice.matches_lowercase("cats"));
        assert!(!alice.matches_lowercase("dogs"));
    }
}
