use std::collections::HashMap;

use crate::dataset::{Dataset, Entity, Relation};

use super::{Link, Node, node_radius};

pub const ALL_TYPES: &str = "All";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL_TYPES {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_TYPES,
            Self::Only(value) => value,
        }
    }

    fn admits(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub search_term: String,
    pub entity_type: TypeFilter,
    pub relation_type: TypeFilter,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterResult {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

fn entity_survives(entity: &Entity, needle: Option<&str>, entity_type: &TypeFilter) -> bool {
    if let Some(needle) = needle
        && !entity.matches_lowercase(needle)
    {
        return false;
    }
    entity_type.admits(&entity.entity_type)
}

fn resolve_link(
    relation: &Relation,
    index_by_id: &HashMap<&str, usize>,
    relation_type: &TypeFilter,
) -> Option<Link> {
    // Both endpoints must be in the surviving set; this is what drops
    // dangling and filtered-out relations.
    let source = *index_by_id.get(relation.from.as_str())?;
    let target = *index_by_id.get(relation.to.as_str())?;
    if !relation_type.admits(&relation.relation_type) {
        return None;
    }

    Some(Link {
        source,
        target,
        relation_type: relation.relation_type.clone(),
    })
}

pub fn filter(dataset: &Dataset, query: &Query) -> FilterResult {
    let needle = query.search_term.to_lowercase();
    let needle = (!needle.is_empty()).then_some(needle.as_str());

    let mut nodes = dataset
        .entities
        .iter()
        .filter(|entity| entity_survives(entity, needle, &query.entity_type))
        .map(|entity| Node::fresh(entity.name.clone(), entity.entity_type.clone()))
        .collect::<Vec<_>>();

    let index_by_id = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect::<HashMap<_, _>>();

    let links = dataset
        .relations
        .iter()
        .filter_map(|relation| resolve_link(relation, &index_by_id, &query.relation_type))
        .collect::<Vec<_>>();

    for link in &links {
        nodes[link.source].degree += 1;
        nodes[link.target].degree += 1;
    }

    let min_degree = nodes.iter().map(|node| node.degree).min().unwrap_or(0);
    let max_degree = nodes.iter().map(|node| node.degree).max().unwrap_or(0);
    for node in &mut nodes {
        node.radius = node_radius(node.degree, min_degree, max_degree);
    }

    FilterResult { nodes, links }
}
