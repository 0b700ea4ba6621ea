use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::Generation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub entity_type: String,
    pub score: i64,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

pub(super) fn rank_suggestions(
    generation: &Generation,
    term: &str,
    limit: usize,
) -> Vec<Suggestion> {
    let term = term.trim();
    if term.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked = generation
        .nodes
        .iter()
        .filter_map(|node| {
            fuzzy_match_score(&matcher, &node.id, term).map(|score| Suggestion {
                id: node.id.clone(),
                entity_type: node.entity_type.clone(),
                score,
            })
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::dataset::fixtures::entity;
    use crate::graph::{Query, filter};

    fn generation(names: &[&str]) -> Generation {
        let dataset = Dataset::new(
            names
                .iter()
                .map(|name| entity(name, "Thing", &[]))
                .collect(),
            Vec::new(),
        );
        Generation::new(1, filter(&dataset, &Query::default()))
    }

    #[test]
    fn exact_prefix_outranks_scattered_match() {
        let generation = generation(&["graph_store", "gamma_ray_pulse", "unrelated"]);
        let ranked = rank_suggestions(&generation, "graph", 10);

        assert_eq!(ranked[0].id, "graph_store");
        assert!(ranked.iter().all(|suggestion| suggestion.id != "unrelated"));
    }

    #[test]
    fn blank_term_or_zero_limit_yields_nothing() {
        let generation = generation(&["alpha", "beta"]);
        assert!(rank_suggestions(&generation, "   ", 5).is_empty());
        assert!(rank_suggestions(&generation, "a", 0).is_empty());
        assert_eq!(rank_suggestions(&generation, "a", 1).len(), 1);
    }
}
