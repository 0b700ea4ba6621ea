use std::collections::HashSet;

use serde::Deserialize;

use super::model::{Dataset, Entity, Relation};

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawRecord {
    Entity(Entity),
    Relation(Relation),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub entities: usize,
    pub relations: usize,
    pub skipped_lines: usize,
    pub duplicate_entities: usize,
}

pub fn parse_json_lines(raw: &str) -> (Dataset, ParseReport) {
    let mut entities = Vec::new();
    let mut relations = Vec::new();
    let mut report = ParseReport::default();
    let mut seen = HashSet::new();

    for (line_number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RawRecord>(line) {
            Ok(RawRecord::Entity(entity)) => {
                if !seen.insert(entity.name.clone()) {
                    tracing::warn!(
                        line = line_number + 1,
                        name = %entity.name,
                        "duplicate entity name, keeping the first record"
                    );
                    report.duplicate_entities += 1;
                    continue;
                }
                entities.push(entity);
            }
            Ok(RawRecord::Relation(relation)) => relations.push(relation),
            Err(error) => {
                tracing::debug!(line = line_number + 1, %error, "skipping unparsable line");
                report.skipped_lines += 1;
            }
        }
    }

    report.entities = entities.len();
    report.relations = relations.len();
    (Dataset::new(entities, relations), report)
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    const SAMPLE: &str = r#"
{"type":"entity","name":"Alice","entityType":"Person","observations":["likes cats"]}
{"type":"entity","name":"Bob","entityType":"Person","observations":[]}
{"type":"relation","from":"Alice","to":"Bob","relationType":"knows"}
not json at all
{"type":"widget","name":"?"}
{"type":"entity","name":"Alice","entityType":"Robot","observations":[]}
"#;

    #[test]
    #[traced_test]
    fn skips_bad_lines_and_keeps_first_duplicate() {
        let (dataset, report) = parse_json_lines(SAMPLE);

        assert_eq!(
            report,
            ParseReport {
                entities: 2,
                relations: 1,
                skipped_lines: 2,
                duplicate_entities: 1,
            }
        );
        assert_eq!(dataset.entities[0].entity_type, "Person");
        assert_eq!(dataset.relations[0].relation_type, "knows");
        assert!(logs_contain("skipping unparsable line"));
        assert!(logs_contain("duplicate entity name"));
    }

    #[test]
    fn missing_observations_default_to_empty() {
        let (dataset, report) =
            parse_json_lines(r#"{"type":"entity","name":"Solo","entityType":"Thing"}"#);
        assert_eq!(report.skipped_lines, 0);
        assert!(dataset.entities[0].observations.is_empty());
    }
}
