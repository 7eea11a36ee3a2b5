//! Play one scripted game of twenty questions against a small bird catalog.
//!
//! The "user" knows a secret bird and answers each question with that bird's
//! stored value, or shrugs when the catalog has nothing on record.
//!
//! ```bash
//! RUST_LOG=ident_core=trace cargo run --example twenty_questions --features serde
//! ```

use ident_core::birds::{HABITAT, PLUMAGE_COLOUR, SIZE, TAIL_SHAPE};
use ident_core::record::CatalogDocument;
use ident_core::{identify, ConstraintMap, EntityId, IdentifyConfig};
use tracing_subscriber::EnvFilter;

const BIRDS: &str = r#"{
    "version": 1,
    "columns": ["plumage_colour", "beak_colour", "feet_colour", "leg_colour",
                "beak_shape_1", "tail_shape_1", "size", "habitat", "pattern_markings"],
    "entities": [
        { "id": 1, "name": "Robin",
          "attributes": { "plumage_colour": "brown, red", "beak_colour": "black", "size": "small",
                          "habitat": "gardens, woodland", "tail_shape_1": "square" },
          "details": { "latin_name": "Erithacus rubecula" } },
        { "id": 2, "name": "Blackbird",
          "attributes": { "plumage_colour": "black", "beak_colour": "yellow", "size": "medium",
                          "habitat": "gardens, woodland", "tail_shape_1": "rounded" } },
        { "id": 3, "name": "Magpie",
          "attributes": { "plumage_colour": "black, white", "beak_colour": "black", "size": "large",
                          "habitat": "gardens, farmland", "tail_shape_1": "graduated" } },
        { "id": 4, "name": "Blue Tit",
          "attributes": { "plumage_colour": "blue, yellow", "beak_colour": "black", "size": "small",
                          "habitat": "gardens, woodland", "pattern_markings": "white cheeks" } },
        { "id": 5, "name": "Swallow",
          "attributes": { "plumage_colour": "blue, red, white", "size": "small",
                          "habitat": "farmland", "tail_shape_1": "forked" } },
        { "id": 6, "name": "Heron",
          "attributes": { "plumage_colour": "grey, white", "beak_colour": "yellow", "size": "large",
                          "habitat": "wetland", "leg_colour": "yellow" } }
    ]
}"#;

const SECRET: EntityId = EntityId(5);
const MAX_TURNS: usize = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document: CatalogDocument = serde_json::from_str(BIRDS)?;
    println!("loaded {} birds", document.entity_count());
    let catalog = document.into_catalog()?;
    let secret = catalog.get(SECRET).ok_or("secret bird missing from catalog")?;

    println!("vocabulary:");
    for (attribute, words) in catalog.vocabulary(&IdentifyConfig::default().attributes) {
        if [PLUMAGE_COLOUR, SIZE, HABITAT, TAIL_SHAPE].contains(&attribute.as_str()) {
            println!("  {attribute:<16} {}", words.join(" | "));
        }
    }

    let config = IdentifyConfig::default();
    let mut constraints = ConstraintMap::new();

    for turn in 1..=MAX_TURNS {
        let result = identify(&catalog, &constraints, &config, Some(SECRET));

        if let Some(found) = &result.discrepancies {
            for d in found {
                println!("  (you said {:?} for {}, it is {})", d.requested, d.attribute, d.actual);
            }
        }

        let Some(question) = result.question else {
            println!("\nafter {} turn(s), {} candidate(s) left:", turn - 1, result.candidate_count);
            for m in result.matches.unwrap_or_default() {
                println!("  {:>5.1}%  {}", m.match_percentage, m.name);
            }
            return Ok(());
        };

        let answer = catalog
            .value(secret, &question)
            .map(|value| value.token_set())
            .unwrap_or_default();
        println!(
            "Q{turn}: what is its {question}?  A: {}",
            if answer.is_empty() { "no idea".to_string() } else { answer.to_vec().join(", ") }
        );

        let extracted = if answer.is_empty() {
            ConstraintMap::new()
        } else {
            ConstraintMap::new().with(question.as_str(), answer)
        };
        constraints = constraints.fold_answer(&extracted, Some(question.as_str()));
    }

    println!("gave up after {MAX_TURNS} questions");
    Ok(())
}
