//! Catalog document and request serialisation tests.
//!
//! Run with: `cargo test --features serde`

#![cfg(feature = "serde")]

use ident_core::record::{CatalogDocument, CATALOG_DOCUMENT_VERSION};
use ident_core::{
    identify, ConstraintMap, EntityId, Error, IdentifyConfig, IdentifyRequest, SessionState,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

const CATALOG_JSON: &str = r#"{
    "version": 1,
    "columns": ["plumage_colour", "size", "habitat"],
    "entities": [
        { "id": 1, "name": "Robin",
          "attributes": { "plumage_colour": "Brown, Red", "size": "small", "habitat": null },
          "details": { "latin_name": "Erithacus rubecula" } },
        { "id": 2, "name": "Heron",
          "attributes": { "plumage_colour": "grey, white", "size": "large", "habitat": "wetland" } },
        { "id": 3, "name": "Wren" }
    ]
}"#;

fn document() -> CatalogDocument {
    serde_json::from_str(CATALOG_JSON).expect("catalog document parses")
}

// ─── catalog documents ───────────────────────────────────────────────────────

#[test]
fn test_document_builds_normalised_catalog() {
    let catalog = document().into_catalog().expect("valid document");
    assert_eq!(catalog.len(), 3);
    let robin = catalog.get(EntityId(1)).unwrap();
    assert_eq!(catalog.value(robin, "plumage_colour").unwrap().as_str(), "brown, red");
    assert!(catalog.value(robin, "habitat").is_none());
    assert_eq!(robin.details()["latin_name"], "Erithacus rubecula");
    assert!(catalog.value(catalog.get(EntityId(3)).unwrap(), "size").is_none());
}

#[test]
fn test_document_survives_catalog_round_trip() {
    let catalog = document().into_catalog().unwrap();
    let captured = CatalogDocument::from_catalog(&catalog);
    assert_eq!(captured.version, CATALOG_DOCUMENT_VERSION);
    assert_eq!(captured.entity_count(), 3);

    let json = serde_json::to_string(&captured).unwrap();
    let restored: CatalogDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, captured);

    let rebuilt = restored.into_catalog().unwrap();
    assert_eq!(rebuilt.entities(), catalog.entities());
}

#[test]
fn test_unknown_version_rejected() {
    let mut doc = document();
    doc.version = 9;
    assert_eq!(doc.into_catalog().unwrap_err(), Error::UnsupportedVersion(9));
}

#[test]
fn test_attribute_outside_columns_rejected() {
    let json = r#"{ "columns": ["size"],
        "entities": [ { "id": 1, "name": "Robin", "attributes": { "call": "tick" } } ] }"#;
    let doc: CatalogDocument = serde_json::from_str(json).unwrap();
    assert!(matches!(doc.into_catalog(), Err(Error::UnknownAttribute { .. })));
}

#[test]
fn test_duplicate_columns_rejected() {
    let json = r#"{ "columns": ["size", "size"], "entities": [] }"#;
    let doc: CatalogDocument = serde_json::from_str(json).unwrap();
    assert_eq!(doc.into_catalog().unwrap_err(), Error::DuplicateAttribute("size".into()));
}

// ─── constraint maps ─────────────────────────────────────────────────────────

#[test]
fn test_constraints_accept_string_list_and_null() {
    let json = r#"{
        "plumage_colour": "Grey, white",
        "size": ["large"],
        "habitat": null,
        "new_attribute": { "neck": "long", "legs": ["long", "thin"] }
    }"#;
    let constraints: ConstraintMap = serde_json::from_str(json).unwrap();

    assert_eq!(constraints.get("plumage_colour").unwrap().to_vec(), vec!["grey", "white"]);
    assert_eq!(constraints.get("size").unwrap().to_vec(), vec!["large"]);
    assert!(constraints.get("habitat").unwrap().is_empty());
    assert!(constraints.used_attributes().contains("habitat"));
    assert!(constraints.get("new_attribute").is_none());
    assert_eq!(constraints.notes()["legs"].len(), 2);
}

#[test]
fn test_constraints_serialise_notes_under_reserved_key() {
    let mut constraints = ConstraintMap::new().with("size", "small");
    constraints.note("crest", "pointed");
    let value = serde_json::to_value(&constraints).unwrap();
    assert_eq!(value["size"], serde_json::json!(["small"]));
    assert_eq!(value["new_attribute"]["crest"], serde_json::json!(["pointed"]));

    let back: ConstraintMap = serde_json::from_value(value).unwrap();
    assert_eq!(back, constraints);
}

// ─── requests and results ────────────────────────────────────────────────────

#[test]
fn test_request_round_trip_and_run() {
    let catalog = document().into_catalog().unwrap();
    let config = IdentifyConfig {
        attributes: catalog.columns().clone(),
        ..IdentifyConfig::default()
    };
    let json = r#"{ "constraints": { "size": "large", "plumage_colour": "grey" }, "target": 1 }"#;
    let request: IdentifyRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.target, Some(EntityId(1)));

    let result = request.run(&catalog, &config);
    assert_eq!(result.state(), SessionState::Terminal);
    let discrepancies = result.discrepancies.as_ref().expect("robin filtered out");
    assert_eq!(discrepancies.len(), 2);

    let encoded = serde_json::to_value(&result).unwrap();
    assert!(encoded["question"].is_null());
    assert_eq!(encoded["matches"][0]["name"], "Heron");
    assert_eq!(encoded["matches"][0]["match_percentage"], 100.0);
    assert_eq!(
        identify(&catalog, &request.constraints, &config, request.target),
        result
    );
}

#[test]
fn test_config_fills_missing_fields_with_defaults() {
    let config: IdentifyConfig = serde_json::from_str(r#"{ "match_limit": 3 }"#).unwrap();
    assert_eq!(config.match_limit, 3);
    assert_eq!(config.candidate_threshold, 2);
    assert_eq!(config.attributes.len(), 9);

    let bad = serde_json::from_str::<IdentifyConfig>(r#"{ "attributes": ["size", "size"] }"#);
    assert!(bad.is_err());
}
