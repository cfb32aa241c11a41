//! Tests for the signature diagnostic engine

use serde_json::json;
use training_docs_sdk::signatures::diagnostic::DiagnosticEngine;
use training_docs_sdk::store::{sets, AssetStore, MemoryAssets, MemoryStore, RecordStore};

async fn seed_training(records: &MemoryStore, id: &str) {
    records
        .insert(sets::TRAININGS, json!({"id": id, "title": "Rust"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_trainer_row_without_user_gets_created_by_fix() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    seed_training(&records, "t-1").await;
    records
        .insert(
            sets::DOCUMENTS,
            json!({
                "id": "d-1",
                "title": "Signature du formateur",
                "training_id": "t-1",
                "url": "https://cdn/sig.png",
                "created_by": "u-9"
            }),
        )
        .await
        .unwrap();

    let engine = DiagnosticEngine::new(&records, &assets);
    let report = engine.diagnose_documents_table().await.unwrap();

    assert_eq!(report.scanned, 1);
    // Trainer rows are structurally allowed to lack a user id.
    assert_eq!(report.missing_user_ids, 0);
    let fix = report
        .suggested_fixes
        .iter()
        .find(|f| f.record_id == "d-1")
        .expect("a user_id fix");
    assert_eq!(fix.field, "user_id");
    assert_eq!(fix.proposed, "u-9");
    assert!(!fix.inferred, "created_by is a certain source");
}

#[tokio::test]
async fn test_participant_fallback_is_flagged_inferred() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    seed_training(&records, "t-1").await;
    records
        .insert(
            sets::PARTICIPANTS,
            json!({"id": "u-1", "first_name": "Marie", "last_name": "Durand", "training_id": "t-1"}),
        )
        .await
        .unwrap();
    records
        .insert(
            sets::DOCUMENTS,
            json!({
                "id": "d-2",
                "title": "Signature du participant",
                "training_id": "t-1",
                "url": "https://cdn/sig.png"
            }),
        )
        .await
        .unwrap();

    let engine = DiagnosticEngine::new(&records, &assets);
    let report = engine.diagnose_documents_table().await.unwrap();

    assert_eq!(report.missing_user_ids, 1);
    let fix = report.suggested_fixes.iter().find(|f| f.record_id == "d-2").unwrap();
    assert_eq!(fix.proposed, "u-1");
    assert!(fix.inferred);
}

#[tokio::test]
async fn test_unmappable_title_suggests_type_from_url() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    records
        .insert(
            sets::DOCUMENTS,
            json!({
                "id": "d-3",
                "title": "Signature",
                "training_id": "t-1",
                "url": "https://cdn/bucket/trainer_convention_t-1.png"
            }),
        )
        .await
        .unwrap();

    let engine = DiagnosticEngine::new(&records, &assets);
    let report = engine.diagnose_documents_table().await.unwrap();

    assert_eq!(report.type_inconsistencies, 1);
    let fix = report.suggested_fixes.iter().find(|f| f.record_id == "d-3").unwrap();
    assert_eq!(fix.field, "title");
    assert_eq!(fix.proposed, "Signature du formateur");
    assert!(fix.inferred);
}

#[tokio::test]
async fn test_apply_fixes_updates_records() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    seed_training(&records, "t-1").await;
    records
        .insert(
            sets::DOCUMENTS,
            json!({
                "id": "d-1",
                "title": "Signature du formateur",
                "training_id": "t-1",
                "url": "https://cdn/sig.png",
                "created_by": "u-9"
            }),
        )
        .await
        .unwrap();

    let engine = DiagnosticEngine::new(&records, &assets);
    let report = engine.diagnose_documents_table().await.unwrap();
    let fixes = engine.apply_fixes(&report).await.unwrap();
    assert_eq!(fixes.applied, 1);
    assert_eq!(fixes.failed, 0);

    let rows = records.select(sets::DOCUMENTS, &[]).await.unwrap();
    assert_eq!(rows[0]["user_id"], "u-9");
}

#[tokio::test]
async fn test_missing_trainer_signatures_checks_all_three_sources() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    seed_training(&records, "t-legacy").await;
    seed_training(&records, "t-canonical").await;
    seed_training(&records, "t-asset").await;
    seed_training(&records, "t-missing").await;

    records
        .insert(
            sets::DOCUMENTS,
            json!({"id": "d-1", "title": "Signature du formateur", "training_id": "t-legacy"}),
        )
        .await
        .unwrap();
    records
        .insert(
            sets::DOCUMENT_SIGNATURES,
            json!({
                "id": "s-1",
                "training_id": "t-canonical",
                "signature_type": "trainer",
                "document_type": "convention",
                "url": "https://cdn/x.png"
            }),
        )
        .await
        .unwrap();
    assets
        .upload("trainer_convention_t-asset.png", vec![1], false)
        .await
        .unwrap();

    let engine = DiagnosticEngine::new(&records, &assets);
    let missing = engine.find_missing_trainer_signatures().await.unwrap();
    let ids: Vec<&str> = missing.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-missing"]);
}
