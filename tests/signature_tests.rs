//! Tests for the signature record store adapter

use serde_json::json;
use training_docs_sdk::models::{DocumentType, SignatureType};
use training_docs_sdk::signatures::{AssetSource, NewSignature, SignatureQuery, SignatureStore};
use training_docs_sdk::store::{sets, Filter, MemoryAssets, MemoryStore, RecordStore};

fn query(
    training_id: &str,
    user_id: Option<&str>,
    document_type: DocumentType,
    signature_type: SignatureType,
) -> SignatureQuery {
    SignatureQuery {
        training_id: training_id.to_string(),
        user_id: user_id.map(str::to_string),
        document_type,
        signature_type,
    }
}

#[tokio::test]
async fn test_save_uploads_under_canonical_name_and_find_returns_it() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    let store = SignatureStore::new(&records, &assets);

    let saved = store
        .save(NewSignature {
            training_id: "t-1".to_string(),
            user_id: Some("u-1".to_string()),
            company_id: None,
            document_type: DocumentType::Convention,
            signature_type: SignatureType::Participant,
            asset: AssetSource::Bytes { bytes: vec![1, 2, 3], extension: "png".to_string() },
        })
        .await
        .unwrap();
    assert!(saved.url.ends_with("participant_convention_t-1_u-1.png"));

    let found = store
        .find(&query("t-1", Some("u-1"), DocumentType::Convention, SignatureType::Participant))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, saved.id);
    assert_eq!(found.url, saved.url);
}

#[tokio::test]
async fn test_save_upserts_on_the_identity_tuple() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    let store = SignatureStore::new(&records, &assets);

    let new = |bytes: Vec<u8>| NewSignature {
        training_id: "t-1".to_string(),
        user_id: Some("u-1".to_string()),
        company_id: None,
        document_type: DocumentType::Attestation,
        signature_type: SignatureType::Participant,
        asset: AssetSource::Bytes { bytes, extension: "png".to_string() },
    };
    let first = store.save(new(vec![1])).await.unwrap();
    let second = store.save(new(vec![2])).await.unwrap();
    assert_eq!(first.id, second.id);

    let rows = records.select(sets::DOCUMENT_SIGNATURES, &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_delete_reports_presence() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    let store = SignatureStore::new(&records, &assets);

    let q = query("t-1", None, DocumentType::Certificate, SignatureType::Trainer);
    assert!(!store.delete(&q).await.unwrap());

    store
        .save(NewSignature {
            training_id: "t-1".to_string(),
            user_id: None,
            company_id: None,
            document_type: DocumentType::Certificate,
            signature_type: SignatureType::Trainer,
            asset: AssetSource::ExistingUrl("https://cdn/trainer.png".to_string()),
        })
        .await
        .unwrap();
    assert!(store.delete(&q).await.unwrap());
    assert!(store.find(&q).await.unwrap().is_none());
}

async fn seed_participants(records: &MemoryStore) {
    for (id, company) in [("u-a", "c-1"), ("u-b", "c-1"), ("u-c", "c-2"), ("u-d", "c-1")] {
        records
            .insert(
                sets::PARTICIPANTS,
                json!({
                    "id": id,
                    "first_name": id.to_uppercase(),
                    "last_name": "Test",
                    "training_id": "t-1",
                    "company_id": company
                }),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_representative_sharing_fans_out_to_company_siblings() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    let store = SignatureStore::new(&records, &assets);
    seed_participants(&records).await;

    store
        .save(NewSignature {
            training_id: "t-1".to_string(),
            user_id: Some("u-a".to_string()),
            company_id: Some("c-1".to_string()),
            document_type: DocumentType::Convention,
            signature_type: SignatureType::Representative,
            asset: AssetSource::Bytes { bytes: vec![9], extension: "png".to_string() },
        })
        .await
        .unwrap();

    let written = store
        .share_representative_signature("t-1", "u-a", "c-1")
        .await
        .unwrap();
    // u-b and u-d share the company; u-c does not.
    assert_eq!(written, 2);

    for sibling in ["u-b", "u-d"] {
        let shared = store
            .find(&query(
                "t-1",
                Some(sibling),
                DocumentType::Convention,
                SignatureType::Representative,
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shared.shared_from_user_id.as_deref(), Some("u-a"));
    }
    assert!(store
        .find(&query("t-1", Some("u-c"), DocumentType::Convention, SignatureType::Representative))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_representative_sharing_is_idempotent() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    let store = SignatureStore::new(&records, &assets);
    seed_participants(&records).await;

    store
        .save(NewSignature {
            training_id: "t-1".to_string(),
            user_id: Some("u-a".to_string()),
            company_id: Some("c-1".to_string()),
            document_type: DocumentType::Convention,
            signature_type: SignatureType::Representative,
            asset: AssetSource::Bytes { bytes: vec![9], extension: "png".to_string() },
        })
        .await
        .unwrap();

    store.share_representative_signature("t-1", "u-a", "c-1").await.unwrap();
    let before = records.select(sets::DOCUMENT_SIGNATURES, &[]).await.unwrap().len();
    store.share_representative_signature("t-1", "u-a", "c-1").await.unwrap();
    let after = records.select(sets::DOCUMENT_SIGNATURES, &[]).await.unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_purge_for_duplicate_keeps_the_organization_seal() {
    let records = MemoryStore::new();
    let assets = MemoryAssets::new();
    let store = SignatureStore::new(&records, &assets);

    for (sig, user) in [
        (SignatureType::Participant, Some("u-1")),
        (SignatureType::Trainer, None),
        (SignatureType::OrganizationSeal, None),
    ] {
        store
            .save(NewSignature {
                training_id: "t-1".to_string(),
                user_id: user.map(str::to_string),
                company_id: None,
                document_type: DocumentType::Convention,
                signature_type: sig,
                asset: AssetSource::ExistingUrl(format!("https://cdn/{}.png", sig.as_str())),
            })
            .await
            .unwrap();
    }

    let removed = store.purge_for_duplicate("t-1").await.unwrap();
    assert_eq!(removed, 2);

    let remaining = records
        .select(
            sets::DOCUMENT_SIGNATURES,
            &[Filter::eq("training_id", "t-1")],
        )
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["signature_type"], "organizationSeal");
}
