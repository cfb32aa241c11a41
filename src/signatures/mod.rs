//! Signature record store adapter
//!
//! All reads and writes of signature records go through [`SignatureStore`],
//! which enforces the canonical table shape and the asset naming scheme.
//! The identity of a signature is the tuple (training, signature type,
//! document type, user); saving over an existing identity overwrites it in
//! place. Uniqueness is advisory: the adapter checks before inserting, the
//! backing store does not enforce it.
//!
//! Submodules carry the legacy-table vocabulary and the two maintenance
//! engines built on top of this adapter.

pub mod diagnostic;
pub mod legacy;
pub mod migration;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    canonical_asset_name, DecodeError, DocumentType, Participant, SignatureRecord, SignatureType,
};
use crate::store::{sets, AssetStore, Filter, RecordStore, StoreError};

/// Error from the signature adapter or the engines built on it
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid signature: {0}")]
    Invalid(String),
}

/// Identity of one signature record.
#[derive(Debug, Clone)]
pub struct SignatureQuery {
    pub training_id: String,
    pub user_id: Option<String>,
    pub document_type: DocumentType,
    pub signature_type: SignatureType,
}

/// Where the signature image comes from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Raw image bytes to store under the canonical name.
    Bytes { bytes: Vec<u8>, extension: String },
    /// An image already in the asset store, referenced as-is.
    ExistingUrl(String),
}

/// A signature to save.
#[derive(Debug, Clone)]
pub struct NewSignature {
    pub training_id: String,
    pub user_id: Option<String>,
    pub company_id: Option<String>,
    pub document_type: DocumentType,
    pub signature_type: SignatureType,
    pub asset: AssetSource,
}

/// Adapter over the canonical `document_signatures` set and the asset bucket.
pub struct SignatureStore<'a, R: RecordStore + ?Sized, A: AssetStore + ?Sized> {
    records: &'a R,
    assets: &'a A,
}

impl<'a, R: RecordStore + ?Sized, A: AssetStore + ?Sized> SignatureStore<'a, R, A> {
    pub fn new(records: &'a R, assets: &'a A) -> Self {
        SignatureStore { records, assets }
    }

    fn identity_filters(query: &SignatureQuery) -> Vec<Filter> {
        let mut filters = vec![
            Filter::eq("training_id", query.training_id.as_str()),
            Filter::eq("signature_type", query.signature_type.as_str()),
            Filter::eq("document_type", query.document_type.as_str()),
        ];
        match &query.user_id {
            Some(user) => filters.push(Filter::eq("user_id", user.as_str())),
            None => filters.push(Filter::is_null("user_id")),
        }
        filters
    }

    /// Look up the canonical record for an identity tuple.
    pub async fn find(
        &self,
        query: &SignatureQuery,
    ) -> Result<Option<SignatureRecord>, SignatureError> {
        let rows = self
            .records
            .select(sets::DOCUMENT_SIGNATURES, &Self::identity_filters(query))
            .await?;
        rows.first()
            .map(SignatureRecord::from_record)
            .transpose()
            .map_err(SignatureError::from)
    }

    /// Store a signature, uploading the asset under its canonical name and
    /// upserting the record on the identity tuple.
    pub async fn save(&self, new: NewSignature) -> Result<SignatureRecord, SignatureError> {
        let url = match &new.asset {
            AssetSource::Bytes { bytes, extension } => {
                let name = canonical_asset_name(
                    new.signature_type,
                    new.document_type,
                    &new.training_id,
                    new.user_id.as_deref(),
                    extension,
                );
                self.assets.upload(&name, bytes.clone(), true).await?;
                self.assets.public_url(&name)
            }
            AssetSource::ExistingUrl(url) => url.clone(),
        };

        let query = SignatureQuery {
            training_id: new.training_id.clone(),
            user_id: new.user_id.clone(),
            document_type: new.document_type,
            signature_type: new.signature_type,
        };
        if let Some(existing) = self.find(&query).await? {
            let updated = self
                .records
                .update(
                    sets::DOCUMENT_SIGNATURES,
                    &existing.id,
                    json!({ "url": url, "company_id": new.company_id }),
                )
                .await?;
            return SignatureRecord::from_record(&updated).map_err(SignatureError::from);
        }

        let record = SignatureRecord {
            id: Uuid::new_v4().to_string(),
            training_id: new.training_id,
            user_id: new.user_id,
            company_id: new.company_id,
            document_type: new.document_type,
            signature_type: new.signature_type,
            url,
            shared_from_user_id: None,
            migrated_from: None,
            inferred: false,
            created_at: Some(Utc::now().to_rfc3339()),
        };
        let value =
            serde_json::to_value(&record).map_err(|e| DecodeError::Invalid(e.to_string()))?;
        let stored = self.records.insert(sets::DOCUMENT_SIGNATURES, value).await?;
        SignatureRecord::from_record(&stored).map_err(SignatureError::from)
    }

    /// Delete the record for an identity tuple. Returns false when there was
    /// none. The stored asset is kept.
    pub async fn delete(&self, query: &SignatureQuery) -> Result<bool, SignatureError> {
        match self.find(query).await? {
            Some(record) => Ok(self
                .records
                .delete(sets::DOCUMENT_SIGNATURES, &record.id)
                .await?),
            None => Ok(false),
        }
    }

    /// Propagate a representative's signatures to every other participant of
    /// the same company on the same training. Overwrites in place on re-run,
    /// never duplicates. Returns the number of records written.
    pub async fn share_representative_signature(
        &self,
        training_id: &str,
        user_id: &str,
        company_id: &str,
    ) -> Result<usize, SignatureError> {
        let siblings = self
            .records
            .select(
                sets::PARTICIPANTS,
                &[
                    Filter::eq("training_id", training_id),
                    Filter::eq("company_id", company_id),
                ],
            )
            .await?
            .iter()
            .map(Participant::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = 0;
        for document_type in DocumentType::ALL {
            let source = self
                .find(&SignatureQuery {
                    training_id: training_id.to_string(),
                    user_id: Some(user_id.to_string()),
                    document_type,
                    signature_type: SignatureType::Representative,
                })
                .await?;
            let Some(source) = source else { continue };

            for sibling in siblings.iter().filter(|p| p.id != user_id) {
                let query = SignatureQuery {
                    training_id: training_id.to_string(),
                    user_id: Some(sibling.id.clone()),
                    document_type,
                    signature_type: SignatureType::Representative,
                };
                if let Some(existing) = self.find(&query).await? {
                    self.records
                        .update(
                            sets::DOCUMENT_SIGNATURES,
                            &existing.id,
                            json!({
                                "url": source.url,
                                "shared_from_user_id": user_id,
                            }),
                        )
                        .await?;
                } else {
                    let record = SignatureRecord {
                        id: Uuid::new_v4().to_string(),
                        training_id: training_id.to_string(),
                        user_id: Some(sibling.id.clone()),
                        company_id: Some(company_id.to_string()),
                        document_type,
                        signature_type: SignatureType::Representative,
                        url: source.url.clone(),
                        shared_from_user_id: Some(user_id.to_string()),
                        migrated_from: None,
                        inferred: false,
                        created_at: Some(Utc::now().to_rfc3339()),
                    };
                    let value = serde_json::to_value(&record)
                        .map_err(|e| DecodeError::Invalid(e.to_string()))?;
                    self.records.insert(sets::DOCUMENT_SIGNATURES, value).await?;
                }
                written += 1;
            }
        }
        info!(training_id, user_id, written, "representative signature shared");
        Ok(written)
    }

    /// Remove every signature of a duplicated training except the
    /// organization seal, which is organization-wide and stays valid.
    pub async fn purge_for_duplicate(&self, training_id: &str) -> Result<usize, SignatureError> {
        let rows = self
            .records
            .select(
                sets::DOCUMENT_SIGNATURES,
                &[Filter::eq("training_id", training_id)],
            )
            .await?;
        let mut removed = 0;
        for row in &rows {
            let record = SignatureRecord::from_record(row)?;
            if record.signature_type == SignatureType::OrganizationSeal {
                continue;
            }
            if self
                .records
                .delete(sets::DOCUMENT_SIGNATURES, &record.id)
                .await?
            {
                removed += 1;
            }
        }
        info!(training_id, removed, "signatures purged for duplicated training");
        Ok(removed)
    }
}
