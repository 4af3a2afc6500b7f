use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use podium_types::models::Document;

use crate::error::{Result, StoreError};
use crate::storage::CollectionStorage;

/// Audit fields a patch can never touch.
const STAMPED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt"];

/// Exact-match conditions on persisted (camelCase) field names, ANDed together.
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: BTreeMap<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    fn matches(&self, row: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| row.get(field).is_some_and(|actual| same_value(actual, expected)))
    }
}

/// `5` and `5.0` are the same offer amount.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generic CRUD over one collection of `Document<T>`.
///
/// Every call loads the whole collection, works on it in memory and, for
/// mutations, saves the whole collection back. Nothing is cached between
/// calls and nothing serializes concurrent mutations.
pub struct DocumentStore<T> {
    collection: String,
    storage: Arc<dyn CollectionStorage>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentStore<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            storage: Arc::clone(&self.storage),
            _entity: PhantomData,
        }
    }
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(collection: impl Into<String>, storage: Arc<dyn CollectionStorage>) -> Self {
        Self {
            collection: collection.into(),
            storage,
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn decode(&self, row: Value) -> Result<Document<T>> {
        serde_json::from_value(row).map_err(|source| StoreError::Decode {
            collection: self.collection.clone(),
            source,
        })
    }

    fn not_found(&self, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: self.collection.clone(),
            id: id.to_string(),
        }
    }

    /// Stamp a fresh id and timestamps onto `data` and append it.
    pub async fn create(&self, data: T) -> Result<Document<T>> {
        let mut rows = self.storage.load().await?;

        let stamped_at = now();
        let doc = Document {
            data,
            id: Uuid::new_v4().to_string(),
            created_at: stamped_at,
            updated_at: stamped_at,
        };

        let row = serde_json::to_value(&doc).map_err(StoreError::Encode)?;
        serde_json::from_value::<Document<T>>(row.clone()).map_err(|source| StoreError::Unreadable {
            collection: self.collection.clone(),
            source,
        })?;

        rows.push(row);
        self.storage.save(&rows).await?;

        debug!(collection = %self.collection, id = %doc.id, "document created");
        Ok(doc)
    }

    /// Shallow-merge `patch` over the stored document and refresh `updatedAt`.
    ///
    /// Every key the patch serializes is written, including `null`s. The
    /// stamped fields are skipped. A merge that no longer decodes as `T` is
    /// rejected before anything is written.
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Document<T>>
    where
        P: Serialize + ?Sized,
    {
        let patch = match serde_json::to_value(patch).map_err(StoreError::Encode)? {
            Value::Object(fields) => fields,
            other => {
                return Err(StoreError::InvalidPatch(format!(
                    "expected an object, got {other}"
                )));
            }
        };

        let mut rows = self.storage.load().await?;

        let record = rows
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| self.not_found(id))?;

        for (field, value) in patch {
            if STAMPED_FIELDS.contains(&field.as_str()) {
                continue;
            }
            record.insert(field, value);
        }
        record.insert(
            "updatedAt".to_string(),
            serde_json::to_value(now()).map_err(StoreError::Encode)?,
        );

        let doc: Document<T> = serde_json::from_value(Value::Object(record.clone()))
            .map_err(|e| StoreError::InvalidPatch(e.to_string()))?;

        self.storage.save(&rows).await?;

        debug!(collection = %self.collection, id, "document updated");
        Ok(doc)
    }

    /// Remove every document with this id. Absent ids are not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut rows = self.storage.load().await?;

        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        let removed = before - rows.len();

        self.storage.save(&rows).await?;

        debug!(collection = %self.collection, id, removed, "document deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document<T>>> {
        let rows = self.storage.load().await?;

        rows.into_iter()
            .find(|row| row_id(row) == Some(id))
            .map(|row| self.decode(row))
            .transpose()
    }

    /// Documents matching every condition in `filter`, in stored order.
    pub async fn find_many(&self, filter: &Filter) -> Result<Vec<Document<T>>> {
        let rows = self.storage.load().await?;

        rows.into_iter()
            .filter(|row| filter.matches(row))
            .map(|row| self.decode(row))
            .collect()
    }

    pub async fn find_all(&self) -> Result<Vec<Document<T>>> {
        self.find_many(&Filter::new()).await
    }
}
