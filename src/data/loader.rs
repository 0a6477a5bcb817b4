//! Concurrent loading of the five collections.

use crate::api::ApiError;
use crate::data::{Collection, DataContext};
use crate::models::{
    Allocation, CollectionKind, Payment, Program, Record, Sponsor, Student,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

/// Something that can serve the raw list response of a collection.
#[allow(async_fn_in_trait)] // Only used through generics, never as a trait object
pub trait CollectionSource {
    /// Fetch the list response body for `kind`.
    async fn fetch(&self, kind: CollectionKind) -> Result<Value, ApiError>;
}

/// Fetch all five collections concurrently.
///
/// A failed fetch is logged and leaves its collection empty and not loaded;
/// the other collections are unaffected.
pub async fn load_all<S: CollectionSource>(source: &S) -> DataContext {
    let (students, sponsors, programs, allocations, payments) = futures::future::join5(
        load_collection::<_, Student>(source),
        load_collection::<_, Sponsor>(source),
        load_collection::<_, Program>(source),
        load_collection::<_, Allocation>(source),
        load_collection::<_, Payment>(source),
    )
    .await;

    DataContext {
        students,
        sponsors,
        programs,
        allocations,
        payments,
    }
}

async fn load_collection<S, T>(source: &S) -> Collection<T>
where
    S: CollectionSource,
    T: Record + DeserializeOwned,
{
    let result = source
        .fetch(T::KIND)
        .await
        .and_then(decode_envelope::<T>);

    match result {
        Ok(items) => {
            info!("Loaded {} {}", items.len(), T::KIND.envelope_field());
            Collection::loaded(items)
        }
        Err(e) => {
            warn!("Failed to load {}: {}", T::KIND, e);
            Collection::failed(e.to_string())
        }
    }
}

/// Extract and decode the named array field of a list response.
///
/// A missing or null field is an empty list.
pub fn decode_envelope<T>(body: Value) -> Result<Vec<T>, ApiError>
where
    T: Record + DeserializeOwned,
{
    let field = T::KIND.envelope_field();

    let mut body = match body {
        Value::Object(map) => map,
        other => {
            return Err(ApiError::Decode {
                collection: T::KIND,
                message: format!("expected a JSON object, got {}", json_type(&other)),
            })
        }
    };

    match body.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list @ Value::Array(_)) => {
            serde_json::from_value(list).map_err(|e| ApiError::Decode {
                collection: T::KIND,
                message: e.to_string(),
            })
        }
        Some(other) => Err(ApiError::Decode {
            collection: T::KIND,
            message: format!("field `{}` is {}, not an array", field, json_type(&other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
