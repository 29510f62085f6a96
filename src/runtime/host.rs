use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::runtime::value::Value;

/// Opaque reference to an entity owned by the host application.
///
/// Handles are minted by [`Host::query`] and are only meaningful to the host
/// that produced them. The interpreter never inspects the payload; it can
/// only copy handles around and pass them back through [`Host::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HostHandle(u64);

impl HostHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Errors surfaced by a host while serving `query` or `info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HostError {
    UnknownCollection(String),
    InvalidHandle(u64),
    Failed(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::UnknownCollection(name) => {
                write!(f, "unknown collection {name:?}")
            }
            HostError::InvalidHandle(id) => write!(f, "invalid handle {id}"),
            HostError::Failed(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for HostError {}

/// The capability a script runs against.
///
/// Scripts cannot reach the outside world except through these two calls,
/// so embedding applications control exactly what a script can observe.
/// Both take `&mut self` so hosts may cache or log between calls.
pub trait Host {
    /// All entities in the named collection, as opaque handles.
    fn query(&mut self, collection: &str) -> Result<Vec<HostHandle>, HostError>;

    /// One attribute of one entity. Hosts report an attribute that does not
    /// exist on the entity as [`Value::Null`] rather than an error, so
    /// scripts can probe for optional attributes with `nil !=`.
    fn info(&mut self, handle: HostHandle, attribute: &str) -> Result<Value, HostError>;
}

/// An in-memory host backed by a JSON document. Used by the test suite and
/// handy for embedders that want to run scripts against fixture data.
///
/// The document is an object mapping collection names to arrays of entity
/// objects. Attribute values may be null, booleans, numbers, strings, or
/// arrays of those; nested objects are rejected at load time.
#[derive(Debug, Default)]
pub struct StaticHost {
    collections: HashMap<String, Vec<usize>>,
    entities: Vec<HashMap<String, Value>>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(document: &str) -> Result<Self, HostError> {
        let parsed: serde_json::Value = serde_json::from_str(document)
            .map_err(|e| HostError::Failed(format!("malformed host document: {e}")))?;
        let serde_json::Value::Object(collections) = parsed else {
            return Err(HostError::Failed(
                "host document must be an object of collections".to_string(),
            ));
        };

        let mut host = Self::new();
        for (name, members) in collections {
            let serde_json::Value::Array(members) = members else {
                return Err(HostError::Failed(format!(
                    "collection {name:?} must be an array"
                )));
            };
            let mut handles = Vec::with_capacity(members.len());
            for member in members {
                let serde_json::Value::Object(attributes) = member else {
                    return Err(HostError::Failed(format!(
                        "entities in {name:?} must be objects"
                    )));
                };
                let mut entity = HashMap::new();
                for (attribute, value) in attributes {
                    entity.insert(attribute, convert_attribute(&name, value)?);
                }
                handles.push(host.entities.len());
                host.entities.push(entity);
            }
            host.collections.insert(name, handles);
        }
        Ok(host)
    }
}

fn convert_attribute(collection: &str, value: serde_json::Value) -> Result<Value, HostError> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => {
            let number = n.as_f64().ok_or_else(|| {
                HostError::Failed(format!("unrepresentable number {n} in {collection:?}"))
            })?;
            Ok(Value::Number(number))
        }
        serde_json::Value::String(s) => Ok(Value::String(s.into())),
        serde_json::Value::Array(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(convert_attribute(collection, item)?);
            }
            Ok(Value::List(converted.into()))
        }
        serde_json::Value::Object(_) => Err(HostError::Failed(format!(
            "nested objects are not valid attribute values in {collection:?}"
        ))),
    }
}

impl Host for StaticHost {
    fn query(&mut self, collection: &str) -> Result<Vec<HostHandle>, HostError> {
        let members = self
            .collections
            .get(collection)
            .ok_or_else(|| HostError::UnknownCollection(collection.to_string()))?;
        Ok(members
            .iter()
            .map(|index| HostHandle::new(*index as u64))
            .collect())
    }

    fn info(&mut self, handle: HostHandle, attribute: &str) -> Result<Value, HostError> {
        let entity = self
            .entities
            .get(handle.id() as usize)
            .ok_or(HostError::InvalidHandle(handle.id()))?;
        Ok(entity.get(attribute).cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "Elements": [
            {"Name": "hydrogen", "Weight": 1.008},
            {"Name": "helium", "Weight": 4.0026, "Noble": true}
        ],
        "Empty": []
    }"#;

    #[test]
    fn query_returns_one_handle_per_entity() {
        let mut host = StaticHost::from_json(DOCUMENT).unwrap();
        let handles = host.query("Elements").unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(host.query("Empty").unwrap(), vec![]);
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let mut host = StaticHost::from_json(DOCUMENT).unwrap();
        assert_eq!(
            host.query("Nope"),
            Err(HostError::UnknownCollection("Nope".to_string()))
        );
    }

    #[test]
    fn info_reads_attributes() {
        let mut host = StaticHost::from_json(DOCUMENT).unwrap();
        let handles = host.query("Elements").unwrap();
        assert_eq!(
            host.info(handles[0], "Name").unwrap(),
            Value::String("hydrogen".into())
        );
        assert_eq!(
            host.info(handles[1], "Weight").unwrap(),
            Value::Number(4.0026)
        );
        assert_eq!(host.info(handles[1], "Noble").unwrap(), Value::Bool(true));
    }

    #[test]
    fn missing_attribute_is_null() {
        let mut host = StaticHost::from_json(DOCUMENT).unwrap();
        let handles = host.query("Elements").unwrap();
        assert_eq!(host.info(handles[0], "Noble").unwrap(), Value::Null);
    }

    #[test]
    fn stale_handle_is_an_error() {
        let mut host = StaticHost::from_json(DOCUMENT).unwrap();
        assert_eq!(
            host.info(HostHandle::new(99), "Name"),
            Err(HostError::InvalidHandle(99))
        );
    }

    #[test]
    fn array_attributes_become_lists() {
        let mut host =
            StaticHost::from_json(r#"{"Sets": [{"Members": ["a", "b"]}]}"#).unwrap();
        let handles = host.query("Sets").unwrap();
        assert_eq!(
            host.info(handles[0], "Members").unwrap(),
            Value::List(vec![Value::String("a".into()), Value::String("b".into())].into())
        );
    }

    #[test]
    fn nested_objects_are_rejected() {
        let result = StaticHost::from_json(r#"{"Sets": [{"Inner": {"a": 1}}]}"#);
        assert!(matches!(result, Err(HostError::Failed(_))));
    }
}
