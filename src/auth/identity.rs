use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::AuthError;

/// The caller, as established from a verified credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub federated_id: String,
    pub federated_groups: BTreeSet<String>,
    /// Resource id to an opaque marker.
    pub accessed_resources: Map<String, Value>,
}

impl Identity {
    /// Maps decoded claims onto an identity. Every required claim must be
    /// present and correctly typed; nothing is defaulted except a null
    /// `roles` (empty set) and an absent or null `accessed_workspaces`.
    pub fn from_claims(claims: &Map<String, Value>) -> Result<Self, AuthError> {
        let id = string_claim(claims, "id")?;
        let federated_id = string_claim(claims, "uid")?;
        let username = string_claim(claims, "username")?;
        let email = string_claim(claims, "email")?;
        let name = string_claim(claims, "name")?;

        let federated_groups = match claims.get("roles") {
            None => return Err(AuthError::InvalidClaims("no user roles found in token".into())),
            Some(Value::Null) => BTreeSet::new(),
            Some(Value::Array(roles)) => roles
                .iter()
                .map(|role| match role {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(AuthError::InvalidClaims(format!(
                        "role is expected to be a string but {} was given",
                        json_kind(other)
                    ))),
                })
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(AuthError::InvalidClaims(format!(
                    "list of roles is expected to be an array but {} was given",
                    json_kind(other)
                )))
            }
        };

        let accessed_resources = match claims.get("accessed_workspaces") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(AuthError::InvalidClaims(format!(
                    "set of accessed workspaces is expected to be an object but {} was given",
                    json_kind(other)
                )))
            }
        };

        Ok(Self {
            id,
            name,
            email,
            username,
            federated_id,
            federated_groups,
            accessed_resources,
        })
    }

    /// Required fields must be non-blank.
    pub fn validate(&self) -> Result<(), AuthError> {
        let required = [
            (&self.federated_id, "user Federated ID is required"),
            (&self.username, "user USERNAME is required"),
            (&self.email, "user EMAIL is required"),
            (&self.name, "user NAME is required"),
        ];
        for (value, message) in required {
            if value.trim().is_empty() {
                return Err(AuthError::InvalidIdentity(message.to_string()));
            }
        }
        Ok(())
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.federated_groups.contains(group)
    }

    pub fn to_claims(&self) -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert("id".into(), Value::String(self.id.clone()));
        claims.insert("name".into(), Value::String(self.name.clone()));
        claims.insert("uid".into(), Value::String(self.federated_id.clone()));
        claims.insert(
            "roles".into(),
            Value::Array(self.federated_groups.iter().cloned().map(Value::String).collect()),
        );
        claims.insert("email".into(), Value::String(self.email.clone()));
        claims.insert("username".into(), Value::String(self.username.clone()));
        claims.insert(
            "accessed_workspaces".into(),
            Value::Object(self.accessed_resources.clone()),
        );
        claims
    }
}

fn string_claim(claims: &Map<String, Value>, key: &str) -> Result<String, AuthError> {
    match claims.get(key) {
        None => Err(AuthError::InvalidClaims(format!("no user {} found in token", key))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(AuthError::InvalidClaims(format!(
            "claim {} is expected to be a string but {} was given",
            key,
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn full() -> Value {
        json!({
            "id": "u-1", "uid": "fed-1", "username": "jdoe",
            "email": "jdoe@example.com", "name": "J Doe",
            "roles": ["a", "b"], "accessed_workspaces": {"w1": {}}
        })
    }

    #[test]
    fn maps_every_claim() {
        let identity = Identity::from_claims(&claims(full())).unwrap();
        assert_eq!(identity.id, "u-1");
        assert_eq!(identity.federated_id, "fed-1");
        assert_eq!(identity.federated_groups.len(), 2);
        assert!(identity.accessed_resources.contains_key("w1"));
        assert!(identity.validate().is_ok());
    }

    #[test]
    fn null_roles_become_empty() {
        let mut value = full();
        value["roles"] = Value::Null;
        let identity = Identity::from_claims(&claims(value)).unwrap();
        assert!(identity.federated_groups.is_empty());
    }

    #[test]
    fn roles_of_wrong_type_fail() {
        let mut value = full();
        value["roles"] = json!("admin");
        assert!(matches!(
            Identity::from_claims(&claims(value)),
            Err(AuthError::InvalidClaims(_))
        ));
    }

    #[test]
    fn non_string_id_fails() {
        let mut value = full();
        value["id"] = json!(42);
        assert!(Identity::from_claims(&claims(value)).is_err());
    }

    #[test]
    fn absent_workspaces_are_empty() {
        let mut value = full();
        value.as_object_mut().unwrap().remove("accessed_workspaces");
        let identity = Identity::from_claims(&claims(value)).unwrap();
        assert!(identity.accessed_resources.is_empty());
    }

    #[test]
    fn blank_fields_fail_validation() {
        let mut value = full();
        value["email"] = json!("  ");
        let identity = Identity::from_claims(&claims(value)).unwrap();
        assert_eq!(
            identity.validate(),
            Err(AuthError::InvalidIdentity("user EMAIL is required".into()))
        );
    }

    #[test]
    fn claims_survive_a_round_trip() {
        let identity = Identity::from_claims(&claims(full())).unwrap();
        assert_eq!(Identity::from_claims(&identity.to_claims()).unwrap(), identity);
    }
}
