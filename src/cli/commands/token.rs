use anyhow::Context;
use clap::Args;
use serde_json::{json, Map, Value};

use crate::auth::{Identity, IdentityCodec};
use crate::cli::{utils, OutputFormat};
use crate::config::JwtConfig;

#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    #[arg(long, help = "Caller id")]
    pub id: String,
    #[arg(long, help = "Federated id")]
    pub uid: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long = "role", help = "Group membership, repeatable")]
    pub roles: Vec<String>,
}

impl TokenArgs {
    fn identity(self) -> Identity {
        Identity {
            id: self.id,
            name: self.name,
            email: self.email,
            username: self.username,
            federated_id: self.uid,
            federated_groups: self.roles.into_iter().collect(),
            accessed_resources: Map::new(),
        }
    }
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let jwt = JwtConfig::from_env().context("JWT settings")?;
    let codec = IdentityCodec::from_config(&jwt);

    let identity = args.identity();
    identity.validate()?;
    let token = codec.encode_identity(&identity)?;

    utils::output(
        output_format,
        &json!({ "token": token, "expiresInHours": Value::from(jwt.expiry_hours) }),
        &token,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_become_groups() {
        let args = TokenArgs {
            id: "u".into(),
            uid: "f".into(),
            username: "jdoe".into(),
            email: "j@example.com".into(),
            name: "J".into(),
            roles: vec!["a".into(), "b".into(), "a".into()],
        };
        let identity = args.identity();
        assert_eq!(identity.federated_groups.len(), 2);
        assert!(identity.validate().is_ok());
    }
}
