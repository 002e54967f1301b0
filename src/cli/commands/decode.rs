use anyhow::Context;

use crate::auth::IdentityCodec;
use crate::cli::{utils, OutputFormat};
use crate::config::JwtConfig;
use crate::middleware::context::strip_bearer;

pub fn handle(token: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let jwt = JwtConfig::from_env().context("JWT settings")?;
    let codec = IdentityCodec::from_config(&jwt);

    let identity = codec.decode(strip_bearer(token.trim()))?;
    identity.validate()?;

    let groups: Vec<&str> = identity.federated_groups.iter().map(String::as_str).collect();
    let text = format!(
        "{} <{}> id={} uid={} groups=[{}]",
        identity.username,
        identity.email,
        identity.id,
        identity.federated_id,
        groups.join(", ")
    );
    utils::output(output_format, &identity, &text)
}
