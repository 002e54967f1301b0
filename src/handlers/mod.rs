// handlers/mod.rs - Handler tiers
//
// Public (no credential) and protected (credential required, writes behind
// the admin gate).

pub mod protected;
pub mod public;
