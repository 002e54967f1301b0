// handlers/protected/mod.rs - Protected handlers (credential required)
//
// Every route here sits behind the context initiator and the authenticator.
// Mutating routes additionally sit behind the admin gate.

pub mod products;
