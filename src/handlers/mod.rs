// Two security tiers: public (no auth, token acquisition) and protected
// (access token required; HR-only routes add a role gate on top).
pub mod protected;
pub mod public;
