// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT + tenant context) → Elevated (super-role only)

pub mod elevated;  // /superadmin/*
pub mod params;    // shared query and body shapes
pub mod protected; // /sensor-thresholds/*, /asset-alerts/*
pub mod public;    // /, /health
