// handlers/protected/mod.rs - Tenant-scoped handlers (JWT + tenant context required)
//
// Every handler receives the resolved TenantContext from middleware and passes
// it straight to the service layer; no handler reads tenant claims itself.

pub mod alerts;     // /asset-alerts/*
pub mod thresholds; // /sensor-thresholds/*
