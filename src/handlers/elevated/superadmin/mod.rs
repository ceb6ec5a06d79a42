// handlers/elevated/superadmin/mod.rs - /superadmin/* mirror routes
//
// Same semantics as the tenant routes but without the tenant filter. The
// router wraps this group in `require_super_admin`; services check again.

pub mod alerts;     // /superadmin/asset-alerts/*
pub mod thresholds; // /superadmin/sensor-thresholds/*
