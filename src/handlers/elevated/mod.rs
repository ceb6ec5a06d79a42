// handlers/elevated/mod.rs - Cross-tenant handlers (super-role JWT required)

pub mod superadmin;
