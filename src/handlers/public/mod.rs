// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod health; // GET /health
pub mod root;   // GET /

pub use health::health;
pub use root::root;
