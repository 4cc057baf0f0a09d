/// Database utilities
///
/// - `pool`: connection pool creation and configuration
/// - `migrations`: embedded migration runner
/// - `filter`: WHERE/SET clause builders for the generic repository
/// - `repo`: table-agnostic CRUD primitives
/// - `seed`: idempotent initial-data bootstrap

pub mod filter;
pub mod migrations;
pub mod pool;
pub mod repo;
pub mod seed;
