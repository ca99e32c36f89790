// ============================================================================
// Module : api
// ============================================================================
// Clients API pour récupérer les données financières
// ============================================================================

pub mod iex; // Client de l'endpoint batch IEX Cloud

// Re-export des fonctions principales
pub use iex::{build_batch_url, fetch_batch, parse_batch_response, shape_report, BatchResponse};
