// ============================================================================
// Module : models
// ============================================================================
// Structures de données du rapport et paramètres de la requête batch
// ============================================================================

pub mod endpoint; // Endpoint (types) et BatchRange (range)
pub mod report;   // ReportRow et ReportTable

// Re-export des structures principales
// On peut faire : use stocksheet::models::ReportTable;
pub use endpoint::{join_endpoints, BatchRange, Endpoint};
pub use report::{ReportRow, ReportTable};
