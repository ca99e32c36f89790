// ============================================================================
// stocksheet - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;      // API IEX Cloud (requête batch + mise en forme)
pub mod config;   // Configuration (défauts, environnement)
pub mod error;    // ReportError
pub mod export;   // Export .xlsx
pub mod models;   // Structures de données
pub mod pipeline; // Enchaînement des étapes
pub mod storage;  // Upload S3

pub use config::Config;
pub use error::{ReportError, Result};
pub use models::{ReportRow, ReportTable};
pub use pipeline::{run, RunSummary};
