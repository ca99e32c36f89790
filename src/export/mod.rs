// ============================================================================
// Module : export
// ============================================================================
// Écriture du rapport au format .xlsx
// ============================================================================

pub mod styles; // Templates et calcul des plages stylées
pub mod xlsx;   // Construction et sauvegarde du classeur

pub use styles::{style_plan, StyleRange, StyleTemplate, LEGACY_DATA_ROWS};
pub use xlsx::{build_workbook, write_workbook, HEADERS};
