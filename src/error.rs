// ============================================================================
// Module : error
// ============================================================================
// Type d'erreur unique de la bibliothèque
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère Display et std::error::Error
// - #[from] génère les conversions From<T>, utilisables avec ?
//
// Aucune erreur n'est récupérée localement : chaque variante interrompt
// l'exécution. Le binaire ajoute du contexte avec anyhow.
// ============================================================================

use thiserror::Error;

/// Erreurs possibles lors de la génération du rapport
#[derive(Error, Debug)]
pub enum ReportError {
    /// Échec réseau ou transport sur la requête batch
    /// L'URL (qui contient le token) est retirée, voir `From<reqwest::Error>`
    #[error("Échec de la requête HTTP : {0}")]
    Transport(reqwest::Error),

    /// L'API a répondu avec un statut HTTP non 2xx
    #[error("L'API a retourné une erreur : HTTP {status}")]
    HttpStatus { status: reqwest::StatusCode },

    /// Corps de réponse qui n'est pas du JSON valide
    #[error("Réponse JSON invalide : {0}")]
    Json(#[from] serde_json::Error),

    /// Champ requis absent pour un ticker présent dans la réponse
    #[error("Champ `{field}` manquant pour le ticker {ticker}")]
    Schema { ticker: String, field: &'static str },

    /// Échec de construction ou d'écriture du classeur
    #[error("Échec de l'écriture du classeur : {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Erreur I/O : {0}")]
    Io(#[from] std::io::Error),

    /// Échec de l'upload vers le stockage objet
    #[error("Échec de l'upload : {0}")]
    Upload(String),

    /// Configuration inutilisable (token vide, aucun ticker...)
    #[error("Configuration invalide : {0}")]
    Config(String),
}

// Les erreurs reqwest embarquent l'URL de la requête, donc le token IEX :
// on la retire avant qu'elle n'atteigne les logs ou stderr.
impl From<reqwest::Error> for ReportError {
    fn from(error: reqwest::Error) -> Self {
        ReportError::Transport(error.without_url())
    }
}

/// Alias pratique pour les fonctions de la bibliothèque
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_message() {
        let err = ReportError::Schema {
            ticker: "AAPL".to_string(),
            field: "price",
        };
        assert_eq!(err.to_string(), "Champ `price` manquant pour le ticker AAPL");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(matches!(err, ReportError::Json(_)));
    }
}
