// ============================================================================
// Module : config
// ============================================================================
// Configuration d'une exécution : tickers, paramètres de la requête, token,
// fichier de sortie et destination S3 optionnelle.
//
// Ordre de priorité (du plus faible au plus fort) :
//   1. valeurs par défaut (Config::default)
//   2. variables d'environnement (éventuellement chargées depuis .env)
//   3. arguments de la ligne de commande (appliqués par main.rs)
// ============================================================================

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ReportError, Result};
use crate::models::{BatchRange, Endpoint};

/// Les 10 plus grosses capitalisations américaines de la liste d'origine
pub const DEFAULT_TICKERS: [&str; 10] = [
    "MSFT", "AAPL", "AMZN", "GOOG", "FB", "BRK.B", "JNJ", "WMT", "V", "PG",
];

pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";
pub const DEFAULT_OUTPUT: &str = "stock_market_data.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Stock Market Data";

// Variables d'environnement reconnues
pub const ENV_TOKEN: &str = "IEX_API_TOKEN";
pub const ENV_BASE_URL: &str = "IEX_BASE_URL";
pub const ENV_TICKERS: &str = "STOCKSHEET_TICKERS";
pub const ENV_OUTPUT: &str = "STOCKSHEET_OUTPUT";
pub const ENV_S3_BUCKET: &str = "STOCKSHEET_S3_BUCKET";
pub const ENV_S3_KEY: &str = "STOCKSHEET_S3_KEY";

/// Destination de l'upload S3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
    /// Nom de l'objet dans le bucket
    pub key: String,
}

impl UploadTarget {
    /// Crée une destination ; sans clé explicite, on reprend le nom du fichier
    pub fn new(bucket: String, key: Option<String>, output: &Path) -> Self {
        let key = key.unwrap_or_else(|| {
            output
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string())
        });
        Self { bucket, key }
    }
}

/// Configuration complète d'une exécution
#[derive(Debug, Clone)]
pub struct Config {
    pub tickers: Vec<String>,
    pub endpoints: Vec<Endpoint>,
    pub range: BatchRange,
    pub token: String,
    pub base_url: String,
    pub output: PathBuf,
    pub sheet_name: String,
    /// Bucket S3 ; l'upload n'a lieu que s'il est renseigné
    pub upload_bucket: Option<String>,
    /// Nom de l'objet ; par défaut le nom du fichier de sortie
    pub upload_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            endpoints: Endpoint::defaults(),
            range: BatchRange::default(),
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            upload_bucket: None,
            upload_key: None,
        }
    }
}

impl Config {
    /// Applique les variables d'environnement
    ///
    /// CONCEPT RUST : closure en paramètre
    /// - `lookup` remplace std::env::var, ce qui rend la fonction testable
    ///   sans modifier l'environnement du processus
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = token;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(tickers) = lookup(ENV_TICKERS) {
            self.tickers = parse_ticker_list(&tickers);
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            self.output = PathBuf::from(output);
        }
        if let Some(bucket) = lookup(ENV_S3_BUCKET).filter(|b| !b.trim().is_empty()) {
            self.upload_bucket = Some(bucket);
        }
        if let Some(key) = lookup(ENV_S3_KEY).filter(|k| !k.trim().is_empty()) {
            self.upload_key = Some(key);
        }

        debug!(tickers = self.tickers.len(), upload = self.upload_bucket.is_some(), "Applied environment overrides");
        self
    }

    /// Destination S3 résolue à partir de la configuration finale
    ///
    /// À appeler une fois toutes les sources appliquées : la clé par défaut
    /// dépend du fichier de sortie retenu.
    pub fn upload_target(&self) -> Option<UploadTarget> {
        self.upload_bucket
            .as_ref()
            .map(|bucket| UploadTarget::new(bucket.clone(), self.upload_key.clone(), &self.output))
    }

    /// Lit l'environnement réel du processus
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Vérifie qu'on peut lancer une requête avec cette configuration
    ///
    /// Les symboles eux-mêmes ne sont pas validés : c'est le service distant
    /// qui décide de ce qu'il reconnaît.
    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() {
            return Err(ReportError::Config("la liste de tickers est vide".to_string()));
        }
        if self.endpoints.is_empty() {
            return Err(ReportError::Config("aucun endpoint sélectionné".to_string()));
        }
        if self.token.trim().is_empty() {
            return Err(ReportError::Config(format!(
                "token IEX manquant (variable {} ou --token)",
                ENV_TOKEN
            )));
        }
        Ok(())
    }
}

/// Découpe une liste de tickers saisie par l'utilisateur
///
/// Séparateurs acceptés : virgules et espaces. Les symboles sont mis en
/// majuscules, les entrées vides ignorées. L'ordre et les doublons sont
/// conservés.
pub fn parse_ticker_list(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_uppercase())
        .collect()
}
