// ============================================================================
// Module : pipeline
// ============================================================================
// Enchaîne les étapes, strictement dans l'ordre :
//   fetch_batch -> shape_report -> export_report -> upload_report (optionnel)
//
// - build_report : mise en forme + export, sans réseau
// - generate_report : requête + build_report
// - run : validation + generate_report + upload
//
// Chaque étape est une fonction indépendante ; le pipeline ne garde aucun
// état entre deux exécutions en dehors du fichier produit.
// ============================================================================

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::api::{fetch_batch, shape_report, BatchResponse};
use crate::config::Config;
use crate::error::Result;
use crate::export::write_workbook;
use crate::models::ReportTable;
use crate::storage::upload_report;

/// Résultat d'une exécution complète
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Table écrite dans le classeur
    pub table: ReportTable,
    /// Chemin du classeur produit
    pub output: PathBuf,
    /// Destination "bucket/key" si le fichier a été uploadé
    pub uploaded: Option<String>,
}

/// Écrit la table dans le fichier et la feuille configurés
pub fn export_report(table: &ReportTable, config: &Config) -> Result<()> {
    write_workbook(table, &config.output, &config.sheet_name)
}

/// Transforme une réponse batch en table et l'écrit sur disque
///
/// Partie sans réseau du pipeline : utilisable avec une réponse enregistrée.
pub fn build_report(config: &Config, batch: &BatchResponse) -> Result<ReportTable> {
    let table = shape_report(&config.tickers, batch)?;
    export_report(&table, config)?;
    Ok(table)
}

/// Requête batch, mise en forme et export, sans upload
pub async fn generate_report(config: &Config) -> Result<ReportTable> {
    let batch = fetch_batch(config).await?;
    build_report(config, &batch)
}

/// Exécution complète : requête, table, classeur, puis upload éventuel
#[instrument(skip(config), fields(output = %config.output.display()))]
pub async fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;

    let table = generate_report(config).await?;

    let uploaded = match config.upload_target() {
        Some(target) => {
            upload_report(&config.output, &target).await?;
            Some(format!("{}/{}", target.bucket, target.key))
        }
        None => None,
    };

    info!(rows = table.len(), uploaded = uploaded.is_some(), "Run completed");
    Ok(RunSummary {
        table,
        output: config.output.clone(),
        uploaded,
    })
}
