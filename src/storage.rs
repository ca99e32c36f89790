// ============================================================================
// Module : storage
// ============================================================================
// Upload du classeur vers un bucket S3, lisible publiquement.
//
// Les identifiants viennent de la chaîne standard AWS (variables
// AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY, profil ~/.aws, rôle d'instance).
// Pas de retry, pas de création de bucket.
// ============================================================================

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use tracing::{debug, error, info, instrument};

use crate::config::UploadTarget;
use crate::error::{ReportError, Result};

/// Content-Type officiel des fichiers .xlsx
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Envoie `path` vers `target.bucket` sous le nom `target.key`
#[instrument(skip(target), fields(bucket = %target.bucket, key = %target.key))]
pub async fn upload_report(path: &Path, target: &UploadTarget) -> Result<()> {
    if !path.is_file() {
        return Err(ReportError::Upload(format!(
            "fichier introuvable : {}",
            path.display()
        )));
    }

    debug!("Loading AWS configuration");
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_s3::Client::new(&aws_config);

    let body = ByteStream::from_path(path)
        .await
        .map_err(|e| ReportError::Upload(e.to_string()))?;

    debug!("Sending PutObject request");
    client
        .put_object()
        .bucket(&target.bucket)
        .key(&target.key)
        .acl(ObjectCannedAcl::PublicRead)
        .content_type(XLSX_CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            error!(error = ?e, "S3 upload failed");
            ReportError::Upload(e.to_string())
        })?;

    info!("Report uploaded");
    Ok(())
}
