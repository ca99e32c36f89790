// ============================================================================
// stocksheet - Point d'entrée
// ============================================================================
// Récupère prix, nom et rendement du dividende d'une liste de tickers depuis
// IEX Cloud, écrit stock_market_data.xlsx, puis l'envoie sur S3 si un bucket
// est configuré.
//
// Prévu pour être lancé par un cron, par exemple tous les jours à midi :
//   00 12 * * * /usr/local/bin/stocksheet
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use stocksheet::config::{parse_ticker_list, ENV_S3_BUCKET, ENV_S3_KEY};
use stocksheet::models::BatchRange;
use stocksheet::Config;

// ============================================================================
// Arguments de la ligne de commande
// ============================================================================
// Chaque option remplace la valeur venant de l'environnement (ou du .env)
// ============================================================================

/// Génère un classeur Excel avec les données de marché d'une liste de tickers
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tickers séparés par des virgules (ex: "MSFT,AAPL,BRK.B")
    #[arg(long)]
    tickers: Option<String>,

    /// Token IEX Cloud (sinon IEX_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// URL de base de l'API
    #[arg(long)]
    base_url: Option<String>,

    /// Chemin du fichier .xlsx produit
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Nom de la feuille
    #[arg(long)]
    sheet_name: Option<String>,

    /// Période demandée à l'endpoint batch
    #[arg(long, value_enum)]
    range: Option<BatchRange>,

    /// Bucket S3 de destination (active l'upload)
    #[arg(long)]
    bucket: Option<String>,

    /// Nom de l'objet dans le bucket (défaut : nom du fichier)
    #[arg(long)]
    key: Option<String>,
}

impl Args {
    /// Applique les arguments par-dessus la configuration existante
    fn apply(self, mut config: Config) -> Config {
        if let Some(tickers) = self.tickers {
            config.tickers = parse_ticker_list(&tickers);
        }
        if let Some(token) = self.token {
            config.token = token;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(sheet_name) = self.sheet_name {
            config.sheet_name = sheet_name;
        }
        if let Some(range) = self.range {
            config.range = range;
        }
        if let Some(bucket) = self.bucket {
            config.upload_bucket = Some(bucket);
        }
        if let Some(key) = self.key {
            config.upload_key = Some(key);
        }
        config
    }
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Deux sorties :
// - stderr, pour voir ce qui se passe en lançant la commande à la main
// - un fichier avec rotation quotidienne, pour les exécutions via cron
//
// Les logs sont écrits dans :
// - Linux : ~/.local/share/stocksheet/logs/stocksheet.log
// - macOS : ~/Library/Application Support/stocksheet/logs/stocksheet.log
// - Windows : C:\Users\<user>\AppData\Local\stocksheet\logs\stocksheet.log
//
// RUST_LOG=debug stocksheet   # plus de détails
// ============================================================================

fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("stocksheet").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "stocksheet.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stocksheet=info,warn".into()),
        )
        .init();

    debug!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================
// CONCEPT RUST : runtime "current_thread"
// - une seule requête HTTP puis une écriture : pas besoin de plusieurs threads
// - #[tokio::main] crée le runtime et exécute main() dedans
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Le .env est chargé avant le logging : il peut définir RUST_LOG.
    // Un .env absent n'est pas une erreur.
    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e).context("Échec de la lecture du fichier .env"),
    };

    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
    });

    match &dotenv {
        Some(path) => debug!(path = %path.display(), "Loaded .env file"),
        None => debug!("No .env file found"),
    }

    // La validation a lieu dans stocksheet::run
    let config = args.apply(Config::from_env());

    info!(tickers = ?config.tickers, output = %config.output.display(), "stocksheet starting");

    match stocksheet::run(&config).await {
        Ok(summary) => {
            for row in &summary.table {
                println!("  {}", row.display());
            }
            println!(
                "✅ {} lignes écrites dans {}",
                summary.table.len(),
                summary.output.display()
            );
            if let Some(destination) = summary.uploaded {
                println!("☁️  Uploadé vers s3://{}", destination);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "Run failed");
            Err(e).context("Échec de la génération du rapport")
        }
    }
}
