// ============================================================================
// Paramètres de la requête batch : Endpoint et BatchRange
// ============================================================================
// IEX Cloud permet de demander plusieurs "types" (groupes de champs) et une
// période (range) dans un seul appel batch.
//
// CONCEPTS RUST :
// 1. enum + Copy : valeurs simples copiées automatiquement
// 2. match exhaustif : le compilateur vérifie qu'on traite chaque variante
// ============================================================================

use clap::ValueEnum;

/// Groupe de champs demandé à l'endpoint batch (paramètre `types`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Dernier prix (nombre brut)
    Price,
    /// Statistiques clés (companyName, dividendYield, ...)
    Stats,
}

impl Endpoint {
    /// Nom utilisé dans la query string
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Price => "price",
            Endpoint::Stats => "stats",
        }
    }

    /// Sélection utilisée par le rapport : prix + stats
    pub fn defaults() -> Vec<Endpoint> {
        vec![Endpoint::Price, Endpoint::Stats]
    }
}

/// Joint une sélection d'endpoints pour le paramètre `types`
pub fn join_endpoints(endpoints: &[Endpoint]) -> String {
    endpoints
        .iter()
        .map(Endpoint::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Période demandée (paramètre `range`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BatchRange {
    #[value(name = "1m")]
    OneMonth,
    #[value(name = "3m")]
    ThreeMonths,
    #[value(name = "6m")]
    SixMonths,
    /// 1 an, la valeur historique du rapport
    #[default]
    #[value(name = "1y")]
    OneYear,
    #[value(name = "2y")]
    TwoYears,
    #[value(name = "5y")]
    FiveYears,
}

impl BatchRange {
    /// Convertit au format attendu par IEX Cloud (ex: "1y")
    pub fn as_iex_str(&self) -> &'static str {
        match self {
            BatchRange::OneMonth => "1m",
            BatchRange::ThreeMonths => "3m",
            BatchRange::SixMonths => "6m",
            BatchRange::OneYear => "1y",
            BatchRange::TwoYears => "2y",
            BatchRange::FiveYears => "5y",
        }
    }
}
