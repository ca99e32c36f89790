// ============================================================================
// Structures : ReportRow et ReportTable
// ============================================================================
// Une ligne par ticker : symbole, nom de la société, prix, rendement du
// dividende. La table conserve l'ordre d'insertion.
//
// CONCEPTS RUST :
// 1. #[derive(PartialEq)] : comparer deux tables avec == (tests d'idempotence)
// 2. IntoIterator pour &ReportTable : `for row in &table { ... }`
// ============================================================================

/// Une ligne du rapport
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Symbole du ticker (ex: "MSFT")
    pub ticker: String,

    /// Nom de la société (ex: "Microsoft Corporation")
    pub company_name: String,

    /// Dernier prix en dollars
    pub price: f64,

    /// Rendement du dividende, en fraction (0.015 = 1.5%)
    /// 0.0 quand l'API ne le fournit pas
    pub dividend_yield: f64,
}

impl ReportRow {
    pub fn new(ticker: String, company_name: String, price: f64, dividend_yield: f64) -> Self {
        Self {
            ticker,
            company_name,
            price,
            dividend_yield,
        }
    }

    /// Formatte la ligne pour un affichage console
    pub fn display(&self) -> String {
        format!(
            "{:<8} {:<32} {:>10} {:>7}",
            self.ticker,
            self.company_name,
            format!("${:.2}", self.price),
            format!("{:.1}%", self.dividend_yield * 100.0)
        )
    }
}

/// Table ordonnée de lignes, une par ticker
///
/// L'unicité des tickers n'est pas vérifiée : un ticker présent deux fois
/// dans la liste d'entrée produit deux lignes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une ligne en fin de table
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportRow> {
        self.rows.iter()
    }

    /// Liste des tickers dans l'ordre de la table
    pub fn tickers(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.ticker.as_str()).collect()
    }
}

impl From<Vec<ReportRow>> for ReportTable {
    fn from(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }
}

impl<'a> IntoIterator for &'a ReportTable {
    type Item = &'a ReportRow;
    type IntoIter = std::slice::Iter<'a, ReportRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
