// ============================================================================
// Styles du classeur : templates et plages
// ============================================================================
// Quatre templates (en-tête, texte, dollar, pourcentage) appliqués par
// formats conditionnels "cellule non vide" sur des plages calculées à partir
// du nombre réel de lignes.
//
// L'ancienne version du rapport codait les plages en dur pour 10 lignes
// (A2:B11, C2:C11, D2:D11). style_plan(10) redonne exactement ces plages.
// ============================================================================

use rust_xlsxwriter::{Color, ColNum, Format, FormatBorder, RowNum};

/// Nombre de lignes de données pour lequel les anciennes plages fixes étaient correctes
pub const LEGACY_DATA_ROWS: usize = 10;

/// Colonnes du rapport (A à D)
pub const COL_TICKER: ColNum = 0;
pub const COL_COMPANY: ColNum = 1;
pub const COL_PRICE: ColNum = 2;
pub const COL_YIELD: ColNum = 3;

/// Largeurs de colonnes (B, C, D) ; A garde la largeur par défaut
pub const COLUMN_WIDTHS: [(ColNum, f64); 3] = [(COL_COMPANY, 32.0), (COL_PRICE, 18.0), (COL_YIELD, 20.0)];

const HEADER_BG: u32 = 0x135485;
const DATA_BG: u32 = 0xDADADA;

/// Template de présentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTemplate {
    /// Texte blanc sur fond bleu foncé, bordure
    Header,
    /// Fond gris clair, bordure
    Text,
    /// Comme Text, format "$0.00"
    Currency,
    /// Comme Text, format "0.0%" (0.015 s'affiche 1.5%)
    Percent,
}

impl StyleTemplate {
    /// Construit le Format rust_xlsxwriter correspondant
    pub fn format(&self) -> Format {
        match self {
            StyleTemplate::Header => Format::new()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_BG))
                .set_border(FormatBorder::Thin),
            StyleTemplate::Text => data_format(),
            StyleTemplate::Currency => data_format().set_num_format("$0.00"),
            StyleTemplate::Percent => data_format().set_num_format("0.0%"),
        }
    }
}

fn data_format() -> Format {
    Format::new()
        .set_background_color(Color::RGB(DATA_BG))
        .set_border(FormatBorder::Thin)
}

/// Plage rectangulaire (indices à partir de 0, bornes incluses) et son template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRange {
    pub first_row: RowNum,
    pub first_col: ColNum,
    pub last_row: RowNum,
    pub last_col: ColNum,
    pub template: StyleTemplate,
}

impl StyleRange {
    /// Notation Excel, ex: "A2:B11"
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.first_row + 1,
            column_letter(self.last_col),
            self.last_row + 1
        )
    }

    pub fn contains(&self, row: RowNum, col: ColNum) -> bool {
        (self.first_row..=self.last_row).contains(&row) && (self.first_col..=self.last_col).contains(&col)
    }
}

/// Calcule les plages à styler pour `row_count` lignes de données
///
/// La ligne 1 (index 0) est l'en-tête ; les données occupent les lignes 2 à
/// row_count + 1. Sans données, seul l'en-tête est stylé.
pub fn style_plan(row_count: usize) -> Vec<StyleRange> {
    let mut plan = vec![StyleRange {
        first_row: 0,
        first_col: COL_TICKER,
        last_row: 0,
        last_col: COL_YIELD,
        template: StyleTemplate::Header,
    }];

    if row_count == 0 {
        return plan;
    }

    let last_row = row_count as RowNum;
    let data = |first_col, last_col, template| StyleRange {
        first_row: 1,
        first_col,
        last_row,
        last_col,
        template,
    };

    plan.push(data(COL_TICKER, COL_COMPANY, StyleTemplate::Text));
    plan.push(data(COL_PRICE, COL_PRICE, StyleTemplate::Currency));
    plan.push(data(COL_YIELD, COL_YIELD, StyleTemplate::Percent));
    plan
}

/// Lettre de colonne Excel (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(col: ColNum) -> String {
    let mut n = col as u32 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
