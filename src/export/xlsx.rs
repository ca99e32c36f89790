// ============================================================================
// Export Excel
// ============================================================================
// Écrit une ReportTable dans un classeur d'une seule feuille :
//
//   | Ticker | Company Name | Stock Price | Dividend Yield |
//   | MSFT   | Microsoft... |      420.5  |          0.007 |
//
// Les nombres sont écrits tels quels (le rendement reste une fraction) ;
// l'affichage "$" et "%" vient des formats conditionnels.
//
// CONCEPT RUST : séparation construction / sauvegarde
// - build_workbook() ne touche pas au disque, testable en mémoire
// - write_workbook() sauvegarde une seule fois à la fin
// ============================================================================

use std::path::Path;

use rust_xlsxwriter::{ConditionalFormatBlank, RowNum, Workbook, Worksheet};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::export::styles::{
    style_plan, StyleRange, COLUMN_WIDTHS, COL_COMPANY, COL_PRICE, COL_TICKER, COL_YIELD,
};
use crate::models::ReportTable;

/// En-têtes de colonnes, dans l'ordre A à D
pub const HEADERS: [&str; 4] = ["Ticker", "Company Name", "Stock Price", "Dividend Yield"];

/// Construit le classeur en mémoire
pub fn build_workbook(table: &ReportTable, sheet_name: &str) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        write_rows(worksheet, table)?;

        let plan = style_plan(table.len());
        for range in &plan {
            apply_style(worksheet, range)?;
        }
        debug!(ranges = ?plan.iter().map(StyleRange::to_a1).collect::<Vec<_>>(), "Applied style ranges");

        for (col, width) in COLUMN_WIDTHS {
            worksheet.set_column_width(col, width)?;
        }
    }

    Ok(workbook)
}

/// Construit puis sauvegarde le classeur
///
/// La sauvegarde est l'unique écriture sur disque : si une étape échoue
/// avant, aucun fichier n'est produit.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn write_workbook(table: &ReportTable, path: &Path, sheet_name: &str) -> Result<()> {
    let mut workbook = build_workbook(table, sheet_name)?;
    workbook.save(path)?;

    info!(path = %path.display(), "Workbook saved");
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, table: &ReportTable) -> Result<()> {
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in table.iter().enumerate() {
        let r = i as RowNum + 1;
        worksheet.write_string(r, COL_TICKER, &row.ticker)?;
        worksheet.write_string(r, COL_COMPANY, &row.company_name)?;
        worksheet.write_number(r, COL_PRICE, row.price)?;
        worksheet.write_number(r, COL_YIELD, row.dividend_yield)?;
    }
    Ok(())
}

/// Applique un template sur une plage via un format conditionnel "non vide"
fn apply_style(worksheet: &mut Worksheet, range: &StyleRange) -> Result<()> {
    let rule = ConditionalFormatBlank::new()
        .invert()
        .set_format(range.template.format());

    worksheet.add_conditional_format(
        range.first_row,
        range.first_col,
        range.last_row,
        range.last_col,
        &rule,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportRow;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use std::io::Read;

    fn sample_table() -> ReportTable {
        ReportTable::from(vec![
            ReportRow::new("AAA".into(), "Alpha Co".into(), 10.5, 0.02),
            ReportRow::new("BBB".into(), "Beta Co".into(), 20.0, 0.0),
            ReportRow::new("CCC".into(), "Gamma Co".into(), 99.99, 0.015),
        ])
    }

    fn table_of(n: usize) -> ReportTable {
        ReportTable::from(
            (0..n)
                .map(|i| ReportRow::new(format!("T{i}"), format!("Co {i}"), 10.0 + i as f64, 0.01))
                .collect::<Vec<_>>(),
        )
    }

    /// XML de la feuille tel qu'il est écrit dans l'archive .xlsx
    fn sheet_xml(table: &ReportTable) -> String {
        let mut workbook = build_workbook(table, "Stock Market Data").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    fn read_back(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock_market_data.xlsx");
        let table = sample_table();

        write_workbook(&table, &path, "Stock Market Data").unwrap();
        let rows = read_back(&path, "Stock Market Data");

        assert_eq!(rows.len(), table.len() + 1);
        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, HEADERS);

        for (cells, expected) in rows[1..].iter().zip(table.iter()) {
            assert_eq!(cells[0], Data::String(expected.ticker.clone()));
            assert_eq!(cells[1], Data::String(expected.company_name.clone()));
            assert_eq!(cells[2], Data::Float(expected.price));
            // Le rendement reste la fraction stockée (0.015, pas 1.5)
            assert_eq!(cells[3], Data::Float(expected.dividend_yield));
        }
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        write_workbook(&ReportTable::new(), &path, "Stock Market Data").unwrap();
        let rows = read_back(&path, "Stock Market Data");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_invalid_sheet_name_is_rejected() {
        // Excel interdit les caractères [ ] : * ? / \ dans les noms de feuilles
        let result = build_workbook(&sample_table(), "bad/name");
        assert!(result.is_err());
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("report.xlsx");

        let result = write_workbook(&sample_table(), &path, "Stock Market Data");
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_written_style_ranges_for_ten_rows() {
        let xml = sheet_xml(&table_of(10));

        for range in ["A1:D1", "A2:B11", "C2:C11", "D2:D11"] {
            assert!(xml.contains(&format!("sqref=\"{range}\"")), "missing {range}");
        }
        assert_eq!(xml.matches("notContainsBlanks").count(), 4);
    }

    #[test]
    fn test_written_style_ranges_follow_row_count() {
        let xml = sheet_xml(&table_of(2));

        for range in ["A1:D1", "A2:B3", "C2:C3", "D2:D3"] {
            assert!(xml.contains(&format!("sqref=\"{range}\"")), "missing {range}");
        }
        assert!(!xml.contains("A2:B11"));
    }

    #[test]
    fn test_written_column_widths() {
        let xml = sheet_xml(&table_of(2));

        // Excel stocke la largeur avec le padding des pixels : 32 -> 32.7109375
        for (col, width) in [(2, "32.7109375"), (3, "18.7109375"), (4, "20.7109375")] {
            assert!(xml.contains(&format!("<col min=\"{col}\" max=\"{col}\" width=\"{width}\"")));
        }
        assert!(!xml.contains("<col min=\"1\""));
    }

    #[test]
    fn test_build_workbook_in_memory() {
        let mut workbook = build_workbook(&sample_table(), "Stock Market Data").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();
        // Un .xlsx est une archive zip
        assert_eq!(&bytes[..2], b"PK");
    }
}
