// 📒 Expense Workbook - spreadsheet persistence
//
// Layout of the first worksheet:
//   row 1      header (Name | Amount | Category)
//   row 2..    one expense per row, columns A=name, B=amount, C=category
//
// calamine reads existing files; rust_xlsxwriter writes whole workbooks, so
// every save rewrites the header, all rows and (optionally) the chart.

use crate::entities::Expense;
use crate::error::ExpenseError;
use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Chart, ChartType, Workbook};
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_HEADER: [&str; 3] = ["Name", "Amount", "Category"];

const NAME_COL: u16 = 0;
const AMOUNT_COL: u16 = 1;
const CATEGORY_COL: u16 = 2;

// ============================================================================
// CHART
// ============================================================================

/// Bar chart of amount-by-row against category-by-row
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    /// Zero-based anchor cell (row, col); (1, 4) is E2
    pub anchor: (u32, u16),
}

impl Default for ChartSpec {
    fn default() -> Self {
        ChartSpec {
            title: "Expenses by Category".to_string(),
            anchor: (1, 4),
        }
    }
}

// ============================================================================
// SHEET
// ============================================================================

/// In-memory copy of the expense worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSheet {
    pub sheet_name: String,
    pub header: Vec<String>,
    pub expenses: Vec<Expense>,
    /// Set when the file holds content outside the expense columns;
    /// such a workbook is read but never rewritten
    pub rewrite_blocker: Option<String>,
}

impl Default for ExpenseSheet {
    fn default() -> Self {
        ExpenseSheet {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            header: DEFAULT_HEADER.iter().map(|h| h.to_string()).collect(),
            expenses: Vec::new(),
            rewrite_blocker: None,
        }
    }
}

impl ExpenseSheet {
    /// Read every row after the header of the first worksheet
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExpenseError::WorkbookNotFound(path.to_path_buf()).into());
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ExpenseError::EmptyWorkbook(path.to_path_buf()))?;

        let mut blockers = Vec::new();
        if sheet_names.len() > 1 {
            blockers.push(format!("it has {} worksheets", sheet_names.len()));
        }

        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read worksheet '{}'", sheet_name))?;

        let cell = |row: u32, col: u16| range.get_value((row, col as u32));

        let mut header: Vec<String> = [NAME_COL, AMOUNT_COL, CATEGORY_COL]
            .iter()
            .map(|&col| cell(0, col).map(cell_text).unwrap_or_default())
            .collect();
        if header.iter().all(|h| h.is_empty()) {
            header = DEFAULT_HEADER.iter().map(|h| h.to_string()).collect();
        }

        let mut expenses = Vec::new();
        if let Some((last_row, last_col)) = range.end() {
            let beyond_category = (0..=last_row).any(|row| {
                (CATEGORY_COL as u32 + 1..=last_col)
                    .any(|col| !is_blank(range.get_value((row, col))))
            });
            if beyond_category {
                blockers.push("it has cells beyond column C".to_string());
            }

            let mut blank_row = None;
            for row in 1..=last_row {
                let name = cell(row, NAME_COL);
                let amount = cell(row, AMOUNT_COL);
                let category = cell(row, CATEGORY_COL);

                if [name, amount, category].iter().all(|c| is_blank(*c)) {
                    blank_row.get_or_insert(row + 1);
                    continue;
                }
                if let Some(blank) = blank_row.take() {
                    blockers.push(format!("row {} is blank between expenses", blank));
                }

                let amount = parse_amount(amount, row + 1)?;
                expenses.push(Expense::from_row(
                    name.map(cell_text).unwrap_or_default(),
                    amount,
                    category.map(cell_text).unwrap_or_default(),
                ));
            }
        }

        let formulas = workbook
            .worksheet_formula(&sheet_name)
            .with_context(|| format!("Failed to read formulas of '{}'", sheet_name))?;
        if formulas.rows().flatten().any(|f| !f.is_empty()) {
            blockers.push("it contains formulas".to_string());
        }

        let rewrite_blocker = if blockers.is_empty() {
            None
        } else {
            Some(blockers.join(", "))
        };

        debug!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = expenses.len(),
            rewritable = rewrite_blocker.is_none(),
            "workbook loaded"
        );

        Ok(ExpenseSheet {
            sheet_name,
            header,
            expenses,
            rewrite_blocker,
        })
    }

    /// Header plus data rows
    pub fn row_count(&self) -> usize {
        self.expenses.len() + 1
    }

    /// Rewrite the workbook with header, rows and an optional chart
    ///
    /// Fails with [`ExpenseError::UnsupportedWorkbook`], leaving the file
    /// untouched, when the sheet was opened with a rewrite blocker.
    pub fn save(&self, path: &Path, chart: Option<&ChartSpec>) -> Result<()> {
        if let Some(reason) = &self.rewrite_blocker {
            return Err(ExpenseError::UnsupportedWorkbook {
                path: path.to_path_buf(),
                reason: reason.clone(),
            }
            .into());
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.as_str())?;

        for (col, title) in self.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, title.as_str())?;
        }

        for (i, expense) in self.expenses.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, NAME_COL, expense.name.as_str())?;
            worksheet.write_number(row, AMOUNT_COL, expense.amount)?;
            worksheet.write_string(row, CATEGORY_COL, expense.category.as_str())?;
        }

        if let Some(spec) = chart {
            if self.expenses.is_empty() {
                warn!(path = %path.display(), "no expenses yet, skipping chart");
            } else {
                let chart = self.build_chart(spec);
                worksheet.insert_chart(spec.anchor.0, spec.anchor.1, &chart)?;
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("Failed to save workbook: {}", path.display()))?;

        debug!(path = %path.display(), rows = self.row_count(), "workbook saved");
        Ok(())
    }

    fn build_chart(&self, spec: &ChartSpec) -> Chart {
        let sheet = self.sheet_name.as_str();
        let last_row = self.expenses.len() as u32;
        let series_name = self
            .header
            .get(AMOUNT_COL as usize)
            .map(String::as_str)
            .unwrap_or(DEFAULT_HEADER[1]);

        let mut chart = Chart::new(ChartType::Column);
        chart.title().set_name(spec.title.as_str());
        chart
            .add_series()
            .set_name(series_name)
            .set_categories((sheet, 1, CATEGORY_COL, last_row, CATEGORY_COL))
            .set_values((sheet, 1, AMOUNT_COL, last_row, AMOUNT_COL));
        chart
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Create a workbook holding only the header row
pub fn init_workbook(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(ExpenseError::AlreadyExists(path.to_path_buf()).into());
    }

    ExpenseSheet::default().save(path, None)?;
    info!(path = %path.display(), "workbook initialized");
    Ok(())
}

/// Open the existing workbook, add one row, save
pub fn append_expense(path: &Path, expense: &Expense) -> Result<usize> {
    append_expenses(path, std::slice::from_ref(expense))
}

/// Append a batch with a single save; returns the new row count
pub fn append_expenses(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let mut sheet = ExpenseSheet::open(path)?;
    sheet.expenses.extend_from_slice(expenses);
    sheet.save(path, None)?;

    info!(
        path = %path.display(),
        appended = expenses.len(),
        rows = sheet.row_count(),
        "expenses appended"
    );
    Ok(sheet.row_count())
}

/// Redraw the expense chart into the workbook
///
/// A workbook that cannot be rewritten safely is left as is and only read.
pub fn render_chart(path: &Path) -> Result<ExpenseSheet> {
    let sheet = ExpenseSheet::open(path)?;
    match &sheet.rewrite_blocker {
        Some(reason) => warn!(
            path = %path.display(),
            %reason,
            "workbook not rewritable, skipping chart"
        ),
        None => sheet.save(path, Some(&ChartSpec::default()))?,
    }
    Ok(sheet)
}

// ============================================================================
// CELL HELPERS
// ============================================================================

fn is_blank(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// `row` is the 1-based spreadsheet row, used for error reporting
fn parse_amount(cell: Option<&Data>, row: u32) -> Result<f64, ExpenseError> {
    match cell {
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(Data::String(s)) => s.trim().parse().map_err(|_| ExpenseError::MalformedRow {
            row,
            reason: format!("amount {:?} is not a number", s),
        }),
        None | Some(Data::Empty) => Err(ExpenseError::MalformedRow {
            row,
            reason: "amount is missing".to_string(),
        }),
        Some(other) => Err(ExpenseError::MalformedRow {
            row,
            reason: format!("amount {} is not a number", other),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Category;
    use crate::summary::summarize;
    use chrono::NaiveDate;
    use rust_xlsxwriter::Formula;
    use std::fs::File;
    use std::io::Read;
    use tempfile::TempDir;

    /// Contents of one part of the xlsx zip package, if present
    fn package_part(path: &Path, name: &str) -> Option<String> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut part = archive.by_name(name).ok()?;
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        Some(xml)
    }

    fn temp_workbook() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.xlsx");
        init_workbook(&path, false).unwrap();
        (dir, path)
    }

    #[test]
    fn test_init_creates_header_only_sheet() {
        let (_dir, path) = temp_workbook();
        let sheet = ExpenseSheet::open(&path).unwrap();

        assert_eq!(sheet.header, vec!["Name", "Amount", "Category"]);
        assert!(sheet.expenses.is_empty());
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let (_dir, path) = temp_workbook();
        append_expense(&path, &Expense::new("Lunch", 9.5, Category::Food)).unwrap();

        let err = init_workbook(&path, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExpenseError>(),
            Some(ExpenseError::AlreadyExists(_))
        ));

        init_workbook(&path, true).unwrap();
        assert_eq!(ExpenseSheet::open(&path).unwrap().row_count(), 1);
    }

    #[test]
    fn test_append_n_expenses_yields_n_plus_one_rows() {
        let (_dir, path) = temp_workbook();
        let expenses = [
            Expense::new("Groceries", 54.20, Category::Food),
            Expense::new("Rent", 900.0, Category::Home),
            Expense::new("Concert", 45.0, Category::Fun),
        ];

        for (i, expense) in expenses.iter().enumerate() {
            let rows = append_expense(&path, expense).unwrap();
            assert_eq!(rows, i + 2);
        }

        let sheet = render_chart(&path).unwrap();
        assert_eq!(sheet.row_count(), expenses.len() + 1);
        assert_eq!(sheet.expenses, expenses.to_vec());

        // chart redraw must not change the data
        let reopened = ExpenseSheet::open(&path).unwrap();
        assert_eq!(reopened.row_count(), expenses.len() + 1);
    }

    #[test]
    fn test_append_batch() {
        let (_dir, path) = temp_workbook();
        let batch = vec![
            Expense::new("Bus", 2.75, Category::Work),
            Expense::new("Stamps", 8.0, Category::Misc),
        ];

        assert_eq!(append_expenses(&path, &batch).unwrap(), 3);
        assert_eq!(ExpenseSheet::open(&path).unwrap().expenses, batch);
    }

    #[test]
    fn test_missing_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xlsx");

        let err = append_expense(&path, &Expense::new("x", 1.0, Category::Misc)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExpenseError>(),
            Some(ExpenseError::WorkbookNotFound(_))
        ));
    }

    #[test]
    fn test_chart_skipped_on_empty_sheet() {
        let (_dir, path) = temp_workbook();
        let sheet = render_chart(&path).unwrap();

        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_reads_hand_written_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manual.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Budget").unwrap();
        worksheet.write_string(0, 0, "What").unwrap();
        worksheet.write_string(0, 1, "How much").unwrap();
        worksheet.write_string(0, 2, "Bucket").unwrap();
        worksheet.write_string(1, 0, "Taxi").unwrap();
        worksheet.write_string(1, 1, " 18.5 ").unwrap();
        worksheet.write_string(1, 2, "🚕 Travel").unwrap();
        worksheet.write_string(3, 0, "Snacks").unwrap();
        worksheet.write_number(3, 1, 4).unwrap();
        worksheet.write_string(3, 2, "🍔 Food").unwrap();
        workbook.save(&path).unwrap();

        let sheet = ExpenseSheet::open(&path).unwrap();

        assert_eq!(sheet.sheet_name, "Budget");
        assert_eq!(
            sheet.rewrite_blocker.as_deref(),
            Some("row 3 is blank between expenses")
        );
        assert_eq!(sheet.header, vec!["What", "How much", "Bucket"]);
        assert_eq!(
            sheet.expenses,
            vec![
                Expense::from_row("Taxi", 18.5, "🚕 Travel"),
                Expense::from_row("Snacks", 4.0, "🍔 Food"),
            ]
        );
    }

    #[test]
    fn test_malformed_amount_reports_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, title) in DEFAULT_HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title).unwrap();
        }
        worksheet.write_string(1, 0, "Ok").unwrap();
        worksheet.write_number(1, 1, 1.0).unwrap();
        worksheet.write_string(1, 2, "🍔 Food").unwrap();
        worksheet.write_string(2, 0, "Bad").unwrap();
        worksheet.write_string(2, 1, "lots").unwrap();
        worksheet.write_string(2, 2, "🍔 Food").unwrap();
        workbook.save(&path).unwrap();

        let err = ExpenseSheet::open(&path).unwrap_err();
        match err.downcast_ref::<ExpenseError>() {
            Some(ExpenseError::MalformedRow { row, .. }) => assert_eq!(*row, 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_chart_written_with_expense_ranges() {
        let (_dir, path) = temp_workbook();
        append_expenses(
            &path,
            &[
                Expense::new("Groceries", 54.20, Category::Food),
                Expense::new("Rent", 900.0, Category::Home),
                Expense::new("Concert", 45.0, Category::Fun),
            ],
        )
        .unwrap();
        assert!(package_part(&path, "xl/charts/chart1.xml").is_none());

        render_chart(&path).unwrap();

        let chart = package_part(&path, "xl/charts/chart1.xml").expect("chart part");
        assert!(chart.contains("Expenses by Category"));
        assert!(chart.contains(r#"<c:barDir val="col"/>"#));
        assert!(chart.contains("<c:f>Sheet1!$B$2:$B$4</c:f>"));
        assert!(chart.contains("<c:f>Sheet1!$C$2:$C$4</c:f>"));

        let drawing = package_part(&path, "xl/drawings/drawing1.xml").expect("drawing part");
        let from = &drawing[drawing.find("<xdr:from>").unwrap()..drawing.find("</xdr:from>").unwrap()];
        assert!(from.contains("<xdr:col>4</xdr:col>"));
        assert!(from.contains("<xdr:row>1</xdr:row>"));
    }

    #[test]
    fn test_no_chart_part_for_empty_sheet() {
        let (_dir, path) = temp_workbook();
        ExpenseSheet::open(&path)
            .unwrap()
            .save(&path, Some(&ChartSpec::default()))
            .unwrap();

        assert!(package_part(&path, "xl/charts/chart1.xml").is_none());
        assert!(package_part(&path, "xl/worksheets/sheet1.xml").is_some());
    }

    #[test]
    fn test_extra_sheet_and_column_survive_append_and_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1").unwrap();
        for (col, title) in DEFAULT_HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title).unwrap();
        }
        worksheet.write_string(0, 3, "Notes").unwrap();
        worksheet.write_string(1, 0, "Gas").unwrap();
        worksheet.write_number(1, 1, 40.0).unwrap();
        worksheet.write_string(1, 2, "💼 Work").unwrap();
        worksheet.write_string(1, 3, "paid by check").unwrap();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "keep me").unwrap();
        workbook.save(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = append_expense(&path, &Expense::new("Lunch", 9.5, Category::Food)).unwrap_err();
        match err.downcast_ref::<ExpenseError>() {
            Some(ExpenseError::UnsupportedWorkbook { reason, .. }) => {
                assert!(reason.contains("2 worksheets"));
                assert!(reason.contains("beyond column C"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let summary = summarize(&path, 2000.0, today).unwrap();
        assert_eq!(summary.total_spent, 40.0);

        assert_eq!(std::fs::read(&path).unwrap(), before);

        let mut reopened: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(reopened.sheet_names(), vec!["Sheet1", "Notes"]);
        let range = reopened.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.get_value((0, 3)), Some(&Data::String("Notes".to_string())));
        assert_eq!(
            range.get_value((1, 3)),
            Some(&Data::String("paid by check".to_string()))
        );
    }

    #[test]
    fn test_formulas_block_rewrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("formulas.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, title) in DEFAULT_HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title).unwrap();
        }
        worksheet.write_string(1, 0, "Split bill").unwrap();
        worksheet
            .write_formula(1, 1, Formula::new("=60/2").set_result("30"))
            .unwrap();
        worksheet.write_string(1, 2, "🎉 Fun").unwrap();
        workbook.save(&path).unwrap();

        let sheet = ExpenseSheet::open(&path).unwrap();
        assert_eq!(sheet.rewrite_blocker.as_deref(), Some("it contains formulas"));

        let err = append_expense(&path, &Expense::new("Lunch", 9.5, Category::Food)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExpenseError>(),
            Some(ExpenseError::UnsupportedWorkbook { .. })
        ));
    }
}
