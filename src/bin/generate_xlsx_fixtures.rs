use std::{error::Error, fs, path::PathBuf};

use rust_xlsxwriter::Workbook;

const CASE_HEADERS: [&str; 8] = [
  "Test Case ID",
  "Title",
  "Preconditions",
  "Test Steps",
  "Expected Result",
  "Priority",
  "Created By",
  "Created Date",
];

fn main() -> Result<(), Box<dyn Error>> {
  let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
  fs::create_dir_all(&fixtures_dir)?;

  write_cases_baseline_fixture(&fixtures_dir)?;
  write_cases_duplicate_fixture(&fixtures_dir)?;
  write_cases_empty_fixture(&fixtures_dir)?;

  println!(
    "generated_xlsx_fixtures: {{\"dir\":\"{}\",\"files\":[\"cases_baseline.xlsx\",\"cases_duplicate.xlsx\",\"cases_empty.xlsx\"]}}",
    fixtures_dir.display(),
  );
  Ok(())
}

fn write_cases_baseline_fixture(fixtures_dir: &PathBuf) -> Result<(), Box<dyn Error>> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Test Cases")?;
  write_rows(
    sheet,
    &[
      &CASE_HEADERS,
      &[
        "TC-001",
        "Verify login functionality",
        "User account exists and is active",
        "1. Open the login page\n2. Enter valid credentials\n3. Click the login button",
        "User is redirected to the dashboard",
        "High",
        "qa.lead",
        "2026-02-10",
      ],
      &[
        "TC-002",
        "Validate incorrect login",
        "User account does not exist",
        "1. Open the login page\n2. Enter invalid credentials\n3. Click the login button",
        "An error message is displayed",
        "High",
        "qa.lead",
        "2026-02-10",
      ],
      &[
        "TC-003",
        "Verify logout functionality",
        "User is logged in",
        "1. Click the logout button\n2. Observe the redirect",
        "User is returned to the login page",
        "Medium",
        "qa.junior",
        "2026-02-11",
      ],
    ],
  )?;
  workbook.save(fixtures_dir.join("cases_baseline.xlsx"))?;
  Ok(())
}

fn write_cases_duplicate_fixture(fixtures_dir: &PathBuf) -> Result<(), Box<dyn Error>> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Test Cases")?;
  write_rows(
    sheet,
    &[
      &CASE_HEADERS,
      &[
        "TC-001",
        "Verify login functionality",
        "User account exists",
        "1. Open the login page 2. Log in",
        "User is redirected to the dashboard",
        "High",
        "qa.lead",
        "2026-02-10",
      ],
      &[
        "TC-001",
        "Duplicate of the login case",
        "User account exists",
        "1. Open the login page 2. Log in again",
        "User is redirected to the dashboard",
        "High",
        "qa.lead",
        "2026-02-10",
      ],
    ],
  )?;
  workbook.save(fixtures_dir.join("cases_duplicate.xlsx"))?;
  Ok(())
}

fn write_cases_empty_fixture(fixtures_dir: &PathBuf) -> Result<(), Box<dyn Error>> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Test Cases")?;
  workbook.save(fixtures_dir.join("cases_empty.xlsx"))?;
  Ok(())
}

fn write_rows(
  sheet: &mut rust_xlsxwriter::Worksheet,
  rows: &[&[&str; 8]],
) -> Result<(), Box<dyn Error>> {
  for (row_index, row) in rows.iter().enumerate() {
    for (col_index, cell) in row.iter().enumerate() {
      if !cell.is_empty() {
        sheet.write_string(row_index as u32, col_index as u16, *cell)?;
      }
    }
  }
  Ok(())
}
