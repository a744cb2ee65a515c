//! Deterministic in-memory workbook fixtures for the conversion tests. The
//! `generate_xlsx_fixtures` bin writes a matching on-disk set for manual
//! poking with curl.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, XlsxError};

/// Three fully populated rows plus a second sheet that is not converted.
pub fn build_cases_baseline_fixture_bytes() -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  apply_deterministic_fixture_properties(&mut workbook)?;
  let sheet = workbook.add_worksheet();
  sheet.set_name("Test Cases")?;
  write_header_row(
    sheet,
    &[
      "Test Case ID",
      "Title",
      "Preconditions",
      "Test Steps",
      "Expected Result",
      "Priority",
      "Created By",
      "Created Date",
    ],
  )?;
  write_case_row(
    sheet,
    1,
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
  )?;
  write_case_row(
    sheet,
    2,
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
  )?;
  write_case_row(
    sheet,
    3,
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
  )?;

  let notes_sheet = workbook.add_worksheet();
  notes_sheet.set_name("Notes")?;
  notes_sheet.write_string(0, 0, "Exported from the ticket tracker")?;

  workbook.save_to_buffer()
}

/// Synonym headers, a blank row, a missing expected result, an unrecognized
/// priority, an unparseable date, and an extra unrecognized column.
pub fn build_cases_messy_fixture_bytes() -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  apply_deterministic_fixture_properties(&mut workbook)?;
  let sheet = workbook.add_worksheet();
  sheet.set_name("Sheet1")?;
  write_header_row(
    sheet,
    &[
      "ID",
      "Test Case Name",
      "Pre-Conditions",
      "Action",
      "Expected Outcome",
      "Priority",
      "Author",
      "Created On",
      "Release Notes",
    ],
  )?;
  // Row 2 intentionally left blank.
  write_case_row(
    sheet,
    2,
    &[
      "TC-101",
      "Verify password reset request",
      "User email is registered",
      "1. Click forgot password 2. Submit the registered email",
      "Reset instructions are sent",
      "High",
      "qa.lead",
      "2026-02-10",
      "shipped in sprint 14",
    ],
  )?;
  write_case_row(
    sheet,
    3,
    &[
      "TC-102",
      "Check session timeout",
      "",
      "- Log in\n- Stay idle past the timeout\n- Refresh the page",
      "User is redirected to the login page",
      "Urgent",
      "qa.lead",
      "2026-02-12",
      "",
    ],
  )?;
  write_case_row(
    sheet,
    4,
    &[
      "TC-103",
      "Validate remember me option",
      "User account exists",
      "1. Log in with remember me checked 2. Reopen the browser",
      "",
      "Medium",
      "qa.junior",
      "2026-02-12",
      "",
    ],
  )?;
  write_case_row(
    sheet,
    5,
    &[
      "TC-104",
      "Verify required field validation",
      "",
      "Submit the login form with both fields empty",
      "Field-level validation errors are shown",
      "Low",
      "",
      "next sprint",
      "",
    ],
  )?;

  workbook.save_to_buffer()
}

/// Two rows sharing one id; the first occurrence wins.
pub fn build_cases_duplicate_fixture_bytes() -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  apply_deterministic_fixture_properties(&mut workbook)?;
  let sheet = workbook.add_worksheet();
  sheet.set_name("Test Cases")?;
  write_header_row(
    sheet,
    &[
      "Test Case ID",
      "Title",
      "Preconditions",
      "Test Steps",
      "Expected Result",
      "Priority",
      "Created By",
      "Created Date",
    ],
  )?;
  write_case_row(
    sheet,
    1,
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
  )?;
  write_case_row(
    sheet,
    2,
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
  )?;

  workbook.save_to_buffer()
}

/// A workbook with one sheet and no content at all.
pub fn build_empty_fixture_bytes() -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  apply_deterministic_fixture_properties(&mut workbook)?;
  let sheet = workbook.add_worksheet();
  sheet.set_name("Test Cases")?;
  workbook.save_to_buffer()
}

fn write_header_row(
  sheet: &mut rust_xlsxwriter::Worksheet,
  headers: &[&str],
) -> Result<(), XlsxError> {
  for (col, header) in headers.iter().enumerate() {
    sheet.write_string(0, col as u16, *header)?;
  }
  Ok(())
}

fn write_case_row(
  sheet: &mut rust_xlsxwriter::Worksheet,
  row: u32,
  cells: &[&str],
) -> Result<(), XlsxError> {
  for (col, cell) in cells.iter().enumerate() {
    if !cell.is_empty() {
      sheet.write_string(row, col as u16, *cell)?;
    }
  }
  Ok(())
}

fn apply_deterministic_fixture_properties(
  workbook: &mut Workbook,
) -> Result<(), XlsxError> {
  let creation_time = ExcelDateTime::from_ymd(2026, 1, 1)?;
  let properties = DocProperties::new()
    .set_creation_datetime(&creation_time)
    .set_author("testcase-core-rs fixture generator")
    .set_comment("Deterministic fixture workbook");
  workbook.set_properties(&properties);
  Ok(())
}
