use std::fs;
use tempfile::tempdir;
use waitlist_spreadsheet::{SheetRow, Spreadsheet, SpreadsheetError};

fn row(name: &str, email: &str) -> SheetRow {
    SheetRow::exported_now(name, 30, email, "US", "California", "Technology")
}

#[tokio::test]
async fn missing_file_reads_as_empty() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let sheet = Spreadsheet::builder().dir(tmp.path().join("exports")).open().await;

    assert!(sheet.read_all().await?.is_empty());
    assert!(sheet.read_bytes().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn sequential_appends_accumulate_rows() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let dir = tmp.path().join("nested").join("exports");
    let sheet = Spreadsheet::builder().dir(&dir).open().await;

    for i in 0..5 {
        sheet.append(row("Grace Hopper", &format!("grace{i}@example.com"))).await?;
    }

    let rows = sheet.read_all().await?;
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].email, "grace0@example.com");
    assert_eq!(rows[4].email, "grace4@example.com");
    assert!(rows.iter().all(|r| r.age == 30 && r.registration_date.ends_with('Z')));
    assert!(dir.join("registrations.xlsx").is_file());
    Ok(())
}

#[tokio::test]
async fn deleted_file_is_recreated_with_new_rows_only() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let sheet = Spreadsheet::builder().dir(tmp.path()).open().await;

    sheet.append(row("First Person", "first@example.com")).await?;
    fs::remove_file(sheet.path())?;
    sheet.append(row("Second Person", "second@example.com")).await?;

    let rows = sheet.read_all().await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "second@example.com");
    Ok(())
}

#[tokio::test]
async fn corrupt_file_is_replaced_on_append() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let sheet = Spreadsheet::builder().dir(tmp.path()).file_name("custom.xlsx").open().await;

    fs::write(sheet.path(), b"definitely not xlsx")?;
    assert!(matches!(sheet.read_all().await, Err(SpreadsheetError::Decode { .. })));

    sheet.append(row("Alan Turing", "alan@example.com")).await?;
    assert_eq!(sheet.read_all().await?.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_appends_leave_a_decodable_file() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let sheet = Spreadsheet::builder().dir(tmp.path()).open().await;

    let (a, b) = tokio::join!(
        sheet.append(row("Left Writer", "left@example.com")),
        sheet.append(row("Right Writer", "right@example.com")),
    );
    a?;
    b?;

    let rows = sheet.read_all().await?;
    assert!((1..=2).contains(&rows.len()), "got {} rows", rows.len());

    let leftovers = fs::read_dir(tmp.path())?
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().contains(".sheettmp."))
        .count();
    assert_eq!(leftovers, 0);
    Ok(())
}

#[tokio::test]
async fn render_uses_the_configured_sheet_name() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let sheet = Spreadsheet::builder().dir(tmp.path()).sheet_name("Waitlist").open().await;

    let bytes = sheet.render(vec![row("Ada Lovelace", "ada@example.com")]).await?;
    fs::write(sheet.path(), &bytes)?;

    let rows = sheet.read_all().await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].full_name, "Ada Lovelace");
    Ok(())
}

#[tokio::test]
async fn oversized_cells_are_truncated_instead_of_failing() -> Result<(), SpreadsheetError> {
    let tmp = tempdir()?;
    let sheet = Spreadsheet::builder().dir(tmp.path()).open().await;

    let mut long = row("Ada Lovelace", "ada@example.com");
    long.state = "x".repeat(40_000);

    sheet.append(long.clone()).await?;
    sheet.append(row("Grace Hopper", "grace@example.com")).await?;

    let rows = sheet.read_all().await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].state.chars().count(), 32_767);
    assert_eq!(rows[0].email, "ada@example.com");
    assert_eq!(rows[1].state, "California");

    let bytes = sheet.render(vec![long]).await?;
    fs::write(sheet.path(), &bytes)?;
    assert_eq!(sheet.read_all().await?[0].state.len(), 32_767);
    Ok(())
}
