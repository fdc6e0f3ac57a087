use calamine::{Reader, Xlsx, open_workbook_from_rs};
use serde_json::{Value, json};
use std::io::Cursor;
use std::time::Duration;
use tempfile::TempDir;
use waitlist_database::Database;
use waitlist_domain::registration::NewRegistration;
use waitlist_domain::validation::{Field, RegistrationSchema};
use waitlist_registration::{
    MIGRATIONS, Registrar, RegistrationError, RegistrationStore, SurrealStore,
};
use waitlist_spreadsheet::Spreadsheet;

struct Harness {
    registrar: Registrar<SurrealStore>,
    _tmp: TempDir,
}

async fn harness_with(schema: RegistrationSchema) -> Harness {
    let database = Database::builder()
        .url("mem://")
        .session("waitlist", "registration")
        .migrations(MIGRATIONS)
        .init()
        .await
        .expect("in-memory database");
    let tmp = tempfile::tempdir().expect("tempdir");
    let sheet = Spreadsheet::builder().dir(tmp.path().join("exports")).open().await;

    Harness { registrar: Registrar::new(SurrealStore::new(database), sheet, schema), _tmp: tmp }
}

async fn harness() -> Harness {
    harness_with(RegistrationSchema::new()).await
}

fn submission(name: &str, email: &str) -> Value {
    json!({
        "fullName": name,
        "age": 34,
        "email": email,
        "country": "CA",
        "state": "Ontario",
        "industry": "Healthcare",
    })
}

#[tokio::test]
async fn valid_submission_is_stored_and_exported() {
    let h = harness().await;

    let receipt = h
        .registrar
        .register(&submission("Mary Jackson", "Mary.Jackson@Example.com"))
        .await
        .expect("registered");

    assert_eq!(receipt.id.len(), 12);
    assert_eq!(receipt.full_name, "Mary Jackson");
    assert_eq!(receipt.email, "mary.jackson@example.com");

    let users = h.registrar.list().await.expect("list");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, receipt.id);
    assert_eq!(users[0].email, "mary.jackson@example.com");
    assert_eq!(users[0].created_at, receipt.created_at);

    let rows = h.registrar.spreadsheet().read_all().await.expect("sheet rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "mary.jackson@example.com");
    assert_eq!(rows[0].age, 34);
    assert_eq!(rows[0].state, "Ontario");
}

#[tokio::test]
async fn case_variant_email_is_a_duplicate() {
    let h = harness().await;
    h.registrar.register(&submission("Mary Jackson", "mary@example.com")).await.expect("first");

    let err = h
        .registrar
        .register(&submission("Mary Jackson", "MARY@example.COM"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::Duplicate { .. }));
    assert_eq!(h.registrar.list().await.expect("list").len(), 1);
    assert_eq!(h.registrar.spreadsheet().read_all().await.expect("rows").len(), 1);
}

#[tokio::test]
async fn unique_index_rejects_a_racing_insert() {
    let h = harness().await;
    let submission = NewRegistration {
        full_name: "Dorothy Vaughan".to_owned(),
        age: 50,
        email: "dorothy@example.com".to_owned(),
        country: "US".to_owned(),
        state: "Virginia".to_owned(),
        industry: "Technology".to_owned(),
    };

    h.registrar.store().insert(&submission).await.expect("first insert");
    let err = h.registrar.store().insert(&submission).await.unwrap_err();

    assert!(matches!(err, RegistrationError::Duplicate { .. }));
}

#[tokio::test]
async fn every_violation_is_reported_and_nothing_stored() {
    let h = harness().await;

    let err = h
        .registrar
        .register(&json!({
            "fullName": "J",
            "age": 12,
            "email": "mary@example.com",
            "country": "CA",
            "state": "Ontario",
            "industry": "Healthcare",
        }))
        .await
        .unwrap_err();

    let RegistrationError::Validation { issues, .. } = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(issues.contains(Field::FullName));
    assert!(issues.contains(Field::Age));
    assert!(!issues.contains(Field::Email));
    assert!(h.registrar.list().await.expect("list").is_empty());
    assert!(h.registrar.spreadsheet().read_bytes().await.expect("read").is_none());
}

#[tokio::test]
async fn strict_schema_rejects_foreign_state() {
    let h = harness_with(RegistrationSchema::strict()).await;

    let err = h
        .registrar
        .register(&json!({
            "fullName": "Mary Jackson",
            "age": 34,
            "email": "mary@example.com",
            "country": "CA",
            "state": "Texas",
            "industry": "Healthcare",
        }))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::Validation { ref issues, .. } if issues.contains(Field::State)));
}

#[tokio::test]
async fn deleted_export_is_recreated_with_new_rows_only() {
    let h = harness().await;
    h.registrar.register(&submission("Mary Jackson", "mary@example.com")).await.expect("first");

    std::fs::remove_file(h.registrar.spreadsheet().path()).expect("delete export");

    h.registrar
        .register(&submission("Katherine Johnson", "katherine@example.com"))
        .await
        .expect("second registration succeeds");

    let rows = h.registrar.spreadsheet().read_all().await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "katherine@example.com");
    assert_eq!(h.registrar.list().await.expect("list").len(), 2);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let h = harness().await;
    h.registrar.register(&submission("Mary Jackson", "mary@example.com")).await.expect("first");
    tokio::time::sleep(Duration::from_millis(5)).await;
    h.registrar
        .register(&submission("Katherine Johnson", "katherine@example.com"))
        .await
        .expect("second");

    let users = h.registrar.list().await.expect("list");
    let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();

    assert_eq!(emails, ["katherine@example.com", "mary@example.com"]);
    assert!(users[0].created_at >= users[1].created_at);
}

#[tokio::test]
async fn download_requires_an_export() {
    let h = harness().await;

    let err = h.registrar.download().await.unwrap_err();
    assert!(matches!(err, RegistrationError::ExportMissing { .. }));

    h.registrar.register(&submission("Mary Jackson", "mary@example.com")).await.expect("stored");
    let bytes = h.registrar.download().await.expect("export exists");

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx");
    let range = workbook.worksheet_range("Registrations").expect("sheet");
    let users = h.registrar.list().await.expect("list");

    assert_eq!(range.height(), 1 + users.len());
    assert_eq!(range.get_value((1, 2)).map(ToString::to_string).as_deref(), Some(users[0].email.as_str()));
}

#[tokio::test]
async fn snapshot_reflects_the_store() {
    let h = harness().await;
    h.registrar.register(&submission("Mary Jackson", "mary@example.com")).await.expect("first");
    h.registrar
        .register(&submission("Katherine Johnson", "katherine@example.com"))
        .await
        .expect("second");
    std::fs::remove_file(h.registrar.spreadsheet().path()).expect("delete export");

    let bytes = h.registrar.export_snapshot().await.expect("snapshot");
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx");
    let range = workbook.worksheet_range("Registrations").expect("sheet");

    assert_eq!(range.height(), 3);
    let header: Vec<String> = (0..7)
        .map(|col| range.get_value((0, col)).map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(
        header,
        ["fullName", "age", "email", "country", "state", "industry", "registrationDate"]
    );
}

#[tokio::test]
async fn oversized_state_does_not_break_exports() {
    let h = harness().await;
    let mut long = submission("Dorothy Vaughan", "dorothy@example.com");
    long["state"] = json!("x".repeat(40_000));

    h.registrar.register(&long).await.expect("registered");
    h.registrar.register(&submission("Mary Jackson", "mary@example.com")).await.expect("second");

    let rows = h.registrar.spreadsheet().read_all().await.expect("sheet rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].state.len(), 32_767);

    let bytes = h.registrar.export_snapshot().await.expect("snapshot");
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx");
    let range = workbook.worksheet_range("Registrations").expect("sheet");
    assert_eq!(range.height(), 3);
}
