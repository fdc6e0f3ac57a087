use std::borrow::Cow;
use std::io;
use waitlist_derive::waitlist_error;

#[waitlist_error]
pub enum SheetError {
    #[error("Sheet I/O failed{}: {source}", format_context(.context))]
    Io { source: io::Error, context: Option<Cow<'static, str>> },

    #[error("Sheet not found{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal sheet error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_sheet() -> Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
}

#[test]
fn context_is_attached_to_source_errors() {
    let err = read_sheet().context("Reading registrations.xlsx").unwrap_err();

    assert!(matches!(err, SheetError::Io { .. }));
    assert_eq!(err.to_string(), "Sheet I/O failed (Reading registrations.xlsx): denied");
}

#[test]
fn question_mark_converts_sources_without_context() {
    fn load() -> Result<(), SheetError> {
        read_sheet()?;
        Ok(())
    }

    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "Sheet I/O failed: denied");
}

#[test]
fn context_overrides_existing_error_context() {
    let result: Result<(), SheetError> =
        Err(SheetError::Missing { message: "Registrations".into(), context: None });

    let err = result.context("Opening export").unwrap_err();
    assert_eq!(err.to_string(), "Sheet not found (Opening export): Registrations");
}

#[test]
fn strings_convert_into_internal_variant() {
    let from_static: SheetError = "unexpected layout".into();
    let from_owned: SheetError = String::from("bad header").into();

    assert!(matches!(from_static, SheetError::Internal { .. }));
    assert_eq!(from_owned.to_string(), "Internal sheet error: bad header");
}

#[test]
fn ui_expansion_compiles() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/waitlist_error_pass.rs");
}
