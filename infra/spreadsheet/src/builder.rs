use crate::engine::{Spreadsheet, SpreadsheetInner};
use crate::maintenance;
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::info;

pub const DEFAULT_FILE_NAME: &str = "registrations.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Registrations";

#[derive(Debug)]
pub struct NoDir;
#[derive(Debug)]
pub struct WithDir(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoDir {}
impl Sealed for WithDir {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct SpreadsheetBuilder<S: Sealed = NoDir> {
    state: S,
    file_name: String,
    sheet_name: String,
}

impl Default for SpreadsheetBuilder<NoDir> {
    fn default() -> Self {
        Self {
            state: NoDir,
            file_name: DEFAULT_FILE_NAME.to_owned(),
            sheet_name: DEFAULT_SHEET_NAME.to_owned(),
        }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> SpreadsheetBuilder<S> {
    #[must_use = "Sets the workbook file name inside the export directory"]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    #[must_use = "Sets the worksheet that holds the rows"]
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }
}

impl SpreadsheetBuilder<NoDir> {
    #[must_use = "Creates a new spreadsheet builder with default names"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the export directory"]
    pub fn dir(self, path: impl Into<PathBuf>) -> SpreadsheetBuilder<WithDir> {
        SpreadsheetBuilder {
            state: WithDir(path.into()),
            file_name: self.file_name,
            sheet_name: self.sheet_name,
        }
    }
}

impl SpreadsheetBuilder<WithDir> {
    /// Returns the handle and clears temporary files orphaned by interrupted writes.
    ///
    /// The export directory itself is created lazily on the first append.
    pub async fn open(self) -> Spreadsheet {
        let dir = self.state.0;
        if dir.is_dir() {
            maintenance::purge_tmp(&dir).await;
        }
        info!(dir = %dir.display(), file = %self.file_name, "Spreadsheet export configured");

        Spreadsheet {
            inner: Arc::new(SpreadsheetInner {
                dir,
                file_name: self.file_name,
                sheet_name: self.sheet_name,
                tmp_counter: AtomicU64::new(1),
            }),
        }
    }
}
