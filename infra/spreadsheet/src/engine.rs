//! The [`Spreadsheet`] handle: read-modify-write of a single workbook file.

use crate::builder::SpreadsheetBuilder;
use crate::codec;
use crate::error::{SpreadsheetError, SpreadsheetErrorExt};
use crate::maintenance::TMP_MARKER;
use crate::row::SheetRow;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

/// The internal shared state of a [`Spreadsheet`] instance.
#[derive(Debug)]
pub struct SpreadsheetInner {
    pub(crate) dir: PathBuf,
    pub(crate) file_name: String,
    pub(crate) sheet_name: String,
    pub(crate) tmp_counter: AtomicU64,
}

impl SpreadsheetInner {
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Full path of the workbook file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// A cloneable handle to the registrations workbook.
///
/// Every append rewrites the whole file through a temporary sibling and a rename,
/// so readers never observe a half-written workbook. Appends are not serialized:
/// two concurrent appends may each start from the same snapshot and the later
/// rename wins.
///
/// ```rust
/// use waitlist_spreadsheet::{SheetRow, Spreadsheet, SpreadsheetError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), SpreadsheetError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let sheet = Spreadsheet::builder().dir(tmp.path().join("exports")).open().await;
///
///     sheet.append(SheetRow::exported_now("Ada Lovelace", 36, "ada@example.com", "GB", "England", "Technology")).await?;
///     assert_eq!(sheet.read_all().await?.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    pub(crate) inner: Arc<SpreadsheetInner>,
}

impl Deref for Spreadsheet {
    type Target = SpreadsheetInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Spreadsheet {
    #[must_use = "The spreadsheet is not usable until you call .open()"]
    pub fn builder() -> SpreadsheetBuilder {
        SpreadsheetBuilder::new()
    }

    /// Appends one row, creating the directory and the workbook as needed.
    ///
    /// An existing file that cannot be read or decoded is treated as empty and
    /// replaced; that case is logged at `warn`.
    ///
    /// # Errors
    ///
    /// Returns [`SpreadsheetError::Io`] when the directory or the file cannot be written,
    /// [`SpreadsheetError::Encode`] when the workbook cannot be serialized.
    #[instrument(skip_all, fields(file = %self.file_name, email = %row.email))]
    pub async fn append(&self, row: SheetRow) -> Result<(), SpreadsheetError> {
        fs::create_dir_all(&self.dir)
            .await
            .context(format!("Failed to create export directory: {}", self.dir.display()))?;

        let mut rows = self.load_for_append().await;
        rows.push(row);
        let total = rows.len();

        let bytes = self.render(rows).await?;
        self.write_atomic(&bytes).await?;

        debug!(rows = total, "Workbook rewritten");
        Ok(())
    }

    /// Decodes every data row of the current workbook. A missing file yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`SpreadsheetError::Io`] or [`SpreadsheetError::Decode`] when the file
    /// exists but cannot be read.
    pub async fn read_all(&self) -> Result<Vec<SheetRow>, SpreadsheetError> {
        match self.read_bytes().await? {
            Some(bytes) => self.decode(bytes).await,
            None => Ok(Vec::new()),
        }
    }

    /// Raw workbook bytes for download, `None` when nothing has been exported yet.
    ///
    /// # Errors
    ///
    /// Returns [`SpreadsheetError::Io`] for failures other than a missing file.
    pub async fn read_bytes(&self) -> Result<Option<Vec<u8>>, SpreadsheetError> {
        let path = self.path();
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SpreadsheetError::Io {
                source: err,
                context: Some(format!("Read failed: {}", path.display()).into()),
            }),
        }
    }

    /// Encodes an arbitrary set of rows with this handle's sheet name.
    ///
    /// # Errors
    ///
    /// Returns [`SpreadsheetError::Encode`] when serialization fails.
    pub async fn render(&self, rows: Vec<SheetRow>) -> Result<Vec<u8>, SpreadsheetError> {
        let sheet_name = self.sheet_name.clone();
        tokio::task::spawn_blocking(move || codec::encode(&sheet_name, &rows))
            .await
            .context("Encoding workbook")?
    }

    async fn decode(&self, bytes: Vec<u8>) -> Result<Vec<SheetRow>, SpreadsheetError> {
        let sheet_name = self.sheet_name.clone();
        tokio::task::spawn_blocking(move || codec::decode(&sheet_name, bytes))
            .await
            .context("Decoding workbook")?
    }

    async fn load_for_append(&self) -> Vec<SheetRow> {
        match self.read_all().await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(path = %self.path().display(), error = %err, "Existing workbook unreadable, starting a new one");
                Vec::new()
            },
        }
    }

    async fn write_atomic(&self, data: &[u8]) -> Result<(), SpreadsheetError> {
        let target = self.path();
        let temp = unique_tmp_path(&target, &self.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &target).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&target)
                    .await
                    .context(format!("Failed to replace existing file: {}", target.display()))?;
                fs::rename(&temp, &target).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp).await;
                return Err(SpreadsheetError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        sync_dir(&self.dir).await;
        Ok(())
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("workbook");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{counter}", std::process::id()))
}
