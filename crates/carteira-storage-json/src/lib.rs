//! carteira-storage-json
//!
//! Filesystem-backed JSON persistence for the record collections. One
//! pretty-printed document per collection; writes go through a temp file
//! and rename so a crash never leaves a half-written collection behind.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use carteira_core::{CoreError, RecordStore};
use carteira_domain::{Installment, MonthlyTarget, Sale};

const SALES_COLLECTION: &str = "sales";
const INSTALLMENTS_COLLECTION: &str = "installments";
const TARGETS_COLLECTION: &str = "monthly_targets";
const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// JSON-file implementation of [`RecordStore`]. A missing collection file
/// reads as an empty collection, so a fresh data directory needs no seeding.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    data_dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", collection, RECORD_EXTENSION))
    }

    fn load_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, CoreError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn save_collection<T: Serialize>(
        &self,
        collection: &str,
        records: &[T],
    ) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        let path = self.collection_path(collection);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn load_sales(&self) -> Result<Vec<Sale>, CoreError> {
        self.load_collection(SALES_COLLECTION)
    }

    fn save_sales(&self, sales: &[Sale]) -> Result<(), CoreError> {
        self.save_collection(SALES_COLLECTION, sales)
    }

    fn load_installments(&self) -> Result<Vec<Installment>, CoreError> {
        self.load_collection(INSTALLMENTS_COLLECTION)
    }

    fn save_installments(&self, installments: &[Installment]) -> Result<(), CoreError> {
        self.save_collection(INSTALLMENTS_COLLECTION, installments)
    }

    fn load_targets(&self) -> Result<Vec<MonthlyTarget>, CoreError> {
        self.load_collection(TARGETS_COLLECTION)
    }

    fn save_targets(&self, targets: &[MonthlyTarget]) -> Result<(), CoreError> {
        self.save_collection(TARGETS_COLLECTION, targets)
    }

    /// Deletes the collection files outright; reopening the directory
    /// behaves like a fresh install.
    fn clear(&self) -> Result<(), CoreError> {
        for collection in [SALES_COLLECTION, INSTALLMENTS_COLLECTION, TARGETS_COLLECTION] {
            let path = self.collection_path(collection);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
