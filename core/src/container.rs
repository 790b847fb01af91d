//! `.pbix` container handling.
//!
//! A `.pbix` file is a ZIP-based OPC package; the core consumes exactly one
//! entry from it, the compressed `DataModel` stream. Presence of
//! `[Content_Types].xml` distinguishes a Power BI package from an
//! arbitrary ZIP.

use std::io::{Read, Seek};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
const DATA_MODEL_PATH: &str = "DataModel";

/// Errors that can occur when opening or reading a `.pbix` container.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a ZIP container")]
    NotZipContainer,
    #[error("not a Power BI package (missing [Content_Types].xml)")]
    NotPbixPackage,
    #[error("package has no DataModel entry")]
    NoDataModel,
}

#[derive(Debug)]
pub struct PbixContainer<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> PbixContainer<R> {
    pub fn open(reader: R) -> Result<PbixContainer<R>, ContainerError> {
        let archive = ZipArchive::new(reader).map_err(|err| match err {
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
                ContainerError::NotZipContainer
            }
            ZipError::Io(e) => ContainerError::Io(e),
            other => ContainerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        })?;

        let mut container = PbixContainer { archive };
        if container.read_file(CONTENT_TYPES_PATH)?.is_none() {
            return Err(ContainerError::NotPbixPackage);
        }
        Ok(container)
    }

    /// Raw bytes of the `DataModel` entry. Files saved without an imported
    /// model legitimately lack one.
    pub fn read_data_model(&mut self) -> Result<Vec<u8>, ContainerError> {
        self.read_file(DATA_MODEL_PATH)?
            .ok_or(ContainerError::NoDataModel)
    }

    pub fn has_data_model(&mut self) -> bool {
        self.archive.by_name(DATA_MODEL_PATH).is_ok()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    fn read_file(&mut self, name: &str) -> Result<Option<Vec<u8>>, ContainerError> {
        match self.archive.by_name(name) {
            Ok(mut file) => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(ZipError::Io(e)) => Err(ContainerError::Io(e)),
            Err(e) => Err(ContainerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))),
        }
    }
}
