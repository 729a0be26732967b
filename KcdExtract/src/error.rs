//! Error types for `kcdextract`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `kcdextract` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Source File Errors ====================
    /// A file id required by the pipeline is absent from the file index.
    #[error("required file '{file_id}' is not in the file index")]
    RequiredFileMissing {
        /// The logical file id (e.g. `item`, `equipment_slot`).
        file_id: String,
    },

    /// A file listed in the file index does not exist on disk.
    #[error("file not found: {path}")]
    SourceFileNotFound {
        /// The path recorded in the index.
        path: PathBuf,
    },

    /// An XML document has no root element.
    #[error("XML document has no root element")]
    MissingRootElement,

    /// An item tree lacks its `ItemClasses` container.
    #[error("element <{tag}> not found in {source_id}")]
    MissingContainer {
        /// The container tag that was searched for.
        tag: String,
        /// The logical id of the offending source.
        source_id: String,
    },

    /// No item trees were handed to the merger.
    #[error("no item trees to merge")]
    NoItemTrees,

    // ==================== Mapping Registry Errors ====================
    /// A derived field is declared more than once within one domain.
    #[error("derived field '{field}' declared more than once in {domain} transforms")]
    DuplicateTransform {
        /// The mapping domain (`attributes` or `stats`).
        domain: String,
        /// The duplicated derived field name.
        field: String,
    },

    /// A mapping table entry is malformed.
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    // ==================== Data Store Errors ====================
    /// No `data.json` exists yet for the requested version.
    #[error("data.json not found: {path}")]
    DatasetNotFound {
        /// The expected document path.
        path: PathBuf,
    },

    /// The game's version descriptor is missing or malformed.
    #[error("invalid version descriptor: {message}")]
    InvalidVersionDescriptor {
        /// Description of what is invalid.
        message: String,
    },

    // ==================== Game Data / Path Errors ====================
    /// Could not determine the game install path.
    #[error("could not determine KCD2 install path")]
    GamePathNotFound,

    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// UTF-8 conversion error.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error (configuration or mapping table).
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    // ==================== Archive Errors ====================
    /// Error reading a zip-based PAK archive.
    #[error("PAK archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

/// A specialized Result type for `kcdextract` operations.
pub type Result<T> = std::result::Result<T, Error>;
