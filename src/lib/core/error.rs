//! Error types for the scfrag library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTSlib error: {0}")]
    Htslib(#[from] rust_htslib::errors::Error),

    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unparseable barcode: read name '{read_name}' does not match /{pattern}/")]
    UnparseableBarcode { read_name: String, pattern: String },

    #[error("Sparse matrix error: {0}")]
    SparseMatrix(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FragmentError>;

impl From<nalgebra_sparse::SparseFormatError> for FragmentError {
    fn from(err: nalgebra_sparse::SparseFormatError) -> Self {
        FragmentError::SparseMatrix(format!("Sparse format error: {:?}", err))
    }
}
