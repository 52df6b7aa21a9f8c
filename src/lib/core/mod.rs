pub mod concurrency;
pub mod error;
pub mod errors;
pub mod fs;
pub mod io;
pub mod read_filter;
pub mod record;
pub mod sparse;

pub mod prelude {
    pub use super::concurrency::determine_allowed_cpus;
    pub use super::error::{FragmentError, Result};
    pub use super::errors::is_broken_pipe;
    pub use super::fs::{is_bgzipped, is_stdio, make_parent_dirs};
    pub use super::io::{get_reader, get_writer};
    pub use super::read_filter::{DefaultReadFilter, ReadFilter};
    pub use super::record::AlignedRead;
    pub use super::sparse::SparseOps;
}
