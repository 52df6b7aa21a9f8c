pub mod fragments;

pub use fragments::{run_fragments, FragmentsArgs};
