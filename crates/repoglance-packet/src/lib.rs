//! Key file selection and content chunking for repository summaries.
//!
//! The [`Selector`] turns an unbounded repository file set into an ordered,
//! budget-constrained list of key files. The [`Chunker`] then folds those
//! files into bounded chunks for sequential submission to a text model.
//! Both are pure and never fail; every limit comes from an immutable policy
//! value handed in at construction.

mod budget;
mod chunker;
mod model;
mod render;
mod selector;

pub use budget::{Admission, SelectionBudget};
pub use chunker::Chunker;
pub use model::{ContentChunk, Tier};
pub use render::{FILE_HEADER_PREFIX, FILE_HEADER_SUFFIX, render_file_block};
pub use selector::Selector;
