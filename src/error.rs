use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The document parsed fine but contains no headings.
    #[error("document contains no headings")]
    EmptyOutline,
    #[error("document could not be parsed: {0}")]
    MalformedDocument(String),
    /// An edge names a node that is not part of the graph, or the parent
    /// chain loops back on itself.
    #[error("edge {edge} references inconsistent node {node}")]
    LayoutInconsistency { edge: String, node: String },
}

impl Error {
    /// Both parse failures mean "nothing to show" to a caller.
    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::EmptyOutline | Self::MalformedDocument(_))
    }
}
