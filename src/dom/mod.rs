use std::collections::HashMap;
use thiserror::Error;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod html;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("host document has no body")]
    MissingBody,
    #[error("container already has an isolation boundary")]
    BoundaryExists,
    /// The environment cannot provide an encapsulated subtree. Never papered over
    /// with class-name prefixing.
    #[error("isolation boundary unsupported: {0}")]
    Unsupported(String),
    #[error("dom operation failed: {0}")]
    Operation(String),
}

/// The slice of a host page the loader is allowed to touch.
///
/// Implementations only ever append to the body and only ever remove nodes the
/// loader created itself.
pub trait HostDocument {
    type Container: Clone;
    type Boundary: Clone;

    /// Create a container with the given id, tag it with the bot id and append it
    /// as the last child of the body.
    fn create_container(&self, id: &str, bot_id: &str) -> Result<Self::Container, DomError>;

    /// Attach a style-encapsulating subtree root to `container`.
    fn attach_boundary(&self, container: &Self::Container) -> Result<Self::Boundary, DomError>;

    fn inject_style(&self, boundary: &Self::Boundary, css: &str) -> Result<(), DomError>;

    /// Detach `container` from the document. Does nothing when it has no parent.
    fn remove_container(&self, container: &Self::Container);

    /// Attributes of the first `<script>` carrying `marker`, if any.
    fn marked_script(&self, marker: &str) -> Option<HashMap<String, String>>;
}
