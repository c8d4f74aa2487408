use std::path::Path;

use crate::dep::{CheckoutSpec, Dep};
use crate::session::Session;

/// The boundary to whatever actually moves source code onto disk.
///
/// Implementations must honor `session.cancel` and `session.fetch_timeout`
/// while they run, and report failures as `GopackError::Retrieval`.
pub trait Retriever {
    /// Retrieve `dep` into `dest`, cloning it or updating an existing copy.
    fn retrieve(&self, dep: &Dep, dest: &Path, session: &Session) -> miette::Result<()>;

    /// Pin the working copy at `dest` to `spec`.
    fn checkout(
        &self,
        dep: &Dep,
        spec: &CheckoutSpec,
        dest: &Path,
        session: &Session,
    ) -> miette::Result<()>;
}
