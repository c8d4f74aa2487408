//! Version-control retrieval: drives the `git`, `hg`, `bzr` and `svn`
//! command-line clients on behalf of the resolver.

pub mod commands;
pub mod retriever;

pub use retriever::ScmRetriever;
