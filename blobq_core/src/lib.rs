//! # Blobq Core
//!
//! A git-compatible loose-object store.
//!
//! Objects are framed as `<kind> <size>\0<payload>`, identified by the SHA-1 of
//! the framed bytes, and stored zlib-compressed at `objects/<2 hex>/<38 hex>`.
//!
//! ## Features
//!
//! - Content-addressed storage: identical content always has the same id
//! - Write-once objects with atomic writes
//! - Layout readable by `git cat-file`
//!
//! ## Example
//!
//! ```no_run
//! use blobq_core::{ObjectKind, Repository};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a new repository
//! let repo = Repository::init(".git")?;
//!
//! // Store a blob
//! let id = repo.objects().store(ObjectKind::Blob.as_str(), b"hi\n")?;
//! assert_eq!(id.to_hex(), "45b983be36b73c0788dc9cbcb76cbb80fc7bb057");
//!
//! // Load it back
//! let object = repo.objects().load(&id.to_hex())?;
//! assert_eq!(object.payload, b"hi\n");
//! # Ok(())
//! # }
//! ```

pub mod compress;
mod error;
mod hash;
pub mod object;
mod repo;
mod store;

pub use error::{Error, Result};
pub use hash::{ID_HEX_LEN, ID_SIZE, ObjectId};
pub use object::{Object, ObjectKind};
pub use repo::{DEFAULT_GIT_DIR, DEFAULT_HEAD, Repository};
pub use store::Store;
