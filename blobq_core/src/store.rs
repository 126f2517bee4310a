//! Content-addressed object storage under a two-level fan-out.

use crate::compress;
use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::{self, Object};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A loose-object store rooted at an `objects` directory.
///
/// Each object lives at `<objects_root>/<id[0..2]>/<id[2..40]>` as the
/// zlib-compressed framed bytes. The store keeps no state besides the path;
/// every call goes to disk.
#[derive(Debug, Clone)]
pub struct Store {
    objects_root: PathBuf,
}

impl Store {
    /// Create a store over an existing objects directory.
    ///
    /// Does no I/O; fan-out directories are created on demand by writes.
    pub fn new<P: AsRef<Path>>(objects_root: P) -> Self {
        Self {
            objects_root: objects_root.as_ref().to_path_buf(),
        }
    }

    /// Get the objects root directory.
    pub fn objects_root(&self) -> &Path {
        &self.objects_root
    }

    /// Get the path to an object file given its id.
    ///
    /// Returns: `{objects_root}/{prefix}/{suffix}`
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.objects_root.join(id.prefix()).join(id.suffix())
    }

    /// Check whether an object file exists for `id`.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Compute the id an object would have, without storing it.
    pub fn hash_object(&self, kind: &str, payload: &[u8]) -> Result<ObjectId> {
        ObjectId::for_object(kind, payload)
    }

    /// Frame, hash and write an object. Returns its id.
    pub fn store(&self, kind: &str, payload: &[u8]) -> Result<ObjectId> {
        let framed = object::encode(kind, payload)?;
        let id = ObjectId::hash_bytes(&framed);
        self.write_framed(&id, &framed)?;
        Ok(id)
    }

    /// Write an object under a caller-computed id.
    ///
    /// If a file already exists for `id` it is trusted as-is and the call is a
    /// no-op: existing objects are never re-hashed, re-validated or rewritten.
    pub fn write(&self, id: &ObjectId, kind: &str, payload: &[u8]) -> Result<()> {
        let framed = object::encode(kind, payload)?;
        debug_assert_eq!(
            *id,
            ObjectId::hash_bytes(&framed),
            "object id does not match framed content"
        );
        self.write_framed(id, &framed)
    }

    /// Compress and atomically write already-framed bytes.
    fn write_framed(&self, id: &ObjectId, framed: &[u8]) -> Result<()> {
        let obj_path = self.object_path(id);

        // Content addressing: same id, same bytes
        if obj_path.is_file() {
            debug!(%id, "object already stored, skipping write");
            return Ok(());
        }

        let compressed = compress::compress(framed)?;
        self.write_object_atomic(&obj_path, &compressed)?;

        debug!(
            %id,
            framed_len = framed.len(),
            compressed_len = compressed.len(),
            "stored object"
        );
        Ok(())
    }

    /// Write bytes to `obj_path` via a temp file in the same directory.
    fn write_object_atomic(&self, obj_path: &Path, bytes: &[u8]) -> Result<()> {
        let parent = obj_path.parent().ok_or_else(|| {
            Error::from(io::Error::other(format!(
                "object path {} has no parent",
                obj_path.display()
            )))
        })?;

        // create_dir_all treats an existing fan-out directory as success
        fs::create_dir_all(parent)?;
        trace!(path = %obj_path.display(), "writing object file");

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(bytes)?;
        temp_file.flush()?;

        // A racing writer of the same id renames identical bytes over ours
        temp_file.persist(obj_path)?;

        Ok(())
    }

    /// Read, decompress and decode an object.
    pub fn read(&self, id: &ObjectId) -> Result<Object> {
        let obj_path = self.object_path(id);
        trace!(path = %obj_path.display(), "reading object file");

        let compressed = match fs::read(&obj_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::object_not_found(id.to_hex()));
            }
            Err(e) => return Err(e.into()),
        };

        let framed = compress::decompress(&compressed)?;
        let object = object::decode(&framed)?;

        debug!(%id, kind = %object.kind, size = object.size, "loaded object");
        Ok(object)
    }

    /// Load an object by its hex id.
    ///
    /// The id is validated before the filesystem is touched.
    pub fn load(&self, id: &str) -> Result<Object> {
        let id = ObjectId::from_hex(id)?;
        self.read(&id)
    }

    /// Write an object's payload verbatim to a writer.
    pub fn cat_object<W: Write>(&self, id: &ObjectId, mut writer: W) -> Result<()> {
        let object = self.read(id)?;
        writer.write_all(&object.payload)?;
        writer.flush()?;
        Ok(())
    }
}
