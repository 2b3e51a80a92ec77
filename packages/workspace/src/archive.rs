use pagecraft_editor::ExportError;
use tar::{Builder, Header};

/// Pack `(path, contents)` pairs into an uncompressed tar archive
///
/// Entries carry a zero mtime so identical projects pack to identical bytes.
pub fn pack(files: &[(String, String)]) -> Result<Vec<u8>, ExportError> {
    let mut builder = Builder::new(Vec::new());

    for (path, contents) in files {
        let data = contents.as_bytes();
        let mut header = Header::new_gnu();
        header
            .set_path(path)
            .map_err(|e| ExportError::Archive(format!("set path '{}': {}", path, e)))?;
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_cksum();

        builder
            .append(&header, data)
            .map_err(|e| ExportError::Archive(format!("append '{}': {}", path, e)))?;
    }

    builder
        .into_inner()
        .map_err(|e| ExportError::Archive(format!("tar finish: {}", e)))
}
