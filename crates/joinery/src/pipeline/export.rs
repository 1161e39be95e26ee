use crate::compress::CompressedStore;
use crate::store::{self, ArtifactStore};

/// One finished artifact, ready for an external writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub extension: Option<String>,
    pub content: Vec<u8>,
    /// gzip bytes, when the store was packed.
    pub compressed: Option<Vec<u8>>,
    pub fingerprint: Option<String>,
}

/// Flattens the store in filename order.
pub fn export(artifacts: &ArtifactStore, compressed: &CompressedStore) -> Vec<ExportedFile> {
    artifacts
        .iter()
        .map(|(filename, payload)| ExportedFile {
            filename: filename.clone(),
            extension: store::extension(filename).map(str::to_string),
            content: payload.content().to_vec(),
            compressed: compressed.get(filename).cloned(),
            fingerprint: payload.fingerprint().map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Payload;

    #[test]
    fn test_export_flattens_store() {
        let mut artifacts = ArtifactStore::new();
        artifacts.stock("index.js", "var a;");
        artifacts.insert(
            "index.min.js",
            Payload::Fingerprinted {
                content: b"var a".to_vec(),
                fingerprint: "abc".to_string(),
            },
        );
        let mut compressed = CompressedStore::new();
        compressed.insert("index.js".to_string(), vec![0x1f, 0x8b]);

        let files = export(&artifacts, &compressed);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "index.js");
        assert_eq!(files[0].extension.as_deref(), Some("js"));
        assert_eq!(files[0].compressed.as_deref(), Some(&[0x1f, 0x8b][..]));
        assert_eq!(files[0].fingerprint, None);
        assert_eq!(files[1].filename, "index.min.js");
        assert_eq!(files[1].fingerprint.as_deref(), Some("abc"));
        assert_eq!(files[1].compressed, None);
    }
}
