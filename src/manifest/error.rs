use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("File '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("File '{}' is not writable", path.display())]
    NotWritable { path: PathBuf },

    #[error("{kind} argument is invalid: {reason}")]
    Validation { kind: &'static str, reason: String },

    #[error(
        "Routing path '{}' is not inside a '{vendor}/{bundle}' plugin directory",
        path.display()
    )]
    Parse {
        path: PathBuf,
        vendor: String,
        bundle: String,
    },

    #[error("Plugin descriptor not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid plugin descriptor at {}: {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml_bw::Error),
}

impl ManifestError {
    pub(crate) fn empty(kind: &'static str) -> Self {
        Self::Validation {
            kind,
            reason: "cannot be empty".into(),
        }
    }
}
