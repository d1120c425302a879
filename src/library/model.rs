use std::path::PathBuf;

/// A playable file in the managed directory. The file name doubles as the
/// display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub path: PathBuf,
}
