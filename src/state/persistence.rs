use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::SessionState;

/// Load a saved session; a missing file yields an empty session.
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<SessionState> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no saved session, starting fresh");
        return Ok(SessionState::new());
    }

    let content = fs::read_to_string(path)?;
    let session: SessionState = serde_json::from_str(&content)?;
    Ok(session)
}

/// Save a session, replacing the file only once the new content is written.
pub fn save_session<P: AsRef<Path>>(path: P, session: &SessionState) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(session)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), "session saved");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
