use tracing::debug;

use crate::domain::error::{AppError, Result};

/// Launch the system browser on the dashboard address
pub fn open_browser(url: &str) -> Result<()> {
    webbrowser::open(url)
        .map_err(|e| AppError::IoError(format!("Failed to launch browser for {}: {}", url, e)))?;
    debug!(url, "Browser launched");
    Ok(())
}
