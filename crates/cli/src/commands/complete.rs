use anyhow::Result;
use tracing::debug;

use crate::session::Session;

/// Command names of the active context starting with `prefix`, one per line
pub fn complete_command(session: &Session, prefix: &str) -> Result<()> {
    let detection = match session.active_context() {
        Ok(detection) => detection,
        Err(e) => {
            debug!("No completions: {}", e);
            return Ok(());
        }
    };

    let Ok(commands) = session.registry().list_commands(&detection.context) else {
        return Ok(());
    };

    for name in commands.into_iter().filter(|name| name.starts_with(prefix)) {
        println!("{name}");
    }

    Ok(())
}
