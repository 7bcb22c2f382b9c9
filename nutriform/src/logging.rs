use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

fn filter() -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match "nutriform=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Install a stderr fmt subscriber. Later calls are no-ops.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = fmt().with_env_filter(filter()).try_init();
    });
}

/// Install a subscriber that appends to `path`, for front-ends that own the
/// terminal. Later calls are no-ops.
pub fn init_tracing_to_file(path: &Path) -> std::io::Result<()> {
    if TRACING_INIT.is_completed() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file: File = OpenOptions::new().create(true).append(true).open(path)?;
    TRACING_INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
    Ok(())
}
