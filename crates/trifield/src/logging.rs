//! Logger setup.

use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Env, Target, WriteStyle};

/// Install the global logger.
///
/// Logs go to `log_file` when given. Without one, the interactive view
/// logs nothing because stderr shares the screen; other commands log to
/// stderr. The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(log_file: Option<&Path>, interactive: bool) -> color_eyre::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .target(Target::Pipe(Box::new(file)))
                .write_style(WriteStyle::Never);
        }
        None if interactive => return Ok(()),
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder.try_init()?;
    Ok(())
}
