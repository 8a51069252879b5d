mod app;
mod cli;
mod export;
mod logging;

use app::App;
use cli::Command;
use trifield_config::Config;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = cli::parse();
    logging::init(cli.log_file.as_deref(), cli.command == Command::Run)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.command {
        Command::Export(options) => export::run(options, &config),
        Command::Run => {
            let terminal = ratatui::init();
            let result = App::new(config).run(terminal);
            ratatui::restore();
            result
        }
    }
}
