//! Clear command - remove every catalog entry.

use crate::app::App;
use capturelib_core::Config;
use std::io::{self, Write};
use std::path::PathBuf;

/// Run the clear command.
pub fn run(config: Config, config_path: PathBuf, skip_confirm: bool) -> anyhow::Result<()> {
    let app = App::new(config, config_path)?;

    let count = app.library.count()?;
    if count == 0 {
        println!("Catalog is empty. Nothing to clear.");
        return app.close();
    }

    if !skip_confirm {
        print!("This will remove {} catalog entries. Are you sure? [y/N] ", count);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return app.close();
        }
    }

    app.library.store().clear()?;
    println!("Catalog cleared.");

    app.close()
}
