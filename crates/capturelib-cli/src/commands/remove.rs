//! Remove command - drop a single entry from the catalog.

use crate::app::App;
use capturelib_core::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Run the remove command.
pub fn run(config: Config, config_path: PathBuf, path: &str) -> anyhow::Result<()> {
    let app = App::new(config, config_path)?;
    let key = catalog_key(path);
    let store = app.library.store();

    if store.get(&key)?.is_none() {
        println!("Not in catalog: {}", key);
        return app.close();
    }

    store.delete(&key)?;
    println!("Removed {}", key);

    app.close()
}

/// Catalog paths are fully resolved, so resolve the argument the same way
/// when the file still exists. Vanished files are looked up as typed.
fn catalog_key(path: &str) -> String {
    fs::canonicalize(Path::new(path))
        .ok()
        .and_then(|resolved| resolved.to_str().map(str::to_string))
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_key_resolves_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("sub").join("a.c2o");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"x").unwrap();

        let indirect = temp_dir.path().join("sub").join("..").join("sub").join("a.c2o");
        let expected = fs::canonicalize(&file).unwrap();
        assert_eq!(catalog_key(indirect.to_str().unwrap()), expected.to_str().unwrap());
    }

    #[test]
    fn test_catalog_key_keeps_missing_path() {
        assert_eq!(catalog_key("/no/such/file.c2o"), "/no/such/file.c2o");
    }

    #[test]
    fn test_remove_non_canonical_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("designs");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("Stage1.c2o"), b"stage").unwrap();

        let config_path = temp_dir.path().join("capturelib.toml");
        let mut config = Config::default();
        config.library.catalog_path = Some(temp_dir.path().join("catalog.db"));

        let mut app = App::new(config.clone(), config_path.clone()).unwrap();
        app.library.set_root_and_rescan(&root).unwrap();
        app.close().unwrap();

        let indirect = root.join("..").join("designs").join("Stage1.c2o");
        run(config.clone(), config_path.clone(), indirect.to_str().unwrap()).unwrap();

        let app = App::new(config, config_path).unwrap();
        assert_eq!(app.library.store().count().unwrap(), 0);
        app.close().unwrap();
    }
}
