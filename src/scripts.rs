use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use once_cell::sync::OnceCell;

use crate::{AppError, AppResult};

static COMMANDS_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/sql/commands");
static QUERIES_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/sql/queries");
static AUDITS_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/sql/audits");
static MIGRATION_HELPERS_DIR: Dir<'static> =
    include_dir!("$CARGO_MANIFEST_DIR/sql/migration-helpers");

/// A named catalog of SQL statement text, embedded at compile time.
///
/// `initialize` builds the name → text cache exactly once; calling it again
/// is a no-op. `load` resolves a logical script name (the filename without
/// its `.sql` extension) or fails with `SCRIPTS/NOT_FOUND`.
pub struct ScriptCatalog {
    name: &'static str,
    dir: &'static Dir<'static>,
    cache: OnceCell<HashMap<&'static str, &'static str>>,
}

impl ScriptCatalog {
    const fn new(name: &'static str, dir: &'static Dir<'static>) -> Self {
        ScriptCatalog {
            name,
            dir,
            cache: OnceCell::new(),
        }
    }

    fn cache(&self) -> &HashMap<&'static str, &'static str> {
        self.cache.get_or_init(|| {
            self.dir
                .files()
                .filter_map(|file| {
                    let stem = file.path().file_stem()?.to_str()?;
                    let text = file.contents_utf8()?;
                    Some((stem, text))
                })
                .collect()
        })
    }

    pub fn initialize(&self) {
        let cache = self.cache();
        tracing::debug!(
            target: "pocketbook",
            event = "scripts_initialized",
            catalog = self.name,
            scripts = cache.len()
        );
    }

    pub fn load(&self, script: &str) -> AppResult<&'static str> {
        self.cache()
            .get(script)
            .copied()
            .ok_or_else(|| AppError::script_not_found(self.name, script))
    }

    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }
}

pub static COMMAND_SCRIPTS: ScriptCatalog = ScriptCatalog::new("commands", &COMMANDS_DIR);
pub static QUERY_SCRIPTS: ScriptCatalog = ScriptCatalog::new("queries", &QUERIES_DIR);
pub static AUDIT_SCRIPTS: ScriptCatalog = ScriptCatalog::new("audits", &AUDITS_DIR);
pub static MIGRATION_HELPER_SCRIPTS: ScriptCatalog =
    ScriptCatalog::new("migration-helpers", &MIGRATION_HELPERS_DIR);

/// Eagerly initialize every catalog. Part of the worker boot sequence.
pub fn initialize_all() {
    COMMAND_SCRIPTS.initialize();
    QUERY_SCRIPTS.initialize();
    AUDIT_SCRIPTS.initialize();
    MIGRATION_HELPER_SCRIPTS.initialize();
}
