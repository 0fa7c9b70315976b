//! Turns recipe text into [`Recipe`]s and recipe trees into a [`Bakery`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::bakery::{Bakery, CookbookMap};
use crate::error::{BakeryError, Result};
use crate::parser::{DatalogParser, Grammar};
use crate::recipe::Recipe;
use crate::scanner::Statements;
use crate::settings::LoaderConfig;

/// A grammar plus the settings to read recipes with.
#[derive(Debug, Clone, Default)]
pub struct Loader<G = DatalogParser> {
    grammar: G,
    config: LoaderConfig,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { grammar: DatalogParser, config }
    }
}

impl<G: Grammar> Loader<G> {
    pub fn with_grammar(grammar: G, config: LoaderConfig) -> Self {
        Self { grammar, config }
    }
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Reads one recipe. Any failure discards the partially built recipe.
    pub fn recipe<R: BufRead>(&self, name: impl Into<String>, reader: R) -> Result<Recipe> {
        let mut recipe = Recipe::new(name);
        for statement in Statements::new(reader, self.config.termination) {
            recipe.load(&self.grammar, &statement?)?;
        }
        Ok(recipe)
    }

    /// Walks `root` and loads every file below it. Files are grouped into
    /// cookbooks by the name of their parent directory. The first error
    /// aborts the whole load.
    pub fn bakery(&self, root: impl AsRef<Path>) -> Result<Bakery> {
        let mut walk = WalkDir::new(root.as_ref()).follow_links(self.config.follow_links);
        if self.config.sort_entries {
            walk = walk.sort_by_file_name();
        }
        let mut cookbooks = CookbookMap::default();
        for entry in walk {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            let cookbook_name = cookbook_name(path);
            let name = recipe_name(&entry.file_name().to_string_lossy()).to_owned();
            let recipe = self
                .read_file(path, name)
                .map_err(|e| BakeryError::Recipe { path: path.to_path_buf(), source: Box::new(e) })?;
            self.insert(&mut cookbooks, cookbook_name, recipe)?;
        }
        info!(cookbooks = cookbooks.len(), "bakery loaded");
        Ok(Bakery::new(cookbooks))
    }

    // the file is closed when this returns, on success or failure
    fn read_file(&self, path: &Path, name: String) -> Result<Recipe> {
        let file = File::open(path).map_err(|source| BakeryError::Io { path: path.to_path_buf(), source })?;
        self.recipe(name, BufReader::new(file))
    }

    fn insert(&self, cookbooks: &mut CookbookMap, cookbook_name: String, recipe: Recipe) -> Result<()> {
        let cookbook = cookbooks.entry(cookbook_name.clone()).or_default();
        if cookbook.find(recipe.name()).is_some() {
            if self.config.unique_recipe_names {
                return Err(BakeryError::DuplicateRecipe {
                    cookbook: cookbook_name,
                    recipe: recipe.name().to_owned(),
                });
            }
            warn!(cookbook = %cookbook_name, recipe = recipe.name(), "recipe name shadowed by an earlier recipe");
        }
        info!(cookbook = %cookbook_name, recipe = recipe.name(), "loaded");
        cookbook.push(recipe);
        Ok(())
    }
}

/// The name of the directory holding `path`. A parent without a final
/// component (`.`, `..`, `/`) is named by its own text.
fn cookbook_name(path: &Path) -> String {
    match path.parent() {
        Some(parent) => parent
            .file_name()
            .unwrap_or(parent.as_os_str())
            .to_string_lossy()
            .into_owned(),
        None => String::new(),
    }
}

/// A file name without its last extension: `base.rec` becomes `base`,
/// `policy.v2.rec` becomes `policy.v2`.
pub fn recipe_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    }
}
