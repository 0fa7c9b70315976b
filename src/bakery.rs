// cookbook names are short strings, hashed with seahash
use core::hash::BuildHasherDefault;
use std::collections::HashMap;
use std::path::Path;

use seahash::SeaHasher;
use serde::Serialize;

use crate::cookbook::Cookbook;
use crate::error::Result;
use crate::loader::Loader;
use crate::settings::LoaderConfig;

pub type NameHasher = BuildHasherDefault<SeaHasher>;
pub(crate) type CookbookMap = HashMap<String, Cookbook, NameHasher>;

static EMPTY_COOKBOOK: Cookbook = Cookbook::new();

/// Every cookbook found below a root directory, keyed by directory name.
/// Built once by a [`Loader`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bakery {
    cookbooks: CookbookMap,
}

impl Bakery {
    pub(crate) fn new(cookbooks: CookbookMap) -> Self {
        Self { cookbooks }
    }

    /// Loads `root` with the default settings.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        Loader::new(LoaderConfig::default()).bakery(root)
    }

    /// The cookbook for a directory name. An unknown name yields an empty
    /// cookbook rather than an error.
    pub fn cookbook(&self, name: &str) -> &Cookbook {
        self.cookbooks.get(name).unwrap_or(&EMPTY_COOKBOOK)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookbooks.contains_key(name)
    }

    /// Cookbook names in lexical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cookbooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cookbook)> {
        self.cookbooks.iter().map(|(name, cookbook)| (name.as_str(), cookbook))
    }

    pub fn len(&self) -> usize {
        self.cookbooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookbooks.is_empty()
    }
}
