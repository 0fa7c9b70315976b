use serde::Serialize;

use crate::recipe::Recipe;

/// The recipes found in one directory, in the order the walk found them.
/// Names are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cookbook {
    recipes: Vec<Recipe>,
}

impl Cookbook {
    pub const fn new() -> Self {
        Self { recipes: Vec::new() }
    }
    pub(crate) fn push(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }
    pub fn len(&self) -> usize {
        self.recipes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(Recipe::name).collect()
    }

    /// Looks up a recipe by its file name without extension, so `foo.datalog`
    /// is found by `find("foo")`.
    pub fn find(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.name() == name)
    }

    /// One unnamed recipe holding every recipe of this cookbook, in order.
    pub fn merged(&self) -> Recipe {
        self.recipes
            .iter()
            .fold(Recipe::default(), |merged, recipe| merged.merge(recipe))
    }
}

impl<'a> IntoIterator for &'a Cookbook {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;
    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

impl FromIterator<Recipe> for Cookbook {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self { recipes: iter.into_iter().collect() }
    }
}
