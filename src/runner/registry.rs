//! Recipe registry

use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::runner::Recipe;
use indexmap::IndexMap;

/// Insertion-ordered mapping from recipe name to recipe.
///
/// Built once at startup and never mutated afterwards. The first recipe
/// defined is the default target.
#[derive(Debug, Clone)]
pub struct Registry {
    recipes: IndexMap<String, Recipe>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            recipes: IndexMap::new(),
        }
    }

    /// Build a registry from a parsed declaration, in declaration order
    pub fn from_config(config: Config) -> ResolveResult<Self> {
        let mut registry = Registry::new();
        for (name, recipe) in config.recipes {
            registry.define(Recipe::from_config(name, recipe))?;
        }
        Ok(registry)
    }

    /// Add a recipe; names must be unique
    pub fn define(&mut self, recipe: Recipe) -> ResolveResult<()> {
        if self.recipes.contains_key(&recipe.name) {
            return Err(ResolveError::DuplicateRecipe(recipe.name));
        }
        self.recipes.insert(recipe.name.clone(), recipe);
        Ok(())
    }

    pub fn get(&self, name: &str) -> ResolveResult<&Recipe> {
        self.recipes
            .get(name)
            .ok_or_else(|| ResolveError::UnknownRecipe(name.to_string()))
    }

    /// The first-declared recipe
    pub fn default(&self) -> ResolveResult<&Recipe> {
        self.recipes
            .first()
            .map(|(_, recipe)| recipe)
            .ok_or(ResolveError::NoDefaultRecipe)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
