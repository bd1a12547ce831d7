//! Dependency resolution
//!
//! Turns a requested recipe into a linear execution plan: prerequisites first,
//! in declared order, each recipe exactly once.

use crate::error::{ResolveError, ResolveResult};
use crate::runner::Registry;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Ordered, duplicate-free list of recipes ending with the requested one,
/// plus the parameter values bound for each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    recipes: Vec<String>,
    arguments: HashMap<String, IndexMap<String, String>>,
}

impl Plan {
    /// Recipe names in execution order
    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    /// The requested recipe (always last)
    pub fn target(&self) -> &str {
        self.recipes.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Parameter values bound for a recipe, if any were bound
    pub fn arguments(&self, recipe: &str) -> Option<&IndexMap<String, String>> {
        self.arguments.get(recipe)
    }

    /// Bind command-line arguments to parameters.
    ///
    /// Arguments go positionally to the requested recipe; prerequisites only
    /// receive their defaults.
    pub fn bind_arguments(&mut self, registry: &Registry, args: &[String]) -> ResolveResult<()> {
        let target = self.target().to_string();
        let mut arguments = HashMap::new();

        for name in &self.recipes {
            let recipe = registry.get(name)?;
            let positional: &[String] = if *name == target { args } else { &[] };

            if positional.len() > recipe.params.len() {
                return Err(ResolveError::TooManyArguments {
                    recipe: name.clone(),
                    expected: recipe.params.len(),
                    got: positional.len(),
                });
            }

            let mut bound = IndexMap::new();
            for (index, param) in recipe.params.iter().enumerate() {
                let value = positional
                    .get(index)
                    .cloned()
                    .or_else(|| param.default.clone())
                    .ok_or_else(|| ResolveError::MissingArgument {
                        recipe: name.clone(),
                        parameter: param.name.clone(),
                    })?;
                bound.insert(param.name.clone(), value);
            }

            arguments.insert(name.clone(), bound);
        }

        self.arguments = arguments;
        Ok(())
    }
}

/// Resolve the plan for a named recipe
pub fn resolve(registry: &Registry, name: &str) -> ResolveResult<Plan> {
    let mut walk = Walk::default();
    walk.visit(registry, name)?;

    debug!(target = name, plan = ?walk.order, "resolved plan");

    Ok(Plan {
        recipes: walk.order,
        arguments: HashMap::new(),
    })
}

/// Resolve the plan for the default (first-declared) recipe
pub fn resolve_default(registry: &Registry) -> ResolveResult<Plan> {
    let name = registry.default()?.name.clone();
    resolve(registry, &name)
}

/// Resolve every recipe, stopping at the first error
pub fn check(registry: &Registry) -> ResolveResult<()> {
    for name in registry.names() {
        resolve(registry, name)?;
    }
    Ok(())
}

/// Depth-first, post-order traversal state
#[derive(Default)]
struct Walk {
    /// Recipes currently being visited, outermost first
    path: Vec<String>,
    done: HashSet<String>,
    order: Vec<String>,
}

impl Walk {
    fn visit(&mut self, registry: &Registry, name: &str) -> ResolveResult<()> {
        if self.done.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.path.iter().position(|n| n == name) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicDependency(cycle));
        }

        let recipe = registry.get(name)?;

        self.path.push(name.to_string());
        for dep in &recipe.deps {
            self.visit(registry, dep)?;
        }
        self.path.pop();

        self.done.insert(name.to_string());
        self.order.push(name.to_string());
        Ok(())
    }
}
