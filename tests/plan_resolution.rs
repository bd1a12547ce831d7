//! Integration tests for dependency resolution

mod common;

use common::{registry_from_yaml, PROJECT_RECIPES};
use ordo::error::ResolveError;
use ordo::runner::{check, resolve, resolve_default};

#[test]
fn test_default_aggregates_in_declared_order() {
    let registry = registry_from_yaml(PROJECT_RECIPES);

    let plan = resolve_default(&registry).unwrap();
    assert_eq!(plan.recipes(), ["lint", "fmt", "test", "default"]);
    assert_eq!(plan.target(), "default");
}

#[test]
fn test_leaf_recipe_plans_only_itself() {
    let registry = registry_from_yaml(PROJECT_RECIPES);

    for name in ["fmt", "lint", "test", "publish-try", "publish"] {
        let plan = resolve(&registry, name).unwrap();
        assert_eq!(plan.recipes(), [name]);
    }
}

#[test]
fn test_publish_recipes_are_independent() {
    let registry = registry_from_yaml(PROJECT_RECIPES);

    let dry = resolve(&registry, "publish-try").unwrap();
    let real = resolve(&registry, "publish").unwrap();
    assert!(!dry.recipes().iter().any(|r| r == "publish"));
    assert!(!real.recipes().iter().any(|r| r == "publish-try"));
}

#[test]
fn test_multi_level_chain_with_shared_prerequisites() {
    let registry = registry_from_yaml(
        r#"
recipes:
  ci:
    deps: [check, docs, check]
  check:
    deps: [build, lint]
  docs:
    deps: build
  lint:
    deps: build
  build:
    deps: fetch
  fetch:
    run: cargo fetch
"#,
    );

    let plan = resolve(&registry, "ci").unwrap();
    assert_eq!(
        plan.recipes(),
        ["fetch", "build", "lint", "check", "docs", "ci"]
    );

    // every recipe appears after all of its prerequisites
    let position = |name: &str| plan.recipes().iter().position(|r| r == name).unwrap();
    for recipe in registry.iter() {
        for dep in &recipe.deps {
            assert!(position(dep) < position(&recipe.name));
        }
    }
}

#[test]
fn test_cycle_is_reported_with_path() {
    let registry = registry_from_yaml(
        r#"
recipes:
  a:
    deps: b
  b:
    deps: c
  c:
    deps: a
"#,
    );

    let err = resolve(&registry, "a").unwrap_err();
    assert_eq!(
        err,
        ResolveError::CyclicDependency(
            ["a", "b", "c", "a"].iter().map(|s| s.to_string()).collect()
        )
    );
    assert_eq!(check(&registry), Err(err));
}

#[test]
fn test_unknown_recipe() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    assert_eq!(
        resolve(&registry, "deploy"),
        Err(ResolveError::UnknownRecipe("deploy".to_string()))
    );
}

#[test]
fn test_check_accepts_valid_registry() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    assert!(check(&registry).is_ok());
}
