// tests/demo_recipe.rs

//! The shipped demo recipe stays loadable and header-only.

use pantry::recipe::{
    Generator, IdentityPolicy, RequirementSet, parse_recipe_file, validate_recipe,
};
use std::path::Path;

#[test]
fn test_demo_recipe_validates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/forti-api/pantry.toml");
    let recipe = parse_recipe_file(&path).unwrap();

    assert_eq!(recipe.reference(), "forti-api/0.2.2");
    assert_eq!(
        recipe.build.generators,
        vec![Generator::PkgConfigDeps, Generator::MesonToolchain]
    );
    assert_eq!(recipe.identity_policy(), IdentityPolicy::HeaderOnly);

    let warnings = validate_recipe(&recipe).unwrap();
    assert_eq!(warnings, vec!["Missing package url".to_string()]);

    let reqs = RequirementSet::declare(&recipe).unwrap();
    assert_eq!(reqs.runtime_graph().len(), 2);
    assert_eq!(reqs.test_graph().len(), 1);
}
