mod common;

use common::{milk, FaultKind, Op, TestEnvironment};
use mcp_ingredient_lists::backend::InMemoryBackend;
use mcp_ingredient_lists::error::ListError;
use mcp_ingredient_lists::lists::Ingredient;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_grocery_apples_merge() {
    common::init_test_logging();
    let env = TestEnvironment::with_backend(InMemoryBackend::new()).await;

    env.service.create_list("Grocery").await.expect("create");
    env.service
        .add_ingredient("Grocery", Ingredient::new("Apple", "Fruit", 3.0, "count"))
        .await
        .expect("add");
    env.service
        .add_ingredient("Grocery", Ingredient::new("Apple", "Fruit", 2.0, "count"))
        .await
        .expect("add");

    let grocery = env.service.list("Grocery").await.expect("Grocery should exist");
    assert_eq!(grocery.len(), 1);
    assert_eq!(grocery.ingredients()[0].quantity, 5.0);
}

#[tokio::test]
async fn test_delete_missing_pantry() {
    let env = TestEnvironment::with_backend(InMemoryBackend::new()).await;
    env.service.create_list("Grocery").await.expect("create");
    let before = env.backend.snapshot().await;

    let result = env.service.delete_list("Pantry").await;

    assert_eq!(result, Err(ListError::ListNotFound("Pantry".to_string())));
    assert_eq!(env.backend.snapshot().await, before);
}

#[tokio::test]
async fn test_delete_list() {
    let env = TestEnvironment::new().await;

    env.service.delete_list("Grocery").await.expect("delete");

    assert!(env.service.list("Grocery").await.is_none());
    assert!(env.backend.snapshot().await.find_by_name("Grocery").is_none());
}

#[tokio::test]
async fn test_adds_keep_identities_unique_and_sorted() {
    let env = TestEnvironment::with_backend(InMemoryBackend::new()).await;
    env.service.create_list("Pantry").await.expect("create");

    let adds = [
        ("oats", "Pantry", 1.0),
        ("Rice", "Grain", 2.0),
        ("beans", "Pantry", 3.0),
        ("Rice", "Grain", 4.0),
        ("Almonds", "Snacks", 5.0),
        ("oats", "Pantry", 6.0),
        ("Rice", "Baking", 7.0),
    ];
    for (name, category, quantity) in adds {
        env.service
            .add_ingredient("Pantry", Ingredient::new(name, category, quantity, "g"))
            .await
            .expect("add");
    }

    let pantry = env.service.list("Pantry").await.unwrap();
    let summary: Vec<(&str, &str, f64)> = pantry
        .ingredients()
        .iter()
        .map(|i| (i.name.as_str(), i.category.as_str(), i.quantity))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Almonds", "Snacks", 5.0),
            ("beans", "Pantry", 3.0),
            ("oats", "Pantry", 7.0),
            ("Rice", "Grain", 6.0),
            ("Rice", "Baking", 7.0),
        ]
    );
}

#[tokio::test]
async fn test_remove_ingredient() {
    let env = TestEnvironment::new().await;

    env.service
        .remove_ingredient("Pantry", &milk())
        .await
        .expect("remove");

    assert!(!env.service.list("Pantry").await.unwrap().contains(&milk()));
    assert!(!env
        .backend
        .snapshot()
        .await
        .find_by_name("Pantry")
        .unwrap()
        .contains(&milk()));
}

#[tokio::test]
async fn test_remove_rejected_by_backend_keeps_cache() {
    let env = TestEnvironment::new().await;
    env.backend.fail(Op::Remove, "Pantry", FaultKind::Rejected);
    let before = env.service.lists().await;

    let result = env.service.remove_ingredient("Pantry", &milk()).await;

    assert_eq!(
        result,
        Err(ListError::Upstream {
            operation: "remove ingredient".to_string()
        })
    );
    assert_eq!(env.service.lists().await, before);
}

#[tokio::test]
async fn test_add_to_missing_list() {
    let env = TestEnvironment::new().await;

    let result = env.service.add_ingredient("Freezer", milk()).await;

    assert_eq!(result, Err(ListError::ListNotFound("Freezer".to_string())));
    assert!(env.backend.calls().is_empty());
}

#[tokio::test]
async fn test_add_unreachable_backend() {
    let env = TestEnvironment::new().await;
    env.backend.fail(Op::Add, "Grocery", FaultKind::Unreachable);
    let before = env.service.lists().await;

    let result = env.service.add_ingredient("Grocery", milk()).await;

    assert!(matches!(result, Err(ListError::Upstream { .. })));
    assert_eq!(env.service.lists().await, before);
}

#[tokio::test]
async fn test_edit_ingredient() {
    let env = TestEnvironment::new().await;

    env.service
        .edit_ingredient("Pantry", &milk(), Ingredient::new("Milk", "Dairy", 1.0, "L"))
        .await
        .expect("edit");

    let pantry = env.service.list("Pantry").await.unwrap();
    assert_eq!(pantry.find(&milk()), Some(&Ingredient::new("Milk", "Dairy", 1.0, "L")));
    assert_eq!(
        env.backend.snapshot().await.find_by_name("Pantry"),
        Some(&pantry)
    );
}

#[tokio::test]
async fn test_edit_rejects_invalid_quantity() {
    let env = TestEnvironment::new().await;

    let result = env
        .service
        .edit_ingredient("Pantry", &milk(), Ingredient::new("Milk", "Dairy", -1.0, "ml"))
        .await;

    assert!(matches!(result, Err(ListError::InvalidInput(_))));
}

#[tokio::test]
async fn test_lists_are_copies() {
    let env = TestEnvironment::new().await;

    let mut lists = env.service.lists().await;
    lists[0].add(Ingredient::new("Owl", "Poultry", 1.0, "count"));

    let grocery = env.service.list("Grocery").await.unwrap();
    assert!(!grocery.contains(&Ingredient::new("Owl", "Poultry", 1.0, "count")));
}

#[tokio::test]
async fn test_purge_custom_ingredient_with_failure_reloads() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;
    let kimchi = Ingredient::custom("Kimchi", "Fermented", 1.0, "jar");
    env.service.add_ingredient("Grocery", kimchi.clone()).await.expect("add");
    env.service.add_ingredient("Pantry", kimchi.clone()).await.expect("add");
    env.backend.fail(Op::Remove, "Pantry", FaultKind::Unreachable);

    let result = env.service.purge_custom_ingredient(&kimchi).await;

    assert!(matches!(result, Err(ListError::Upstream { .. })));
    let lists = env.service.lists().await;
    assert!(!lists[0].contains(&kimchi));
    assert!(lists[1].contains(&kimchi));
    assert_eq!(lists, env.backend.snapshot().await.all().to_vec());
}

#[tokio::test]
async fn test_catalog_and_units() {
    let env = TestEnvironment::new().await;

    let catalog = env.service.catalog().await.expect("catalog");
    assert_eq!(catalog.len(), 15);

    let units = env.service.units().await.expect("units");
    assert!(units.contains(&"count".to_string()));
}
