//! Lookup facade behavior: defaults, coercion, and site scoping.

mod support;

use sitevars::application::vars::{LookupError, VarsWriteError};
use support::{InMemoryStore, cache_with, facade};

#[tokio::test]
async fn returns_stored_value_for_the_scoped_site() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;
    store.seed_var(site, "theme", "dark");

    let vars = facade(&store, &cache_with(true));
    let value = vars.get_value(Some(site), "theme").await.unwrap();
    assert_eq!(value, "dark");
}

#[tokio::test]
async fn absent_variable_defaults_to_empty_string() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;

    let vars = facade(&store, &cache_with(true));
    let value = vars.get_value(Some(site), "theme").await.unwrap();
    assert_eq!(value, "");
}

#[tokio::test]
async fn explicit_default_substitutes_for_absent_variable() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;

    let vars = facade(&store, &cache_with(true));
    let value = vars
        .get_value_or(Some(site), "theme", Some("light"))
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("light"));
}

#[tokio::test]
async fn coercion_applies_to_stored_value() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;
    store.seed_var(site, "paginate_by", "10");

    let vars = facade(&store, &cache_with(true));
    let paginate_by = vars
        .get_value_as(Some(site), "paginate_by", Some("25"), str::parse::<i64>)
        .await
        .unwrap();
    assert_eq!(paginate_by, Some(10));
}

#[tokio::test]
async fn coercion_applies_to_substituted_default() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;

    let vars = facade(&store, &cache_with(true));
    let paginate_by = vars
        .get_value_as(Some(site), "paginate_by", Some("25"), str::parse::<i64>)
        .await
        .unwrap();
    assert_eq!(paginate_by, Some(25));
}

#[tokio::test]
async fn coercion_is_skipped_when_absent_with_no_default() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;

    let vars = facade(&store, &cache_with(true));
    // The coercer would fail if invoked; an absent value with no default
    // must short-circuit to None before coercion runs.
    let result = vars
        .get_value_as(Some(site), "paginate_by", None, |_| "nope".parse::<i64>())
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn coercion_failure_surfaces_the_variable_name() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;
    store.seed_var(site, "paginate_by", "many");

    let vars = facade(&store, &cache_with(true));
    let err = vars
        .get_value_as(Some(site), "paginate_by", None, str::parse::<i64>)
        .await
        .unwrap_err();
    match err {
        LookupError::Coerce { name, .. } => assert_eq!(name, "paginate_by"),
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[tokio::test]
async fn lookup_without_site_scope_is_rejected() {
    let store = InMemoryStore::new();
    let vars = facade(&store, &cache_with(true));

    let err = vars.get_value(None, "theme").await.unwrap_err();
    assert!(matches!(err, LookupError::MissingSiteScope));

    let err = vars.all_for_site(None).await.unwrap_err();
    assert!(matches!(err, LookupError::MissingSiteScope));
}

#[tokio::test]
async fn sites_resolve_independently() {
    let store = InMemoryStore::new();
    let first = store.seed_site("one.example.com", "One").id;
    let second = store.seed_site("two.example.com", "Two").id;
    store.seed_var(first, "theme", "dark");
    store.seed_var(second, "theme", "light");

    let vars = facade(&store, &cache_with(true));
    assert_eq!(vars.get_value(Some(first), "theme").await.unwrap(), "dark");
    assert_eq!(vars.get_value(Some(second), "theme").await.unwrap(), "light");

    // A variable set on one site is invisible to the other.
    store.seed_var(first, "banner", "hello");
    assert_eq!(vars.get_value(Some(second), "banner").await.unwrap(), "");
}

#[tokio::test]
async fn duplicate_name_fails_only_within_one_site() {
    let store = InMemoryStore::new();
    let first = store.seed_site("one.example.com", "One").id;
    let second = store.seed_site("two.example.com", "Two").id;

    let vars = facade(&store, &cache_with(true));
    vars.create(first, "theme", "dark").await.unwrap();

    let err = vars.create(first, "theme", "light").await.unwrap_err();
    match err {
        VarsWriteError::Repo(repo) => assert!(repo.is_duplicate()),
        other => panic!("expected duplicate error, got {other:?}"),
    }

    // The same name on another site is a fresh pair.
    vars.create(second, "theme", "light").await.unwrap();
}

#[tokio::test]
async fn per_site_values_win_over_the_shared_default() {
    let store = InMemoryStore::new();
    let first = store.seed_site("one.example.com", "One").id;
    let second = store.seed_site("two.example.com", "Two").id;
    store.seed_var(first, "paginate_by", "25");

    let vars = facade(&store, &cache_with(true));
    let on_first = vars
        .get_value_as(Some(first), "paginate_by", Some("10"), str::parse::<i64>)
        .await
        .unwrap();
    let on_second = vars
        .get_value_as(Some(second), "paginate_by", Some("10"), str::parse::<i64>)
        .await
        .unwrap();

    assert_eq!(on_first, Some(25));
    assert_eq!(on_second, Some(10));
}

#[tokio::test]
async fn all_for_site_materializes_the_full_mapping() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;
    store.seed_var(site, "theme", "dark");
    store.seed_var(site, "paginate_by", "10");

    let vars = facade(&store, &cache_with(true));
    let mapping = vars.all_for_site(Some(site)).await.unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("theme").map(String::as_str), Some("dark"));
    assert_eq!(mapping.get("paginate_by").map(String::as_str), Some("10"));
}

#[tokio::test]
async fn disabled_cache_falls_back_to_single_row_lookups() {
    let store = InMemoryStore::new();
    let site = store.seed_site("example.com", "Example").id;
    store.seed_var(site, "theme", "dark");

    let vars = facade(&store, &cache_with(false));
    assert_eq!(vars.get_value(Some(site), "theme").await.unwrap(), "dark");
    assert_eq!(
        vars.get_value_or(Some(site), "missing", Some("fallback"))
            .await
            .unwrap()
            .as_deref(),
        Some("fallback")
    );

    // Point reads, never a full-site materialization.
    assert_eq!(store.get_var_query_count(), 2);
    assert_eq!(store.list_var_query_count(), 0);
}
