//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use factgraph::{Fact, FactStore};

/// Module fact declared in `<name>/doc.go`.
pub fn module(name: &str) -> Fact {
    Fact::new("module", name).with_file(format!("{name}/doc.go"), 1)
}

/// Three modules importing each other in a ring: a -> b -> c -> a.
pub fn ring() -> Vec<Fact> {
    vec![
        module("A").with_relation("imports", "B"),
        module("B").with_relation("imports", "C"),
        module("C").with_relation("imports", "A"),
    ]
}

/// A small service: routes call handlers, handlers call a repository,
/// the repository depends on a table.
pub fn service() -> Vec<Fact> {
    vec![
        module("internal/api").with_relation("declares", "api.Handler"),
        module("internal/store").with_relation("declares", "store.Repo"),
        Fact::new("symbol", "api.Handler")
            .with_file("internal/api/handler.go", 12)
            .with_prop("exported", true)
            .with_relation("calls", "store.Repo"),
        Fact::new("symbol", "store.Repo")
            .with_file("internal/store/repo.go", 8)
            .with_prop("exported", true)
            .with_relation("depends_on", "users"),
        Fact::new("storage", "users").with_file("migrations/001.sql", 1),
        Fact::new("route", "GET /users")
            .with_file("internal/api/routes.go", 20)
            .with_relation("calls", "api.Handler"),
        Fact::new("dependency", "internal/api/handler.go")
            .with_file("internal/api/handler.go", 3)
            .with_relation("imports", "internal/store/sql")
            .with_relation("imports", "github.com/google/uuid"),
    ]
}

/// Store populated with `facts`.
pub async fn store_with(facts: Vec<Fact>) -> FactStore {
    let store = FactStore::new();
    store.add(facts).await;
    store
}
