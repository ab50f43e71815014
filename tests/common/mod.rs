use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mcp_ingredient_lists::backend::{Backend, InMemoryBackend};
use mcp_ingredient_lists::client::Credential;
use mcp_ingredient_lists::lists::{CatalogItem, Ingredient, ListCollection};
use mcp_ingredient_lists::service::ListService;
use mcp_ingredient_lists::transfer::CompensationPolicy;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Remove,
    Edit,
}

/// How an injected fault shows up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The backend answers but refuses
    Rejected,
    /// The call never completes
    Unreachable,
}

#[derive(Debug, Clone)]
struct Fault {
    op: Op,
    list: String,
    kind: FaultKind,
    remaining: Option<u32>,
}

/// In-memory backend whose add, remove and edit calls can be made to fail per list.
/// Failing calls leave the stored lists untouched.
pub struct FlakyBackend {
    inner: InMemoryBackend,
    faults: Mutex<Vec<Fault>>,
    calls: Mutex<Vec<String>>,
}

impl FlakyBackend {
    pub fn new(inner: InMemoryBackend) -> Self {
        Self {
            inner,
            faults: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every matching call.
    pub fn fail(&self, op: Op, list: &str, kind: FaultKind) {
        self.push(op, list, kind, None);
    }

    /// Fails the next `times` matching calls, then recovers.
    pub fn fail_times(&self, op: Op, list: &str, kind: FaultKind, times: u32) {
        self.push(op, list, kind, Some(times));
    }

    fn push(&self, op: Op, list: &str, kind: FaultKind, remaining: Option<u32>) {
        self.faults.lock().unwrap().push(Fault {
            op,
            list: list.to_string(),
            kind,
            remaining,
        });
    }

    pub async fn snapshot(&self) -> ListCollection {
        self.inner.snapshot().await
    }

    /// Every add, remove and edit call so far, as "add Grocery Milk".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: Op, list: &str, ingredient: &Ingredient) -> Option<FaultKind> {
        let verb = match op {
            Op::Add => "add",
            Op::Remove => "remove",
            Op::Edit => "edit",
        };
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {} {}", verb, list, ingredient.name));

        let mut faults = self.faults.lock().unwrap();
        let fault = faults
            .iter_mut()
            .find(|f| f.op == op && f.list == list && f.remaining != Some(0))?;
        if let Some(remaining) = fault.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(fault.kind)
    }
}

fn injected(kind: FaultKind) -> anyhow::Result<bool> {
    match kind {
        FaultKind::Rejected => Ok(false),
        FaultKind::Unreachable => Err(anyhow::anyhow!("injected connection failure")),
    }
}

#[async_trait]
impl Backend for FlakyBackend {
    async fn create_user(&self, credential: &Credential) -> anyhow::Result<bool> {
        self.inner.create_user(credential).await
    }

    async fn fetch_catalog(&self, credential: &Credential) -> anyhow::Result<Vec<CatalogItem>> {
        self.inner.fetch_catalog(credential).await
    }

    async fn fetch_units(&self, credential: &Credential) -> anyhow::Result<Vec<String>> {
        self.inner.fetch_units(credential).await
    }

    async fn fetch_lists(&self, credential: &Credential) -> anyhow::Result<ListCollection> {
        self.inner.fetch_lists(credential).await
    }

    async fn create_list(&self, credential: &Credential, name: &str) -> anyhow::Result<bool> {
        self.inner.create_list(credential, name).await
    }

    async fn delete_list(&self, credential: &Credential, name: &str) -> anyhow::Result<bool> {
        self.inner.delete_list(credential, name).await
    }

    async fn rename_list(
        &self,
        credential: &Credential,
        old_name: &str,
        new_name: &str,
    ) -> anyhow::Result<bool> {
        self.inner.rename_list(credential, old_name, new_name).await
    }

    async fn add_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> anyhow::Result<bool> {
        if let Some(kind) = self.record(Op::Add, list, ingredient) {
            return injected(kind);
        }
        self.inner.add_ingredient(credential, list, ingredient).await
    }

    async fn remove_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> anyhow::Result<bool> {
        if let Some(kind) = self.record(Op::Remove, list, ingredient) {
            return injected(kind);
        }
        self.inner.remove_ingredient(credential, list, ingredient).await
    }

    async fn edit_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        old: &Ingredient,
        new: &Ingredient,
    ) -> anyhow::Result<bool> {
        if let Some(kind) = self.record(Op::Edit, list, old) {
            return injected(kind);
        }
        self.inner.edit_ingredient(credential, list, old, new).await
    }
}

pub struct TestEnvironment {
    pub backend: Arc<FlakyBackend>,
    pub service: ListService,
}

impl TestEnvironment {
    /// A started session over the sample "Grocery" and "Pantry" lists.
    pub async fn new() -> Self {
        Self::with_backend(InMemoryBackend::with_sample_data()).await
    }

    pub async fn with_backend(inner: InMemoryBackend) -> Self {
        let backend = Arc::new(FlakyBackend::new(inner));
        let service = ListService::with_policy(
            backend.clone(),
            Credential::new("test-cook", "test-token"),
            CompensationPolicy {
                max_attempts: 3,
                backoff: Duration::ZERO,
            },
        );
        service
            .start()
            .await
            .expect("Failed to start list session");
        Self { backend, service }
    }
}

pub fn milk() -> Ingredient {
    Ingredient::new("Milk", "Dairy", 250.0, "ml")
}

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}
