//! The synchronization controller: owns the authoritative item list and
//! orchestrates fetch-on-load, submit, delete, and post-mutation refresh.
//!
//! The item list is only ever replaced wholesale after a fetch, never patched
//! in place. That discipline is the sole consistency mechanism here: when two
//! submits race, both run as independent call chains and the last refresh
//! response wins.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::form::{self, EditSession};
use crate::model::InventoryItem;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Narrow interface to the notification surface (toasts and confirm dialogs).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Fire-and-forget transient feedback.
    fn notify(&self, kind: NoticeKind, title: &str, body: Option<&str>);

    /// Blocks the flow until the user answers. Dismissal counts as a no.
    async fn confirm(&self, title: &str, body: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    /// A listing failure is a view state, not an event: the table renders it
    /// as a banner instead of conflating it with "no data".
    Failed(String),
}

#[derive(Debug, Default)]
pub struct AppState {
    pub items: Vec<InventoryItem>,
    pub loading: LoadingState,
    pub session: EditSession,
}

#[derive(Debug)]
pub struct SyncController<S, N> {
    store: S,
    notifier: N,
    state: Arc<RwLock<AppState>>,
}

impl<S: Clone, N: Clone> Clone for SyncController<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifier: self.notifier.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S: RecordStore, N: Notifier> SyncController<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            state: Arc::new(RwLock::new(AppState::default())),
        }
    }

    pub fn state(&self) -> Arc<RwLock<AppState>> {
        self.state.clone()
    }

    /// Replaces the item list with a fresh listing. Runs to completion; there
    /// is no cancellation.
    pub async fn refresh(&self) {
        self.state.write().unwrap().loading = LoadingState::Loading;
        match self.store.list_all().await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "inventory_refreshed");
                let mut state = self.state.write().unwrap();
                state.items = items;
                state.loading = LoadingState::Idle;
            }
            Err(err) => {
                tracing::error!(error = %err, "inventory_refresh_failed");
                let mut state = self.state.write().unwrap();
                state.items = Vec::new();
                state.loading = LoadingState::Failed(err.to_string());
            }
        }
    }

    /// Resolves the edit session and sends the draft to the store. The
    /// session is cleared (and the list refetched) only when the store call
    /// succeeds; a failed mutation keeps the draft for correction.
    pub async fn submit(&self) {
        let (target, draft) = {
            let state = self.state.read().unwrap();
            (
                state.session.target().map(str::to_string),
                state.session.draft.clone(),
            )
        };
        let payload = match form::to_payload(&draft) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(error = %err, "submit_rejected");
                self.notifier
                    .notify(NoticeKind::Error, "Invalid input", Some(&err.to_string()));
                return;
            }
        };

        let result = match target.as_deref() {
            Some(id) => self.store.update(id, &payload).await,
            None => self.store.create(&payload).await,
        };
        match result {
            Ok(()) => {
                let title = if target.is_some() {
                    "Item updated"
                } else {
                    "Item added"
                };
                self.notifier.notify(NoticeKind::Success, title, None);
                self.state.write().unwrap().session.clear();
                self.refresh().await;
            }
            Err(err) => {
                let title = if target.is_some() {
                    "Failed to update item"
                } else {
                    "Failed to add item"
                };
                tracing::error!(error = %err, "submit_failed");
                self.notifier
                    .notify(NoticeKind::Error, title, Some(&err.to_string()));
            }
        }
    }

    /// Asks for confirmation, then deletes and refetches. A negative or
    /// dismissed answer leaves everything untouched.
    pub async fn remove(&self, id: &str) {
        let name = {
            let state = self.state.read().unwrap();
            state
                .items
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.name.clone())
        };
        let Some(name) = name else {
            tracing::debug!(id = %id, "remove_unknown_item");
            return;
        };
        if !self
            .notifier
            .confirm("Delete item", &format!("Remove {name}?"))
            .await
        {
            return;
        }
        match self.store.delete(id).await {
            Ok(()) => {
                self.notifier.notify(NoticeKind::Success, "Item deleted", None);
                self.refresh().await;
            }
            Err(err) => {
                tracing::error!(error = %err, id = %id, "delete_failed");
                self.notifier.notify(
                    NoticeKind::Error,
                    "Failed to delete item",
                    Some(&err.to_string()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Draft;
    use crate::model::ItemPayload;
    use crate::store::StoreError;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StoreInner {
        rows: Vec<InventoryItem>,
        calls: Vec<String>,
        fail_list: bool,
        fail_mutations: bool,
        next_seq: i64,
    }

    #[derive(Clone, Default)]
    struct MockStore(Arc<Mutex<StoreInner>>);

    impl MockStore {
        fn seed(&self, name: &str, price: &str, qty: i64) {
            let mut inner = self.0.lock().unwrap();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.rows.push(InventoryItem {
                id: format!("item-{seq}"),
                name: name.to_string(),
                price: Decimal::from_str(price).unwrap(),
                qty,
                created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::seconds(seq),
            });
        }

        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().calls.clone()
        }

        fn row_names(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .rows
                .iter()
                .map(|row| row.name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl RecordStore for MockStore {
        async fn list_all(&self) -> Result<Vec<InventoryItem>, StoreError> {
            let mut inner = self.0.lock().unwrap();
            inner.calls.push("list".to_string());
            if inner.fail_list {
                return Err(StoreError::new("backend offline"));
            }
            let mut rows = inner.rows.clone();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn create(&self, payload: &ItemPayload) -> Result<(), StoreError> {
            let mut inner = self.0.lock().unwrap();
            inner.calls.push(format!(
                "create {} {} {}",
                payload.name, payload.price, payload.qty
            ));
            if inner.fail_mutations {
                return Err(StoreError::new("insert rejected"));
            }
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.rows.push(InventoryItem {
                id: format!("item-{seq}"),
                name: payload.name.clone(),
                price: payload.price,
                qty: payload.qty,
                created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::seconds(seq),
            });
            Ok(())
        }

        async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), StoreError> {
            let mut inner = self.0.lock().unwrap();
            inner.calls.push(format!("update {id}"));
            if inner.fail_mutations {
                return Err(StoreError::new("update rejected"));
            }
            if let Some(row) = inner.rows.iter_mut().find(|row| row.id == id) {
                row.name = payload.name.clone();
                row.price = payload.price;
                row.qty = payload.qty;
            }
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<(), StoreError> {
            let mut inner = self.0.lock().unwrap();
            inner.calls.push(format!("delete {id}"));
            if inner.fail_mutations {
                return Err(StoreError::new("delete rejected"));
            }
            inner.rows.retain(|row| row.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct NotifierInner {
        notices: Vec<(NoticeKind, String)>,
        confirm_answer: bool,
        confirms: usize,
    }

    #[derive(Clone, Default)]
    struct MockNotifier(Arc<Mutex<NotifierInner>>);

    impl MockNotifier {
        fn answering(answer: bool) -> Self {
            let notifier = Self::default();
            notifier.0.lock().unwrap().confirm_answer = answer;
            notifier
        }

        fn notices(&self) -> Vec<(NoticeKind, String)> {
            self.0.lock().unwrap().notices.clone()
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        fn notify(&self, kind: NoticeKind, title: &str, _body: Option<&str>) {
            self.0.lock().unwrap().notices.push((kind, title.to_string()));
        }

        async fn confirm(&self, _title: &str, _body: &str) -> bool {
            let mut inner = self.0.lock().unwrap();
            inner.confirms += 1;
            inner.confirm_answer
        }
    }

    fn controller(
        store: &MockStore,
        notifier: &MockNotifier,
    ) -> SyncController<MockStore, MockNotifier> {
        SyncController::new(store.clone(), notifier.clone())
    }

    fn set_draft(ctrl: &SyncController<MockStore, MockNotifier>, name: &str, price: &str, qty: &str) {
        let state = ctrl.state();
        state.write().unwrap().session.draft = Draft {
            name: name.to_string(),
            price: price.to_string(),
            qty: qty.to_string(),
        };
    }

    #[tokio::test]
    async fn create_submit_inserts_then_lists_newest_first() {
        let store = MockStore::default();
        store.seed("Pen", "1.5", 10);
        let notifier = MockNotifier::default();
        let ctrl = controller(&store, &notifier);

        set_draft(&ctrl, "Pencil", "0.5", "20");
        ctrl.submit().await;

        assert_eq!(store.calls(), vec!["create Pencil 0.5 20", "list"]);
        let state = ctrl.state();
        let state = state.read().unwrap();
        let names: Vec<_> = state.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Pencil", "Pen"]);
        assert!(!state.session.is_editing());
        assert!(state.session.draft.is_empty());
        assert_eq!(state.loading, LoadingState::Idle);
        assert_eq!(
            notifier.notices(),
            vec![(NoticeKind::Success, "Item added".to_string())]
        );
    }

    #[tokio::test]
    async fn edit_submit_updates_the_target() {
        let store = MockStore::default();
        store.seed("Pen", "1.5", 10);
        let notifier = MockNotifier::default();
        let ctrl = controller(&store, &notifier);
        ctrl.refresh().await;

        {
            let state = ctrl.state();
            let mut state = state.write().unwrap();
            let item = state.items[0].clone();
            state.session.begin_edit(&item);
            state.session.draft.qty = "3".to_string();
        }
        ctrl.submit().await;

        assert_eq!(store.calls(), vec!["list", "update item-0", "list"]);
        let state = ctrl.state();
        let state = state.read().unwrap();
        assert_eq!(state.items[0].qty, 3);
        assert!(!state.session.is_editing());
        assert_eq!(
            notifier.notices(),
            vec![(NoticeKind::Success, "Item updated".to_string())]
        );
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_store() {
        let store = MockStore::default();
        let notifier = MockNotifier::default();
        let ctrl = controller(&store, &notifier);

        set_draft(&ctrl, "", "10", "5");
        ctrl.submit().await;

        assert!(store.calls().is_empty());
        let state = ctrl.state();
        let state = state.read().unwrap();
        // Draft preserved for correction.
        assert_eq!(state.session.draft.price, "10");
        assert_eq!(
            notifier.notices(),
            vec![(NoticeKind::Error, "Invalid input".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_mutation_keeps_the_session() {
        let store = MockStore::default();
        store.0.lock().unwrap().fail_mutations = true;
        let notifier = MockNotifier::default();
        let ctrl = controller(&store, &notifier);

        set_draft(&ctrl, "Pencil", "0.5", "20");
        ctrl.submit().await;

        // The store was called, but no refresh followed and the draft stays.
        assert_eq!(store.calls(), vec!["create Pencil 0.5 20"]);
        let state = ctrl.state();
        let state = state.read().unwrap();
        assert_eq!(state.session.draft.name, "Pencil");
        assert_eq!(
            notifier.notices(),
            vec![(NoticeKind::Error, "Failed to add item".to_string())]
        );
    }

    #[tokio::test]
    async fn declined_confirm_is_a_noop() {
        let store = MockStore::default();
        store.seed("Pen", "1.5", 10);
        let notifier = MockNotifier::answering(false);
        let ctrl = controller(&store, &notifier);
        ctrl.refresh().await;

        ctrl.remove("item-0").await;

        assert_eq!(store.calls(), vec!["list"]);
        assert_eq!(store.row_names(), vec!["Pen"]);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn confirmed_remove_deletes_and_refreshes() {
        let store = MockStore::default();
        store.seed("Pen", "1.5", 10);
        let notifier = MockNotifier::answering(true);
        let ctrl = controller(&store, &notifier);
        ctrl.refresh().await;

        ctrl.remove("item-0").await;

        assert_eq!(store.calls(), vec!["list", "delete item-0", "list"]);
        let state = ctrl.state();
        assert!(state.read().unwrap().items.is_empty());
        assert_eq!(
            notifier.notices(),
            vec![(NoticeKind::Success, "Item deleted".to_string())]
        );
    }

    #[tokio::test]
    async fn removing_an_unknown_id_asks_nothing() {
        let store = MockStore::default();
        let notifier = MockNotifier::answering(true);
        let ctrl = controller(&store, &notifier);

        ctrl.remove("item-99").await;

        assert!(store.calls().is_empty());
        assert_eq!(notifier.0.lock().unwrap().confirms, 0);
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_a_failed_state() {
        let store = MockStore::default();
        store.seed("Pen", "1.5", 10);
        let notifier = MockNotifier::default();
        let ctrl = controller(&store, &notifier);
        ctrl.refresh().await;
        assert_eq!(ctrl.state().read().unwrap().items.len(), 1);

        store.0.lock().unwrap().fail_list = true;
        ctrl.refresh().await;

        let state = ctrl.state();
        let state = state.read().unwrap();
        assert!(state.items.is_empty());
        assert_eq!(
            state.loading,
            LoadingState::Failed("backend offline".to_string())
        );
        // Listing failures are a view state, not a toast.
        assert!(notifier.notices().is_empty());
    }
}
