//! End-to-End Console Flow Tests
//!
//! Drive a ConsoleSession against the in-memory backend the way an operator
//! would: open the products view, type into the reference fields, create
//! missing entries, edit, cancel and save.

use std::sync::Arc;

use async_trait::async_trait;
use backend_client::testing::{MockBackend, MockCall};
use console_core::{ConsoleConfig, EntryId, MessageKind, Product, TaxonomyEntry, TaxonomyKind};
use console_state::{
    Confirm, ConsoleError, ConsoleSession, CreateOutcome, DraftPhase, FieldState, SaveOutcome,
    Tab,
};

// ============================================================================
// Helper Functions
// ============================================================================

struct Always(bool);

#[async_trait]
impl Confirm for Always {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

fn seeded_backend() -> Arc<MockBackend> {
    let mut galaxy = Product::new("p1", "Galaxy S23");
    galaxy.category_id = Some(EntryId::from(1u64));
    galaxy.brand_id = Some(EntryId::new("b2"));
    galaxy.price = 4500.0;

    let mut laptop = Product::new("p2", "ThinkPad X1");
    laptop.category_id = Some(EntryId::from(2u64));

    Arc::new(
        MockBackend::new()
            .with_taxonomy(
                TaxonomyKind::Category,
                vec![TaxonomyEntry::new(1u64, "Phones"), TaxonomyEntry::new(2u64, "Laptops")],
            )
            .with_taxonomy(
                TaxonomyKind::Brand,
                vec![TaxonomyEntry::new("b1", "Apple"), TaxonomyEntry::new("b2", "Samsung")],
            )
            .with_products(vec![galaxy, laptop])
            .with_next_id(3),
    )
}

async fn products_session(backend: &Arc<MockBackend>) -> ConsoleSession {
    let mut session = ConsoleSession::new(ConsoleConfig::default(), backend.clone());
    let failures = session.select_tab(Tab::Products).await;
    assert!(failures.is_empty());
    session.start_create();
    session
}

fn candidate_names(session: &ConsoleSession, kind: TaxonomyKind) -> Vec<String> {
    let view = session.draft_view();
    let field = match kind {
        TaxonomyKind::Category => view.category,
        TaxonomyKind::Brand => view.brand,
    };
    field.candidates.into_iter().map(|entry| entry.name).collect()
}

// ============================================================================
// Reference Field Resolution
// ============================================================================

#[tokio::test]
async fn test_partial_query_filters_candidates() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    session.query_changed(TaxonomyKind::Category, "pho");

    assert_eq!(candidate_names(&session, TaxonomyKind::Category), vec!["Phones"]);
    assert_eq!(
        session.draft().field(TaxonomyKind::Category).state(),
        FieldState::OpenBrowsing
    );
}

#[tokio::test]
async fn test_unknown_query_creates_and_selects_entry() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    session.query_changed(TaxonomyKind::Category, "Tablets");
    let view = session.draft_view();
    assert!(view.category.candidates.is_empty());
    assert_eq!(view.category.state, FieldState::OpenNoMatch);
    assert!(view.category.can_create);

    let outcome = session
        .request_create(TaxonomyKind::Category, &Always(true))
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Created(TaxonomyEntry::new(3u64, "Tablets")));
    let field = session.draft().field(TaxonomyKind::Category);
    assert_eq!(field.query(), "Tablets");
    assert_eq!(field.selected_id(), Some(&EntryId::from(3u64)));
    assert_eq!(
        session.cache().lookup(TaxonomyKind::Category, &EntryId::from(3u64)),
        Some("Tablets")
    );
}

#[tokio::test]
async fn test_declined_create_sends_nothing() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;
    session.query_changed(TaxonomyKind::Brand, "Nokia");
    let calls_before = backend.total_calls();

    let outcome = session
        .request_create(TaxonomyKind::Brand, &Always(false))
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Declined);
    assert_eq!(backend.total_calls(), calls_before);
    assert_eq!(session.cache().entries(TaxonomyKind::Brand).len(), 2);
    assert_eq!(session.draft().field(TaxonomyKind::Brand).selected_id(), None);
}

#[tokio::test]
async fn test_create_not_offered_for_blank_query() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;
    session.query_changed(TaxonomyKind::Brand, "   ");

    let err = session
        .request_create(TaxonomyKind::Brand, &Always(true))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::CreateNotAvailable(TaxonomyKind::Brand)));
    assert_eq!(backend.call_count(MockCall::CreateTaxonomy(TaxonomyKind::Brand)), 0);
}

#[tokio::test]
async fn test_select_candidate_then_retype_clears_id() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    session.focus_field(TaxonomyKind::Brand);
    let picked = session.select_candidate(TaxonomyKind::Brand, 1).unwrap();
    assert_eq!(picked.name, "Samsung");
    assert_eq!(session.draft().draft().brand_id(), Some(&EntryId::new("b2")));

    session.query_changed(TaxonomyKind::Brand, "Samsun");
    assert_eq!(session.draft().draft().brand_id(), None);
    assert!(session.select_candidate(TaxonomyKind::Brand, 5).is_none());
}

// ============================================================================
// Edit, Cancel and Save
// ============================================================================

#[tokio::test]
async fn test_edit_fills_fields_by_reverse_lookup() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    session.start_edit(&EntryId::new("p2")).await.unwrap();

    assert_eq!(session.draft().phase(), DraftPhase::Editing(EntryId::new("p2")));
    let view = session.draft_view();
    assert_eq!(view.category.value.query, "Laptops");
    assert_eq!(view.category.value.selected_id, Some(EntryId::from(2u64)));
    assert!(!view.category.value.is_open);
    assert_eq!(view.brand.value.query, "");
    assert_eq!(view.brand.value.selected_id, None);
}

#[tokio::test]
async fn test_edit_loads_reference_lists_and_unlisted_product() {
    let backend = seeded_backend();
    let mut session = ConsoleSession::new(ConsoleConfig::default(), backend.clone());

    session.start_edit(&EntryId::new("p1")).await.unwrap();

    assert_eq!(backend.call_count(MockCall::GetProduct), 1);
    let draft = session.draft().draft();
    assert_eq!(draft.name, "Galaxy S23");
    assert_eq!(draft.field(TaxonomyKind::Category).query(), "Phones");
    assert_eq!(draft.field(TaxonomyKind::Brand).query(), "Samsung");
}

#[tokio::test]
async fn test_edit_of_missing_product_fails() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    let err = session.start_edit(&EntryId::new("p404")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Fetch { .. }));
    assert_eq!(session.draft().phase(), DraftPhase::Creating);
}

#[tokio::test]
async fn test_cancel_restores_blank_form_from_any_state() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;
    let blank = session.draft_view();

    session.start_edit(&EntryId::new("p1")).await.unwrap();
    session.query_changed(TaxonomyKind::Category, "Tab");
    session.draft_mut().set_stock(12);
    session.cancel_draft();
    assert_eq!(session.draft_view(), blank);

    session.query_changed(TaxonomyKind::Brand, "Nokia");
    session.focus_field(TaxonomyKind::Category);
    session.cancel_draft();
    assert_eq!(session.draft_view(), blank);
}

#[tokio::test]
async fn test_save_with_blank_name_issues_no_request() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;
    let calls_before = backend.total_calls();

    let err = session.save_draft().await.unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)));
    assert_eq!(backend.total_calls(), calls_before);
}

#[tokio::test]
async fn test_save_new_product_with_created_brand() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    session.draft_mut().set_name("Moto G");
    session.draft_mut().set_price(999.0);
    session.query_changed(TaxonomyKind::Category, "pho");
    session.select_candidate(TaxonomyKind::Category, 0).unwrap();
    session.query_changed(TaxonomyKind::Brand, "Motorola");
    session
        .request_create(TaxonomyKind::Brand, &Always(true))
        .await
        .unwrap();

    let outcome = session.save_draft().await.unwrap();

    assert_eq!(outcome, SaveOutcome::Created(Some(EntryId::from(4u64))));
    let payload = backend.payloads().pop().unwrap();
    assert_eq!(payload.category_id, Some(EntryId::from(1u64)));
    assert_eq!(payload.brand_id, Some(EntryId::from(3u64)));
    assert_eq!(session.catalog().products().len(), 3);
    assert_eq!(session.draft().phase(), DraftPhase::Creating);
    assert_eq!(session.draft().draft().name, "");
}

#[tokio::test]
async fn test_update_keeps_unchanged_references() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;

    session.start_edit(&EntryId::new("p1")).await.unwrap();
    session.draft_mut().set_price(4200.0);
    let outcome = session.save_draft().await.unwrap();

    assert_eq!(outcome, SaveOutcome::Updated(EntryId::new("p1")));
    let payload = backend.payloads().pop().unwrap();
    assert_eq!(payload.category_id, Some(EntryId::from(1u64)));
    assert_eq!(payload.brand_id, Some(EntryId::new("b2")));
    assert_eq!(payload.price, 4200.0);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;
    let id = EntryId::new("p2");

    assert!(!session.delete_product(&id, &Always(false)).await.unwrap());
    assert_eq!(backend.call_count(MockCall::DeleteProduct), 0);

    assert!(session.delete_product(&id, &Always(true)).await.unwrap());
    assert!(session.catalog().find(&id).is_none());
}

// ============================================================================
// Chat, Tabs and Rendering
// ============================================================================

#[tokio::test]
async fn test_chat_round_trip_and_offline_gate() {
    let backend = seeded_backend();
    let mut session = ConsoleSession::new(ConsoleConfig::default(), backend.clone());

    let reply = session.send_message("tem galaxy?").await.unwrap().unwrap();
    assert_eq!(reply.kind, MessageKind::Bot);
    assert_eq!(session.chat().len(), 2);

    backend.fail_on(MockCall::Probe);
    session.probe().await;
    assert!(!session.render_state().can_send);
    assert!(matches!(
        session.send_message("oi").await,
        Err(ConsoleError::Offline)
    ));

    session.clear_chat();
    assert!(session.chat().is_empty());
}

#[tokio::test]
async fn test_tab_reload_failures_do_not_block_switch() {
    let backend = seeded_backend();
    backend.fail_on(MockCall::ListHistory);
    let mut session = ConsoleSession::new(ConsoleConfig::default(), backend.clone());

    let failures = session.select_tab(Tab::History).await;

    assert_eq!(failures.len(), 1);
    assert_eq!(session.active_tab(), Tab::History);
}

#[tokio::test]
async fn test_render_state_serializes() {
    let backend = seeded_backend();
    let mut session = products_session(&backend).await;
    session.query_changed(TaxonomyKind::Category, "lap");

    let state = serde_json::to_value(session.render_state()).unwrap();

    assert_eq!(state["active_tab"], "products");
    assert_eq!(state["connection_status"], "online");
    assert_eq!(state["draft"]["phase"], "creating");
    assert_eq!(state["draft"]["category"]["query"], "lap");
    assert_eq!(state["draft"]["category"]["state"], "open_browsing");
    assert_eq!(state["draft"]["category"]["candidates"][0]["nome"], "Laptops");
    assert_eq!(state["products"].as_array().unwrap().len(), 2);
}
