mod common;

use common::*;
use legaldoc_server::compositor::BlockKind;
use legaldoc_server::forms::FormState;
use legaldoc_server::record::FieldValue;
use legaldoc_server::service::ServiceError;
use legaldoc_server::store::{DocumentStatus, DocumentStore, StoreError};
use legaldoc_server::templates::catalog;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_purchase_agreement_end_to_end() {
    let (service, store) = memory_service();
    let view = service
        .create_session(catalog::PURCHASE_AGREEMENT, Some(purchase_agreement()))
        .unwrap();
    assert_eq!(view.completion, 100);
    assert!(view.errors.is_empty(), "{:?}", view.errors);

    let saved = service.save_complete(view.session_id).await.unwrap();
    assert_eq!(saved.status, DocumentStatus::Completed);
    assert_eq!(saved.data, purchase_agreement());
    assert_eq!(saved.file_name, "purchase-agreement-jane-buyer.pdf");
    assert_eq!(store.len().await, 1);

    let doc = service.generate_for_session(view.session_id).await.unwrap();
    let text = all_text(&doc);
    assert!(text.contains("$500,000.00"), "{text}");
    assert!(text.contains("$25,000.00"));
    assert!(text.contains("2024-06-01"));
    assert_eq!(count_blocks(&doc, BlockKind::Signature), 4);
    assert!(doc.bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_termination_letter_keeps_distribution_lines() {
    let (service, _) = memory_service();
    let doc = service
        .generate(catalog::TERMINATION_LETTER, &termination_letter())
        .await
        .unwrap();
    assert_eq!(count_blocks(&doc, BlockKind::BlankLine), 4);
    assert!(all_text(&doc).contains("Distribution"));
}

#[tokio::test]
async fn test_unknown_template_is_rejected() {
    let (service, _) = memory_service();
    let err = service
        .generate("unknown-template-id", &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Composition(_)));
}

#[tokio::test]
async fn test_failed_store_write_leaves_session_untouched() {
    let store = Arc::new(FlakyStore::new());
    let service = service_with(store.clone());
    let view = service
        .create_session(catalog::TERMINATION_LETTER, Some(termination_letter()))
        .unwrap();

    store.set_failing(true);
    let err = service.save_complete(view.session_id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::Unavailable(_))
    ));
    let after = service.session_view(view.session_id).unwrap();
    assert_eq!(after.state, FormState::Editing);
    assert_eq!(after.document_id, None);
    assert_eq!(store.count().await, 0);

    store.set_failing(false);
    service.save_complete(view.session_id).await.unwrap();
    let after = service.session_view(view.session_id).unwrap();
    assert_eq!(after.state, FormState::CompleteSaved);
    assert!(after.document_id.is_some());
}

#[tokio::test]
async fn test_concurrent_first_saves_share_one_record() {
    let store = Arc::new(FlakyStore::with_write_delay(Duration::from_millis(50)));
    let service = service_with(store.clone());
    let view = service
        .create_session(catalog::TERMINATION_LETTER, Some(termination_letter()))
        .unwrap();

    let (first, second) = tokio::join!(
        service.save_draft(view.session_id),
        service.save_draft(view.session_id)
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(store.count().await, 1);

    let after = service.session_view(view.session_id).unwrap();
    assert_eq!(after.document_id, Some(first.id));
    assert_eq!(after.state, FormState::DraftSaved);
}

#[tokio::test]
async fn test_accented_party_name_in_file_name() {
    let (service, _) = memory_service();
    let mut data = purchase_agreement();
    data.insert("buyerName".to_string(), FieldValue::text("Łukasz Żółw"));
    let doc = service
        .generate(catalog::PURCHASE_AGREEMENT, &data)
        .await
        .unwrap();
    assert_eq!(doc.file_name, "purchase-agreement-lukasz-zolw.pdf");
    assert!(all_text(&doc).contains("Łukasz Żółw"));
}

#[tokio::test]
async fn test_required_field_cleared_lowers_completion() {
    let (service, _) = memory_service();
    let view = service
        .create_session(catalog::PURCHASE_AGREEMENT, Some(purchase_agreement()))
        .unwrap();
    let update = service.clear_field(view.session_id, "closingDate").unwrap();
    assert!(update.completion < 100);
    assert!(update.error.is_some());

    let update = service
        .set_field(view.session_id, "closingDate", FieldValue::text("2024-06-01"))
        .unwrap();
    assert_eq!(update.completion, 100);
    assert!(update.error.is_none());
}

#[tokio::test]
async fn test_signed_document_stays_closed() {
    let (service, store) = memory_service();
    let view = service
        .create_session(catalog::TERMINATION_LETTER, Some(termination_letter()))
        .unwrap();
    let mut doc = service.save_complete(view.session_id).await.unwrap();

    let reopened = service.open_document(doc.id).await.unwrap();
    assert_eq!(reopened.data, doc.data);

    doc.status = DocumentStatus::Signed;
    store.save(doc.clone()).await.unwrap();
    assert!(matches!(
        service.open_document(doc.id).await,
        Err(ServiceError::DocumentSigned(_))
    ));
}
