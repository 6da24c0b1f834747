mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use legaldoc_server::api::content::GeneratedFile;
use legaldoc_server::store::GeneratedDocument;
use legaldoc_server::templates::catalog;
use legaldoc_server::ErrorResponse;
use serde_json::{json, Value};

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .service(web::scope("/api").configure(legaldoc_server::api::config)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_list_and_get_templates() {
    let (service, _) = memory_service();
    let app = app!(service);

    let req = test::TestRequest::get().uri("/api/templates").to_request();
    let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 5);

    let req = test::TestRequest::get()
        .uri("/api/templates?category=termination")
        .to_request();
    let filtered: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], catalog::TERMINATION_LETTER);

    let req = test::TestRequest::get()
        .uri("/api/templates/purchase-agreement")
        .to_request();
    let template: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(template["name"], "Residential Purchase Agreement");
    assert!(template["fields"].as_array().unwrap().len() > 10);

    let req = test::TestRequest::get()
        .uri("/api/templates/unknown-template-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "NotFound");
}

#[actix_web::test]
async fn test_session_flow() {
    let (service, _) = memory_service();
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({ "templateId": catalog::PURCHASE_AGREEMENT }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let view: Value = test::read_body_json(resp).await;
    let id = view["sessionId"].as_str().unwrap().to_string();
    assert_eq!(view["state"], "empty");
    assert_eq!(view["canGenerate"], false);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/generate"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/complete"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.errors.iter().any(|e| e.field == "buyerName"));

    for (name, value) in purchase_agreement() {
        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{id}/fields/{name}"))
            .set_json(json!({ "value": value }))
            .to_request();
        let update: Value = test::call_and_read_body_json(&app, req).await;
        assert!(update["error"].is_null(), "{name}: {update}");
    }

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{id}/fields/noSuchField"))
        .set_json(json!({ "value": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{id}"))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["completion"], 100);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/complete"))
        .to_request();
    let saved: GeneratedDocument = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved.template_id, catalog::PURCHASE_AGREEMENT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/generate"))
        .to_request();
    let generated: GeneratedFile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        generated.file.metadata.filename,
        "purchase-agreement-jane-buyer.pdf"
    );
    assert!(generated.page_count >= 1);
    assert!(generated.file.decode_data().unwrap().starts_with(b"%PDF-"));

    let req = test::TestRequest::get()
        .uri("/api/documents?status=completed&search=jane")
        .to_request();
    let listed: Vec<GeneratedDocument> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, saved.id);

    let req = test::TestRequest::post()
        .uri(&format!("/api/documents/{}/edit", saved.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/documents/{}", saved.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_stateless_generate() {
    let (service, _) = memory_service();
    let app = app!(service);

    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({
            "templateId": catalog::TERMINATION_LETTER,
            "data": termination_letter(),
        }))
        .to_request();
    let generated: GeneratedFile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(generated.file.metadata.mime_type, "application/pdf");
    assert_eq!(
        generated.file.metadata.size_bytes,
        generated.file.decode_data().unwrap().len()
    );

    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({ "templateId": "unknown-template-id", "data": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_store_failure_maps_to_bad_gateway() {
    let store = std::sync::Arc::new(FlakyStore::new());
    store.set_failing(true);
    let app = app!(service_with(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({
            "templateId": catalog::TERMINATION_LETTER,
            "data": termination_letter(),
        }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    let id = view["sessionId"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/draft"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let req = test::TestRequest::get()
        .uri(&format!("/api/documents/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
