mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskmaster::models::Category;

use common::{app, register_user, test_state};

#[actix_rt::test]
async fn test_category_flow() {
    let app = test::init_service(app(test_state())).await;
    let alice = register_user(&app, "Alice", "alice@example.com").await;
    let bob = register_user(&app, "Bob", "bob@example.com").await;
    let auth = |token: &str| ("Authorization", format!("Bearer {}", token));

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(auth(&alice.token))
        .set_json(json!({ "name": "Study", "color": "#10B981" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let study: Category = test::read_body_json(resp).await;
    assert_eq!(study.name, "Study");
    assert_eq!(study.user_id, alice.id);

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(auth(&alice.token))
        .set_json(json!({ "name": "Errands" }))
        .to_request();
    let errands: Category = test::call_and_read_body_json(&app, req).await;
    assert_eq!(errands.color, "#000000");

    // Names are unique per owner, not globally.
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(auth(&alice.token))
        .set_json(json!({ "name": "Study" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(auth(&bob.token))
        .set_json(json!({ "name": "Study" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(auth(&alice.token))
        .set_json(json!({ "name": "Bad colour", "color": "green" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/categories")
        .insert_header(auth(&alice.token))
        .to_request();
    let listed: Vec<Category> = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Errands", "Study"]);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/categories/{}", study.id))
        .insert_header(auth(&bob.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/categories/{}", study.id))
        .insert_header(auth(&alice.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "id": study.id }));

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
