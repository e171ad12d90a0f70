mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskmaster::models::{Task, TaskPriority, TaskStatus};
use uuid::Uuid;

use common::{app, create_task, list_tasks, register_user, test_state};

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = test::init_service(app(test_state())).await;
    let user = register_user(&app, "Crud User", "crud@example.com").await;

    let created: Task = serde_json::from_value(
        create_task(
            &app,
            &user.token,
            json!({
                "title": "Buy milk",
                "priority": "High",
                "status": "Not Started",
                "dueDate": "2030-01-01T09:00:00Z"
            }),
        )
        .await,
    )
    .unwrap();
    assert_eq!(created.user_id, user.id);
    assert_eq!(created.priority, TaskPriority::High);
    assert_eq!(created.category, "Work");

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "status": "In Progress", "description": "2 litres" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.description.as_deref(), Some("2 litres"));
    assert_eq!(updated.title, "Buy milk");

    // Explicit null clears nullable fields.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "dueDate": null, "description": null }))
        .to_request();
    let cleared: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cleared.due_date, None);
    assert_eq!(cleared.description, None);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "id": created.id }));

    assert!(list_tasks(&app, &user.token).await.is_empty());
}

#[actix_rt::test]
async fn test_round_trip_changes_only_the_updated_field() {
    let app = test::init_service(app(test_state())).await;
    let user = register_user(&app, "Round Trip", "roundtrip@example.com").await;

    let created = create_task(
        &app,
        &user.token,
        json!({ "title": "Buy milk", "priority": "High", "status": "Not Started" }),
    )
    .await;
    let before = list_tasks(&app, &user.token).await;
    assert_eq!(before, vec![created.clone()]);

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "status": "Completed" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let mut after = list_tasks(&app, &user.token).await.remove(0);
    assert_eq!(after["status"], "Completed");

    let mut expected = created;
    expected["status"] = json!("Completed");
    expected["updatedAt"] = after["updatedAt"].clone();
    assert_eq!(after.take(), expected);
}

#[actix_rt::test]
async fn test_list_is_newest_first() {
    let app = test::init_service(app(test_state())).await;
    let user = register_user(&app, "Orderly", "orderly@example.com").await;

    for title in ["first", "second", "third"] {
        create_task(&app, &user.token, json!({ "title": title })).await;
    }

    let titles: Vec<String> = list_tasks(&app, &user.token)
        .await
        .into_iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[actix_rt::test]
async fn test_invalid_task_payloads() {
    let app = test::init_service(app(test_state())).await;
    let user = register_user(&app, "Picky", "picky@example.com").await;

    let cases = vec![
        (json!({}), Some("Please add a task title")),
        (json!({ "title": "   " }), Some("Please add a task title")),
        (json!({ "title": "ok", "priority": "Urgent" }), None),
        (json!({ "title": "ok", "status": "Done" }), None),
        (json!({ "title": "ok", "owner": "someone" }), None),
        (json!({ "title": "a".repeat(201) }), None),
    ];
    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&user.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::BAD_REQUEST,
            "payload {} should be rejected",
            payload
        );
        let body: Value = test::read_body_json(resp).await;
        if let Some(message) = message {
            assert_eq!(body["error"], message);
        }
    }

    let created = create_task(&app, &user.token, json!({ "title": "keep me" })).await;
    let id = created["id"].as_str().unwrap();

    // Ownership cannot be smuggled in through an update.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "userId": Uuid::new_v4() }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "image": "not a url" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Image must be a valid URL");

    let req = test::TestRequest::put()
        .uri("/api/tasks/not-a-uuid")
        .insert_header(bearer(&user.token))
        .set_json(json!({ "title": "x" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    assert_eq!(list_tasks(&app, &user.token).await, vec![created]);
}

#[actix_rt::test]
async fn test_missing_and_foreign_tasks() {
    let app = test::init_service(app(test_state())).await;
    let owner = register_user(&app, "Owner", "owner@example.com").await;
    let intruder = register_user(&app, "Intruder", "intruder@example.com").await;

    let task = create_task(&app, &owner.token, json!({ "title": "private" })).await;
    let id = task["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(bearer(&intruder.token))
        .set_json(json!({ "title": "mine now" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(bearer(&intruder.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized");

    assert_eq!(list_tasks(&app, &owner.token).await, vec![task.clone()]);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", Uuid::new_v4()))
        .insert_header(bearer(&owner.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Task not found");

    // Deleting twice: the second attempt is a 404.
    for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let req = test::TestRequest::delete()
            .uri(&format!("/api/tasks/{}", id))
            .insert_header(bearer(&owner.token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }
}

#[actix_rt::test]
async fn test_two_users_end_to_end() {
    let app = test::init_service(app(test_state())).await;
    let a = register_user(&app, "User A", "a@example.com").await;
    let b = register_user(&app, "User B", "b@example.com").await;

    let task = create_task(&app, &a.token, json!({ "title": "Buy milk" })).await;
    let id = task["id"].as_str().unwrap().to_string();
    assert!(list_tasks(&app, &b.token).await.is_empty());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(bearer(&b.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not authorized");
    assert!(list_tasks(&app, &b.token).await.is_empty());
    assert_eq!(list_tasks(&app, &a.token).await.len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(bearer(&a.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert!(list_tasks(&app, &a.token).await.is_empty());
    assert!(list_tasks(&app, &b.token).await.is_empty());
}
