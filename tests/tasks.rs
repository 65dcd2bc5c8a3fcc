mod common;

use actix_web::{http::StatusCode, test, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use todoguard::models::Task;
use todoguard::routes::{MessageResponse, TaskCreatedResponse};

use common::{
    authorized, broken_task_state, register, subject_of, test_state, BACKEND_CAUSE,
};

#[actix_rt::test]
async fn test_owner_flow_and_cross_account_read() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;
    let bob = register(&app, "b@x.com", "secret2").await;

    let req = authorized(test::TestRequest::get().uri("/todos"), &alice).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = test::read_body_json(resp).await;
    assert!(tasks.is_empty());

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .set_json(json!({ "title": "t" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: TaskCreatedResponse = test::read_body_json(resp).await;
    assert_eq!(created.message, "Todo created");
    assert_eq!(created.todo.owner_id, subject_of(&alice));
    assert!(created.todo.is_active);
    assert!(created.todo.list.is_empty());

    let uri = format!("/todos/{}", created.todo.id);
    let req = authorized(test::TestRequest::get().uri(&uri), &alice).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Task = test::read_body_json(resp).await;
    assert_eq!(fetched, created.todo);

    let req = authorized(test::TestRequest::get().uri(&uri), &bob).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unauthorized access" }));
}

#[actix_rt::test]
async fn test_create_ignores_client_supplied_owner() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;
    let bob = register(&app, "b@x.com", "secret2").await;

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .set_json(json!({
            "title": "groceries",
            "list": [{ "item": "milk", "checked": false }],
            "ownerId": subject_of(&bob),
            "userId": subject_of(&bob)
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: TaskCreatedResponse = test::read_body_json(resp).await;
    assert_eq!(created.todo.owner_id, subject_of(&alice));
    assert_eq!(created.todo.list[0].item, "milk");
}

#[actix_rt::test]
async fn test_list_is_scoped_to_caller() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;
    let bob = register(&app, "b@x.com", "secret2").await;

    for (token, title) in [(&alice, "first"), (&bob, "bob's"), (&alice, "second")] {
        let req = authorized(test::TestRequest::post().uri("/todos"), token)
            .set_json(json!({ "title": title }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = authorized(test::TestRequest::get().uri("/todos"), &alice).to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["second", "first"]);
    assert!(tasks.iter().all(|t| t.owner_id == subject_of(&alice)));

    let req = authorized(test::TestRequest::get().uri("/todos"), &bob).to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "bob's");
}

#[actix_rt::test]
async fn test_update_requires_ownership() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;
    let bob = register(&app, "b@x.com", "secret2").await;

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .set_json(json!({
            "title": "original",
            "list": [{ "item": "one", "checked": false }]
        }))
        .to_request();
    let created: TaskCreatedResponse = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/todos/{}", created.todo.id);

    let req = authorized(test::TestRequest::put().uri(&uri), &bob)
        .set_json(json!({ "title": "hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unauthorized update" }));

    let req = authorized(test::TestRequest::get().uri(&uri), &alice).to_request();
    let unchanged: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged, created.todo);

    let req = authorized(test::TestRequest::put().uri(&uri), &alice)
        .set_json(json!({ "title": "renamed", "isActive": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(body, MessageResponse::new("Todo updated successfully"));

    let req = authorized(test::TestRequest::get().uri(&uri), &alice).to_request();
    let updated: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.title, "renamed");
    assert!(!updated.is_active);
    assert_eq!(updated.list, created.todo.list);
    assert!(updated.updated_at >= created.todo.updated_at);
}

#[actix_rt::test]
async fn test_delete_requires_ownership() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;
    let bob = register(&app, "b@x.com", "secret2").await;

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .set_json(json!({ "title": "keep me" }))
        .to_request();
    let created: TaskCreatedResponse = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/todos/{}", created.todo.id);

    let req = authorized(test::TestRequest::delete().uri(&uri), &bob).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unauthorized delete" }));

    let req = authorized(test::TestRequest::get().uri(&uri), &alice).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = authorized(test::TestRequest::delete().uri(&uri), &alice).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(body, MessageResponse::new("Todo deleted successfully"));

    let req = authorized(test::TestRequest::get().uri(&uri), &alice).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unable to fetch todo" }));
}

#[actix_rt::test]
async fn test_task_routes_require_a_valid_token() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;

    let requests = vec![
        test::TestRequest::get().uri("/todos"),
        test::TestRequest::post()
            .uri("/todos")
            .set_json(json!({ "title": "t" })),
        test::TestRequest::get().uri("/todos/1"),
        test::TestRequest::put()
            .uri("/todos/1")
            .set_json(json!({ "title": "t" })),
        test::TestRequest::delete().uri("/todos/1"),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Unauthorized access" }));
    }

    // The header carries the raw token; a scheme prefix is not stripped.
    let req = authorized(
        test::TestRequest::get().uri("/todos"),
        &format!("Bearer {}", alice),
    )
    .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let mut tampered = alice.clone();
    tampered.push('x');
    let req = authorized(test::TestRequest::get().uri("/todos"), &tampered).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn test_bad_task_input() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;
    let parse_failed = json!({ "message": "Unable to parse request data" });

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"title\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, parse_failed);

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .set_json(json!({ "title": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, parse_failed);

    let bad_ids = vec![
        test::TestRequest::get().uri("/todos/abc"),
        test::TestRequest::put()
            .uri("/todos/abc")
            .set_json(json!({ "title": "t" })),
        test::TestRequest::delete().uri("/todos/abc"),
    ];
    for req in bad_ids {
        let resp = test::call_service(&app, authorized(req, &alice).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Unable to parse todo id" }));
    }

    let req = authorized(test::TestRequest::put().uri("/todos/12345"), &alice)
        .set_json(json!({ "title": "ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unable to fetch todo to update" }));

    let req = authorized(test::TestRequest::delete().uri("/todos/12345"), &alice).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unable to fetch todo to delete" }));
}

#[actix_rt::test]
async fn test_storage_failures_are_generic() {
    let state = broken_task_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let alice = register(&app, "a@x.com", "secret1").await;

    let req = authorized(test::TestRequest::post().uri("/todos"), &alice)
        .set_json(json!({ "title": "t" }))
        .to_request();
    let created: TaskCreatedResponse = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/todos/{}", created.todo.id);

    let failures = vec![
        (test::TestRequest::get().uri("/todos"), "Unable to fetch todos"),
        (
            test::TestRequest::put()
                .uri(&uri)
                .set_json(json!({ "title": "renamed" })),
            "Unable to update todo",
        ),
        (
            test::TestRequest::delete().uri(&uri),
            "Unable to delete the todo",
        ),
    ];
    for (req, message) in failures {
        let resp = test::call_service(&app, authorized(req, &alice).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(!text.contains(BACKEND_CAUSE), "cause leaked: {}", text);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "message": message }));
    }

    // Lookups still work, so the task is reachable and untouched.
    let req = authorized(test::TestRequest::get().uri(&uri), &alice).to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task, created.todo);
}

#[actix_rt::test]
async fn test_token_for_missing_account_cannot_create() {
    let state = test_state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let ghost = state.codec().issue("ghost@x.com", 404).unwrap();

    let req = authorized(test::TestRequest::post().uri("/todos"), &ghost)
        .set_json(json!({ "title": "t" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unable to create todo" }));
}
