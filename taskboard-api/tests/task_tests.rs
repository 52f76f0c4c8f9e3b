/// Integration tests for tasks and comments
///
/// - The admin → project → task → assignee status update flow
/// - Update permissions: admin full, assignee status-only, everyone else 403
/// - References are resolved before anything is written
/// - Comments list oldest first and carry author names

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::{json, Value};
use taskboard_shared::db::store::Store;
use uuid::Uuid;

fn task_uri(task: &Value) -> String {
    format!("/task/{}", task["id"].as_str().unwrap())
}

#[tokio::test]
async fn test_end_to_end_assignee_flow() {
    let ctx = TestContext::new();

    // Admin registers through the API
    let registered = ctx
        .send(
            axum::http::Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "fullname": "Admin Person",
                "email": "admin@example.com",
                "password": "secret123",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let admin_token = registered.body["token"].as_str().unwrap().to_string();

    // U registers, then logs in
    let registered = ctx
        .send(
            axum::http::Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "fullname": "User Person",
                "email": "u@example.com",
                "password": "secret123"
            })),
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let u_token = registered.body["token"].as_str().unwrap().to_string();
    let u_id = ctx.get("/auth/me", &u_token).await.body["id"].clone();

    let project = ctx
        .post(
            "/projects",
            &admin_token,
            json!({ "title": "Launch", "description": "Ship v1" }),
        )
        .await;
    assert_eq!(project.status, StatusCode::CREATED);
    let project_id = project.body["project"]["id"].clone();

    let task = ctx
        .post(
            "/task",
            &admin_token,
            json!({
                "title": "Write spec",
                "description": "First draft",
                "assignedTo": u_id,
                "projectId": project_id,
                "priority": "High"
            }),
        )
        .await;
    assert_eq!(task.status, StatusCode::CREATED, "{}", task.body);
    assert_eq!(task.body["task"]["status"], "Pending");
    assert_eq!(task.body["task"]["priority"], "High");
    let uri = task_uri(&task.body["task"]);

    let login = ctx
        .send(
            axum::http::Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "u@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::CREATED);
    let u_token = login.body["token"].as_str().unwrap().to_string();

    let moved = ctx
        .patch(&uri, &u_token, json!({ "status": "In Progress" }))
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);
    assert_eq!(moved.body["task"]["status"], "In Progress");

    let reprioritized = ctx.patch(&uri, &u_token, json!({ "priority": "Low" })).await;
    assert_eq!(reprioritized.status, StatusCode::BAD_REQUEST);

    let current = ctx.get(&uri, &u_token).await;
    assert_eq!(current.body["status"], "In Progress");
    assert_eq!(current.body["priority"], "High");
}

#[tokio::test]
async fn test_non_assignee_update_forbidden_regardless_of_payload() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;
    let other = ctx.member("Other Person").await;

    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &assignee, "Write spec", "High").await;
    let uri = task_uri(&task);

    let payloads = [
        json!({ "status": "Done" }),
        json!({ "priority": "Low" }),
        json!({ "nonsense": true }),
        json!({}),
        json!("not an object"),
    ];

    for payload in payloads {
        let response = ctx.patch(&uri, &other.token, payload.clone()).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", payload);
    }

    let unchanged = ctx.get(&uri, &admin.token).await;
    assert_eq!(unchanged.body["status"], "Pending");
}

#[tokio::test]
async fn test_assignee_restricted_to_status() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;

    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &assignee, "Write spec", "High").await;
    let uri = task_uri(&task);

    let response = ctx
        .patch(
            &uri,
            &assignee.token,
            json!({ "status": "Done", "title": "Renamed", "assignedTo": assignee.id() }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");
    let fields: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "assignedTo"]);

    let missing_status = ctx.patch(&uri, &assignee.token, json!({})).await;
    assert_eq!(missing_status.status, StatusCode::BAD_REQUEST);

    let unchanged = ctx.get(&uri, &admin.token).await;
    assert_eq!(unchanged.body["title"], "Write spec");
    assert_eq!(unchanged.body["status"], "Pending");

    // Any status transition is allowed
    for status in ["Done", "Pending", "In Progress", "Done"] {
        let response = ctx.patch(&uri, &assignee.token, json!({ "status": status })).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["task"]["status"], status);
    }
}

#[tokio::test]
async fn test_admin_updates_every_field() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let first = ctx.member("First Person").await;
    let second = ctx.member("Second Person").await;

    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &first, "Write spec", "High").await;
    let uri = task_uri(&task);

    let response = ctx
        .patch(
            &uri,
            &admin.token,
            json!({
                "title": "Write the spec",
                "description": "Second draft",
                "assignedTo": second.id(),
                "priority": "Low"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let updated = &response.body["task"];
    assert_eq!(updated["title"], "Write the spec");
    assert_eq!(updated["description"], "Second draft");
    assert_eq!(updated["assignedTo"], json!(second.id().to_string()));
    assert_eq!(updated["priority"], "Low");
    assert_eq!(updated["status"], "Pending");
    assert_eq!(updated["projectId"], json!(project));

    // Reassignment moves the status permission
    let old = ctx.patch(&uri, &first.token, json!({ "status": "Done" })).await;
    assert_eq!(old.status, StatusCode::FORBIDDEN);
    let new = ctx.patch(&uri, &second.token, json!({ "status": "Done" })).await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_rejections() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;

    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &assignee, "Write spec", "High").await;
    let uri = task_uri(&task);

    let empty = ctx.patch(&uri, &admin.token, json!({})).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let unknown_field = ctx
        .patch(&uri, &admin.token, json!({ "status": "Done", "owner": "me" }))
        .await;
    assert_eq!(unknown_field.status, StatusCode::BAD_REQUEST);

    let bad_status = ctx.patch(&uri, &admin.token, json!({ "status": "Blocked" })).await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);

    let missing_assignee = ctx
        .patch(&uri, &admin.token, json!({ "assignedTo": Uuid::new_v4() }))
        .await;
    assert_eq!(missing_assignee.status, StatusCode::NOT_FOUND);

    let missing_task = ctx
        .patch(
            &format!("/task/{}", Uuid::new_v4()),
            &admin.token,
            json!({ "status": "Done" }),
        )
        .await;
    assert_eq!(missing_task.status, StatusCode::NOT_FOUND);

    let bad_id = ctx.patch("/task/123", &admin.token, json!({ "status": "Done" })).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    let unchanged = ctx.get(&uri, &admin.token).await;
    assert_eq!(unchanged.body["assignedTo"], json!(assignee.id().to_string()));
    assert_eq!(unchanged.body["status"], "Pending");
}

#[tokio::test]
async fn test_create_task_unresolved_references_store_nothing() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;
    let project = ctx.create_project(&admin, "Launch").await;

    let unknown_assignee = ctx
        .post(
            "/task",
            &admin.token,
            json!({
                "title": "Write spec",
                "description": "First draft",
                "assignedTo": Uuid::new_v4(),
                "projectId": project,
            }),
        )
        .await;
    assert_eq!(unknown_assignee.status, StatusCode::NOT_FOUND);

    let unknown_project = ctx
        .post(
            "/task",
            &admin.token,
            json!({
                "title": "Write spec",
                "description": "First draft",
                "assignedTo": assignee.id(),
                "projectId": Uuid::new_v4(),
            }),
        )
        .await;
    assert_eq!(unknown_project.status, StatusCode::NOT_FOUND);

    assert_eq!(ctx.store.count_tasks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_task_validation_and_defaults() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;
    let project = ctx.create_project(&admin, "Launch").await;

    let invalid = ctx
        .post(
            "/task",
            &admin.token,
            json!({
                "title": "",
                "description": "First draft",
                "assignedTo": "not-an-id",
                "projectId": project,
            }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let member_attempt = ctx
        .post(
            "/task",
            &assignee.token,
            json!({
                "title": "Write spec",
                "description": "First draft",
                "assignedTo": assignee.id(),
                "projectId": project,
            }),
        )
        .await;
    assert_eq!(member_attempt.status, StatusCode::FORBIDDEN);

    let created = ctx
        .post(
            "/task",
            &admin.token,
            json!({
                "title": "Write spec",
                "description": "First draft",
                "assignedTo": assignee.id(),
                "projectId": project,
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["task"]["priority"], "Medium");
    assert_eq!(created.body["task"]["status"], "Pending");

    assert_eq!(ctx.store.count_tasks().await.unwrap(), 1);
}

#[tokio::test]
async fn test_member_create_task_forbidden_before_body_checks() {
    let ctx = TestContext::new();
    let member = ctx.member("Regular User").await;

    let response = ctx.post("/task", &member.token, json!({ "title": "x" })).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "forbidden");
}

#[tokio::test]
async fn test_task_title_length_limit() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;
    let project = ctx.create_project(&admin, "Launch").await;

    let body = |title: String| {
        json!({
            "title": title,
            "description": "First draft",
            "assignedTo": assignee.id(),
            "projectId": project,
        })
    };

    let too_long = ctx.post("/task", &admin.token, body("t".repeat(256))).await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_long.body["error"], "validation_error");
    assert_eq!(too_long.body["details"][0]["field"], "title");
    assert_eq!(ctx.store.count_tasks().await.unwrap(), 0);

    let longest = ctx.post("/task", &admin.token, body("t".repeat(255))).await;
    assert_eq!(longest.status, StatusCode::CREATED);

    let uri = task_uri(&longest.body["task"]);
    let update = ctx
        .patch(&uri, &admin.token, json!({ "title": "u".repeat(256) }))
        .await;
    assert_eq!(update.status, StatusCode::BAD_REQUEST);
    assert_eq!(update.body["error"], "validation_error");
    assert_eq!(update.body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_list_and_get_tasks() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let member = ctx.member("Regular User").await;
    let project = ctx.create_project(&admin, "Launch").await;

    let first = ctx.create_task(&admin, &project, &admin, "First", "Low").await;
    ctx.create_task(&admin, &project, &admin, "Second", "Low").await;

    let listed = ctx.get("/task", &member.token).await;
    assert_eq!(listed.status, StatusCode::OK);
    let titles: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);

    let fetched = ctx.get(&task_uri(&first), &member.token).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "First");

    let missing = ctx
        .get(&format!("/task/{}", Uuid::new_v4()), &member.token)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_round_trip_oldest_first() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;
    let bystander = ctx.member("Bystander Person").await;

    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &assignee, "Write spec", "High").await;
    let uri = task_uri(&task);

    let first = ctx
        .post(&format!("{}/comment", uri), &assignee.token, json!({ "comment": "Started" }))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["comment"]["comment"], "Started");

    let second = ctx
        .post(
            &format!("{}/comment", uri),
            &bystander.token,
            json!({ "comment": "Any update?" }),
        )
        .await;
    assert_eq!(second.status, StatusCode::CREATED);
    let new_id = second.body["comment"]["id"].clone();

    let listed = ctx.get(&format!("{}/comments", uri), &admin.token).await;
    assert_eq!(listed.status, StatusCode::OK);
    let comments = listed.body.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["comment"], "Started");
    assert_eq!(comments[0]["authorName"], "Assignee Person");
    assert_eq!(comments[1]["id"], new_id);
    assert_eq!(comments[1]["authorName"], "Bystander Person");
    assert_eq!(
        comments[1]["commentedBy"],
        json!(bystander.id().to_string())
    );
}

#[tokio::test]
async fn test_comment_rejections() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &admin, "Write spec", "High").await;
    let uri = task_uri(&task);

    let blank = ctx
        .post(&format!("{}/comment", uri), &admin.token, json!({ "comment": "   " }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let missing_task = format!("/task/{}", Uuid::new_v4());
    let on_missing = ctx
        .post(
            &format!("{}/comment", missing_task),
            &admin.token,
            json!({ "comment": "Hello" }),
        )
        .await;
    assert_eq!(on_missing.status, StatusCode::NOT_FOUND);

    let list_missing = ctx
        .get(&format!("{}/comments", missing_task), &admin.token)
        .await;
    assert_eq!(list_missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task_admin_only_and_cascades() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let assignee = ctx.member("Assignee Person").await;

    let project = ctx.create_project(&admin, "Launch").await;
    let task = ctx.create_task(&admin, &project, &assignee, "Write spec", "High").await;
    let uri = task_uri(&task);
    let task_id: Uuid = task["id"].as_str().unwrap().parse().unwrap();

    ctx.post(&format!("{}/comment", uri), &assignee.token, json!({ "comment": "Started" }))
        .await;

    let denied = ctx.delete(&uri, &assignee.token).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let deleted = ctx.delete(&uri, &admin.token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Task deleted successfully.");

    assert_eq!(ctx.get(&uri, &admin.token).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.delete(&uri, &admin.token).await.status, StatusCode::NOT_FOUND);
    assert!(ctx.store.list_task_comments(task_id).await.unwrap().is_empty());
}
