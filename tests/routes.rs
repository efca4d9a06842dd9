mod common;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, create_category_action, create_course_action, create_lesson_action,
    create_user_action, setup_server, setup_test_db,
};

#[tokio::test]
async fn user_crud_flow() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            create_user_action("Ada Lovelace", "ada@example.com", "student")
                .assert_body(|body| {
                    assert_eq!(body["label"], "Ada Lovelace");
                    assert_eq!(body["role"], "student");
                })
                .with_save_as("ada"),
        )
        .step(
            Action::new("get_user", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("ada")))
                .assert_body(|body| assert_eq!(body["email"], "ada@example.com")),
        )
        .step(
            Action::new("rename_user", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("ada")))
                .with_body(json!({
                    "name": "Ada King",
                    "email": "ada@example.com",
                    "role": "student",
                }))
                .assert_body(|body| assert_eq!(body["label"], "Ada King")),
        )
        .step(
            Action::new("delete_user", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("ada"))),
        )
        .step(
            Action::new("get_deleted_user", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("ada")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("Ada", "ada@example.com", "student"))
        .step(
            create_user_action("Impostor", "ada@example.com", "instructor")
                .with_expect(StatusCode::CONFLICT),
        )
        .step(
            create_user_action("Nobody", "not an email", "student")
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(
            Action::new("count_users", "GET", "/api/v1/users/page")
                .with_param("limit", "10")
                .with_param("offset", "0")
                .assert_body(|body| assert_eq!(body["total"], 1)),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn roles_are_checked_on_references() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("Grace", "grace@example.com", "instructor").with_save_as("grace"))
        .step(create_user_action("Ada", "ada@example.com", "student").with_save_as("ada"))
        .step(
            create_course_action("Taught by a student", "ada", None)
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(create_course_action("Rust 101", "grace", None).with_save_as("rust"))
        .step(
            Action::new("instructor_enrolls", "POST", "/api/v1/enrollments")
                .with_dyn_body(|ctx| {
                    json!({ "student_id": ctx.id("grace"), "course_id": ctx.id("rust") })
                })
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(
            Action::new("student_enrolls", "POST", "/api/v1/enrollments")
                .with_dyn_body(|ctx| {
                    json!({ "student_id": ctx.id("ada"), "course_id": ctx.id("rust") })
                })
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| {
                    assert_eq!(body["label"], "Ada - Rust 101");
                    assert!(body["enrolled_at"].is_string());
                }),
        )
        .step(
            Action::new("demote_owner", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("grace")))
                .with_body(json!({
                    "name": "Grace",
                    "email": "grace@example.com",
                    "role": "student",
                }))
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(
            Action::new("instructor_choices", "GET", "/api/v1/users/choices")
                .with_param("role", "instructor")
                .assert_body(|body| {
                    let labels: Vec<_> = body
                        .as_array()
                        .unwrap()
                        .iter()
                        .map(|u| u["label"].as_str().unwrap().to_string())
                        .collect();
                    assert_eq!(labels, vec!["Grace"]);
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn course_delete_cascades_and_category_delete_detaches() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("Grace", "grace@example.com", "instructor").with_save_as("grace"))
        .step(create_category_action("Programming").with_save_as("programming"))
        .step(
            create_course_action("Rust 101", "grace", Some("programming"))
                .assert_body(|body| assert_eq!(body["label"], "Rust 101"))
                .with_save_as("rust"),
        )
        .step(create_course_action("Go 101", "grace", Some("programming")).with_save_as("go"))
        .step(create_lesson_action("Ownership", "rust").with_save_as("ownership"))
        .step(create_lesson_action("Borrowing", "rust"))
        .step(create_lesson_action("Goroutines", "go"))
        .step(
            Action::new("rust_lessons", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id("rust")))
                .assert_body(|body| assert_eq!(body.as_array().unwrap().len(), 2)),
        )
        .step(
            Action::new("delete_category", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}", ctx.id("programming"))),
        )
        .step(
            Action::new("go_without_category", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id("go")))
                .assert_body(|body| assert!(body["category_id"].is_null())),
        )
        .step(
            Action::new("delete_course", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id("rust"))),
        )
        .step(
            Action::new("lesson_gone", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id("ownership")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("remaining_lessons", "GET", "/api/v1/lessons/page")
                .with_param("limit", "10")
                .with_param("offset", "0")
                .assert_body(|body| {
                    assert_eq!(body["total"], 1);
                    assert_eq!(body["items"][0]["label"], "Goroutines");
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn lesson_video_url_is_validated() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("Grace", "grace@example.com", "instructor").with_save_as("grace"))
        .step(create_course_action("Rust 101", "grace", None).with_save_as("rust"))
        .step(
            Action::new("bad_video_url", "POST", "/api/v1/lessons")
                .with_dyn_body(|ctx| {
                    json!({
                        "course_id": ctx.id("rust"),
                        "title": "Intro",
                        "video_url": "not a url",
                    })
                })
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(
            Action::new("unknown_course", "POST", "/api/v1/lessons")
                .with_body(json!({
                    "course_id": uuid::Uuid::new_v4(),
                    "title": "Intro",
                    "video_url": "https://videos.example.com/intro",
                }))
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn progress_flow() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("Grace", "grace@example.com", "instructor").with_save_as("grace"))
        .step(create_user_action("Ada", "ada@example.com", "student").with_save_as("ada"))
        .step(create_course_action("Rust 101", "grace", None).with_save_as("rust"))
        .step(create_lesson_action("Intro", "rust").with_save_as("intro"))
        .step(
            Action::new("start_progress", "POST", "/api/v1/progress")
                .with_dyn_body(|ctx| {
                    json!({ "student_id": ctx.id("ada"), "lesson_id": ctx.id("intro") })
                })
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| {
                    assert_eq!(body["status"], "not_started");
                    assert_eq!(body["label"], "Ada - Intro: not started");
                })
                .with_save_as("progress"),
        )
        .step(
            Action::new("duplicate_progress", "POST", "/api/v1/progress")
                .with_dyn_body(|ctx| {
                    json!({
                        "student_id": ctx.id("ada"),
                        "lesson_id": ctx.id("intro"),
                        "status": "completed",
                    })
                })
                .with_expect(StatusCode::CONFLICT),
        )
        .step(
            Action::new("instructor_progress", "POST", "/api/v1/progress")
                .with_dyn_body(|ctx| {
                    json!({ "student_id": ctx.id("grace"), "lesson_id": ctx.id("intro") })
                })
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(
            Action::new("complete_progress", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/progress/{}", ctx.id("progress")))
                .with_dyn_body(|ctx| {
                    json!({
                        "student_id": ctx.id("ada"),
                        "lesson_id": ctx.id("intro"),
                        "status": "completed",
                    })
                })
                .assert_body(|body| assert_eq!(body["label"], "Ada - Intro: completed")),
        )
        .step(
            Action::new("bad_status", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/progress/{}", ctx.id("progress")))
                .with_dyn_body(|ctx| {
                    json!({
                        "student_id": ctx.id("ada"),
                        "lesson_id": ctx.id("intro"),
                        "status": "abandoned",
                    })
                })
                .with_expect(StatusCode::UNPROCESSABLE_ENTITY),
        )
        .step(
            Action::new("delete_lesson", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id("intro"))),
        )
        .step(
            Action::new("progress_gone", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/progress/{}", ctx.id("progress")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn pagination_is_bounded() {
    let Some(db) = setup_test_db().await else { return };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("limit_zero", "GET", "/api/v1/courses/page")
                .with_param("limit", "0")
                .with_param("offset", "0")
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("limit_too_large", "GET", "/api/v1/enrollments/page")
                .with_param("limit", "1000")
                .with_param("offset", "0")
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("empty_page", "GET", "/api/v1/progress/page")
                .with_param("limit", "5")
                .with_param("offset", "0")
                .assert_body(|body| {
                    assert_eq!(body["total"], 0);
                    assert_eq!(body["limit"], 5);
                }),
        )
        .run(&mut server, db)
        .await;
}
