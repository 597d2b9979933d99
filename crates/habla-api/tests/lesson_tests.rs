use crate::common::{TestClient, TestStateBuilder, TestUser};
use axum::http::StatusCode;
use habla_api::lesson::{
    LessonSummary, LessonView,
    model::{BASICS_LESSON_ID, GREETINGS_LESSON_ID},
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_list_lessons_in_order() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let user = TestUser::student();

    let response = client.get_with_auth("/lessons", &user.token).await;
    response.assert_status(StatusCode::OK);

    let lessons: Vec<LessonSummary> = response.json();
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].id, GREETINGS_LESSON_ID);
    assert_eq!(lessons[1].id, BASICS_LESSON_ID);
    assert_eq!(lessons[0].question_count, 4);
}

#[tokio::test]
async fn test_get_lesson_hides_answers() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let user = TestUser::student();

    let response = client
        .get_with_auth(&format!("/lessons/{GREETINGS_LESSON_ID}"), &user.token)
        .await;
    response.assert_status(StatusCode::OK);
    assert!(!response.text().contains("adiós"));

    let lesson: LessonView = response.json();
    assert_eq!(lesson.title, "Greetings");
    assert_eq!(lesson.questions[1].question, "Goodbye");
    assert_eq!(lesson.questions[1].answer_count, 2);
}

#[tokio::test]
async fn test_get_unknown_lesson() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let user = TestUser::student();

    let response = client
        .get_with_auth(&format!("/lessons/{}", Uuid::new_v4()), &user.token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Lesson not found");
}

#[tokio::test]
async fn test_admin_creates_lesson() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let admin = TestUser::admin();

    let body = json!({
        "title": " Colors ",
        "description": "Basic colors",
        "questions": [
            { "question": "Red", "answers": ["rojo", "  "] },
            { "question": "Green", "answers": [" verde "], "audio": "audio/verde.mp3" }
        ]
    });
    let response = client
        .post_json_with_auth("/admin/lessons", &body, &admin.token)
        .await;
    response.assert_status(StatusCode::CREATED);

    let lesson: LessonView = response.json();
    assert_eq!(lesson.title, "Colors");
    assert_eq!(lesson.order_index, 3);
    assert_eq!(lesson.questions[0].answer_count, 1);
    assert_eq!(lesson.questions[1].order_index, 2);
    assert_eq!(lesson.questions[1].audio.as_deref(), Some("audio/verde.mp3"));

    let lessons: Vec<LessonSummary> = client.get_with_auth("/lessons", &admin.token).await.json();
    assert_eq!(lessons.last().unwrap().id, lesson.id);
}

#[tokio::test]
async fn test_admin_lesson_validation() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let admin = TestUser::admin();

    let body = json!({
        "title": "Colors",
        "description": "Basic colors",
        "questions": [{ "question": "Red", "answers": ["", " "] }]
    });
    let response = client
        .post_json_with_auth("/admin/lessons", &body, &admin.token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.error().starts_with("Question 1:"));

    let body = json!({ "title": "", "description": "Basic colors", "questions": [] });
    let response = client
        .post_json_with_auth("/admin/lessons", &body, &admin.token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
