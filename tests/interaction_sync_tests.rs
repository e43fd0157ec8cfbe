use curio_sync::models::interaction::InteractionKind;
use curio_sync::sync::NoticeLevel;
use curio_sync::{AuthUser, ClientState, Config, Session};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        ..Config::default()
    }
}

fn state_for(server: &MockServer) -> ClientState {
    ClientState::new(test_config(&server.uri())).unwrap()
}

fn sign_in(state: &ClientState) {
    state
        .session
        .login(Session {
            token: "test-token".to_string(),
            user: AuthUser {
                id: 1,
                username: "ada".to_string(),
                display_name: None,
                avatar_url: None,
            },
        })
        .unwrap();
}

fn server_error() -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_json(json!({
        "success": false,
        "error": { "code": "INTERNAL_ERROR", "message": "Internal server error" }
    }))
}

#[tokio::test]
async fn load_populates_all_flags_and_tolerates_failed_checks() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);

    Mock::given(method("GET"))
        .and(path("/articles/7/like-status"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isLiked": true })))
        .mount(&server)
        .await;
    // Bookmark check fails; its flag must default to false without
    // failing the whole load.
    Mock::given(method("GET"))
        .and(path("/bookmarks/check/7"))
        .respond_with(server_error())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reading-list/check/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inReadingList": false })))
        .mount(&server)
        .await;

    let flags = state.interactions.load(7).await;
    assert!(flags.liked);
    assert!(!flags.bookmarked);
    assert!(!flags.in_reading_list);

    // Every kind is defined after load, never undefined.
    assert!(state.interactions.get(7, InteractionKind::Like));
    assert!(!state.interactions.get(7, InteractionKind::Bookmark));
    assert!(!state.interactions.get(7, InteractionKind::ReadingList));
}

#[tokio::test]
async fn uninitialized_reads_default_to_false() {
    let server = MockServer::start().await;
    let state = state_for(&server);

    assert!(!state.interactions.get(999, InteractionKind::Like));
    assert!(!state.interactions.get(999, InteractionKind::Bookmark));
}

#[tokio::test]
async fn anonymous_load_issues_no_requests() {
    let server = MockServer::start().await;
    let state = state_for(&server);

    let flags = state.interactions.load(7).await;
    assert!(!flags.liked && !flags.bookmarked && !flags.in_reading_list);
    assert!(!state.interactions.get(7, InteractionKind::Like));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_like_commits_and_reconciles_with_server() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);
    state.interactions.prime_like_count(7, 10);

    Mock::given(method("POST"))
        .and(path("/articles/7/like"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "isLiked": true, "likeCount": 11 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let liked = state.interactions.toggle_like(7).await.unwrap();
    assert!(liked);
    assert!(state.interactions.get(7, InteractionKind::Like));
    assert_eq!(state.interactions.like_count(7), Some(11));

    let notices = state.notices.drain();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Success));
}

#[tokio::test]
async fn failed_toggle_rolls_back_flag_and_counter() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);
    state.interactions.prime_like_count(7, 3);

    Mock::given(method("POST"))
        .and(path("/articles/7/like"))
        .respond_with(server_error())
        .mount(&server)
        .await;

    let result = state.interactions.toggle_like(7).await;
    assert!(result.is_err());

    // The optimistic flip and the counter adjustment are both reverted.
    assert!(!state.interactions.get(7, InteractionKind::Like));
    assert_eq!(state.interactions.like_count(7), Some(3));

    let notices = state.notices.drain();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Error));
}

#[tokio::test]
async fn failed_bookmark_toggle_rolls_back_flag() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);

    Mock::given(method("POST"))
        .and(path("/bookmarks"))
        .respond_with(server_error())
        .mount(&server)
        .await;

    assert!(state.interactions.toggle_bookmark(7).await.is_err());
    assert!(!state.interactions.get(7, InteractionKind::Bookmark));
}

#[tokio::test]
async fn double_toggle_restores_original_state() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);

    Mock::given(method("POST"))
        .and(path("/bookmarks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/bookmarks/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(state.interactions.toggle_bookmark(7).await.unwrap());
    assert!(state.interactions.get(7, InteractionKind::Bookmark));

    assert!(!state.interactions.toggle_bookmark(7).await.unwrap());
    assert!(!state.interactions.get(7, InteractionKind::Bookmark));
}

#[tokio::test]
async fn double_like_toggle_restores_counter() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);
    state.interactions.prime_like_count(7, 5);

    Mock::given(method("POST"))
        .and(path("/articles/7/like"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "isLiked": true, "likeCount": 6 })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    assert!(state.interactions.toggle_like(7).await.unwrap());
    assert_eq!(state.interactions.like_count(7), Some(6));

    Mock::given(method("POST"))
        .and(path("/articles/7/like"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "isLiked": false, "likeCount": 5 })),
        )
        .mount(&server)
        .await;

    assert!(!state.interactions.toggle_like(7).await.unwrap());
    assert!(!state.interactions.get(7, InteractionKind::Like));
    assert_eq!(state.interactions.like_count(7), Some(5));
}

#[tokio::test]
async fn overlapping_toggle_on_same_pair_is_rejected() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);

    Mock::given(method("POST"))
        .and(path("/articles/7/like"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "isLiked": true, "likeCount": 1 }))
                .set_delay(std::time::Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Both futures poll on the same task; the first claims the
    // (entity, kind) pair, the second fails fast while it resolves.
    let (first, second) = tokio::join!(
        state.interactions.toggle_like(7),
        state.interactions.toggle_like(7),
    );

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(curio_sync::AppError::MutationInFlight(_))
    ));

    // The pair is released once the first mutation resolved.
    assert!(!state.interactions.is_requesting(7, InteractionKind::Like));
}

#[tokio::test]
async fn unauthenticated_toggle_short_circuits_without_request() {
    let server = MockServer::start().await;
    let state = state_for(&server);

    let result = state.interactions.toggle_bookmark(7).await;
    assert!(matches!(
        result,
        Err(curio_sync::AppError::AuthenticationRequired(_))
    ));

    assert!(server.received_requests().await.unwrap().is_empty());

    let notices = state.notices.drain();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Error));
}

#[tokio::test]
async fn follow_toggle_round_trip() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);

    Mock::given(method("GET"))
        .and(path("/users/42/follow-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isFollowing": true })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/42/follow"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(state.interactions.load_follow(42).await);
    assert!(state.interactions.get(42, InteractionKind::Follow));

    assert!(!state.interactions.toggle_follow(42).await.unwrap());
    assert!(!state.interactions.get(42, InteractionKind::Follow));
}

#[tokio::test]
async fn clear_resets_cached_flags() {
    let server = MockServer::start().await;
    let state = state_for(&server);
    sign_in(&state);
    state.interactions.prime_like_count(7, 4);

    Mock::given(method("GET"))
        .and(path("/articles/7/like-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isLiked": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bookmarks/check/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isBookmarked": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reading-list/check/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inReadingList": true })))
        .mount(&server)
        .await;

    state.interactions.load(7).await;
    assert!(state.interactions.get(7, InteractionKind::Like));

    state.interactions.clear();
    assert!(!state.interactions.get(7, InteractionKind::Like));
    assert_eq!(state.interactions.like_count(7), None);
}
