use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use gamehub_auth::{Hs256JwtValidator, JwtClaims, Role};
use gamehub_core::{
    BackupId, CommunityId, ConnectionId, GameId, ModId, OrganizationId, RecommendationId, ReportId,
    RestoreJobId, ServiceError, StreamId, SubscriptionId, UserId,
};
use gamehub_services::analytics::{Report, ReportStatus};
use gamehub_services::backup::{Backup, BackupStatus};
use gamehub_services::community::Community;
use gamehub_services::integration::{Platform, PlatformConnection};
use gamehub_services::organization::{Organization, OrganizationPlan};
use gamehub_services::revenue::{Subscription, SubscriptionStatus, SubscriptionTier};
use gamehub_services::streaming::{Stream, StreamStatus};
use gamehub_services::{
    MockBackupRecoveryService, MockBusinessIntelligenceService, MockCommunityService,
    MockCrossPlatformIntegrationService, MockEnterpriseAdminService, MockGameOptimizationService,
    MockRevenueService, MockStreamingService, Page,
};

use super::errors::ErrorPolicy;
use super::services::AppServices;
use super::build_router;

const SECRET: &str = "unit-test-secret";

fn app(services: AppServices) -> Router {
    build_router(services, Arc::new(Hs256JwtValidator::new(SECRET)))
}

fn with_community(mock: MockCommunityService) -> Router {
    app(AppServices::in_memory(ErrorPolicy::Legacy).with_community(mock))
}

fn mint(sub: Option<String>, roles: &[Role]) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub,
        roles: roles.to_vec(),
        iss: None,
        issued_at: now,
        expires_at: now + Duration::minutes(10),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn user_token(user: UserId) -> String {
    mint(Some(user.to_string()), &[])
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, headers, body)
}

fn community(owner: UserId) -> Community {
    let now = Utc::now();
    Community {
        id: CommunityId::new(),
        slug: "speedrunners".into(),
        name: "Speedrunners".into(),
        description: None,
        game_id: None,
        owner_id: owner,
        member_count: 1,
        created_at: now,
        updated_at: now,
    }
}

fn create_body() -> Value {
    json!({ "name": "Speedrunners", "slug": "speedrunners" })
}

#[tokio::test]
async fn health_is_public() {
    let router = app(AppServices::in_memory(ErrorPolicy::Legacy));
    let (status, _, _) = send(router, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_401_and_service_is_never_called() {
    let mut mock = MockCommunityService::new();
    mock.expect_my_communities().times(0);
    mock.expect_create_community().times(0);
    let app = with_community(mock);

    let (status, _, body) = send(
        app.clone(),
        request(Method::GET, "/api/community/mine", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());

    let (status, _, _) = send(
        app,
        request(Method::POST, "/api/community", Some("not-a-jwt"), Some(create_body())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unusable_subject_is_401_before_the_service_call() {
    let mut mock = MockCommunityService::new();
    mock.expect_create_community().times(0);
    let app = with_community(mock);

    for token in [mint(Some("player-one".into()), &[]), mint(None, &[])] {
        let (status, _, body) = send(
            app.clone(),
            request(Method::POST, "/api/community", Some(&token), Some(create_body())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn not_found_is_404_with_empty_body() {
    let mut mock = MockCommunityService::new();
    mock.expect_get_community()
        .times(1)
        .returning(|_| Err(ServiceError::NotFound));

    let uri = format!("/api/community/{}", CommunityId::new());
    let (status, _, body) = send(with_community(mock), request(Method::GET, &uri, None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn forbidden_is_403() {
    let user = UserId::new();
    let mut mock = MockCommunityService::new();
    mock.expect_update_community()
        .times(1)
        .returning(|_, _, _| Err(ServiceError::Forbidden));

    let uri = format!("/api/community/{}", CommunityId::new());
    let (status, _, body) = send(
        with_community(mock),
        request(
            Method::PUT,
            &uri,
            Some(&user_token(user)),
            Some(json!({ "name": "Renamed" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());
}

#[tokio::test]
async fn invalid_state_is_400_with_message() {
    let user = UserId::new();
    let mut mock = MockCommunityService::new();
    mock.expect_join_community()
        .times(1)
        .returning(|_, _| Err(ServiceError::invalid_state("already a member of this community")));

    let uri = format!("/api/community/{}/join", CommunityId::new());
    let (status, _, body) = send(
        with_community(mock),
        request(Method::POST, &uri, Some(&user_token(user)), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "already a member of this community" }));
}

#[tokio::test]
async fn unexpected_failure_follows_error_policy() {
    for (policy, expected_status, expected_message) in [
        (ErrorPolicy::Legacy, StatusCode::BAD_REQUEST, "storage offline"),
        (ErrorPolicy::Strict, StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
    ] {
        let mut mock = MockCommunityService::new();
        mock.expect_trending_communities()
            .times(1)
            .returning(|_| Err(ServiceError::unexpected("storage offline")));
        let router = app(AppServices::in_memory(policy).with_community(mock));

        let (status, _, body) = send(
            router,
            request(Method::GET, "/api/community/trending", None, None),
        )
        .await;

        assert_eq!(status, expected_status);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], expected_message);
    }
}

#[tokio::test]
async fn create_returns_201_with_location() {
    let user = UserId::new();
    let created = community(user);
    let expected_location = format!("/api/community/{}", created.id);

    let mut mock = MockCommunityService::new();
    let returned = created.clone();
    mock.expect_create_community()
        .withf(move |caller, req| *caller == user && req.slug == "speedrunners")
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));

    let (status, headers, body) = send(
        with_community(mock),
        request(
            Method::POST,
            "/api/community",
            Some(&user_token(user)),
            Some(create_body()),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], expected_location.as_str());
    let body: Community = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, created);
}

#[tokio::test]
async fn delete_returns_204_with_no_body() {
    let user = UserId::new();
    let community_id = CommunityId::new();
    let mut mock = MockCommunityService::new();
    mock.expect_delete_community()
        .withf(move |caller, id| *caller == user && *id == community_id)
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, _, body) = send(
        with_community(mock),
        request(
            Method::DELETE,
            &format!("/api/community/{community_id}"),
            Some(&user_token(user)),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn invalid_body_is_400_and_service_is_not_called() {
    let mut mock = MockCommunityService::new();
    mock.expect_create_community().times(0);

    let (status, _, body) = send(
        with_community(mock),
        request(
            Method::POST,
            "/api/community",
            Some(&user_token(UserId::new())),
            Some(json!({ "name": "Speedrunners", "slug": "Not A Slug" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["message"].as_str().unwrap().contains("slug"));
}

#[tokio::test]
async fn malformed_path_id_is_400() {
    let mut mock = MockCommunityService::new();
    mock.expect_get_community().times(0);

    let (status, _, body) = send(
        with_community(mock),
        request(Method::GET, "/api/community/not-a-uuid", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn out_of_range_filter_is_400() {
    let mut mock = MockCommunityService::new();
    mock.expect_search_communities().times(0);

    let (status, _, _) = send(
        with_community(mock),
        request(Method::GET, "/api/community/search?page_size=500", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn anonymous_endpoints_need_no_token() {
    let mut mock = MockCommunityService::new();
    mock.expect_search_communities().times(1).returning(|filter| {
        Ok(Page {
            items: vec![],
            page: filter.paging().page(),
            page_size: filter.paging().page_size(),
            total: 0,
        })
    });
    let app = with_community(mock);

    let game = GameId::new();
    for uri in [
        "/api/community/search?query=speed".to_string(),
        "/api/streaming/live".to_string(),
        "/api/streaming/popular?limit=5".to_string(),
        "/api/analytics/stats/public".to_string(),
        format!("/api/integrations/games/{game}/platforms"),
        format!("/api/optimization/games/{game}/presets"),
    ] {
        let (status, _, _) = send(app.clone(), request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
    }
}

#[tokio::test]
async fn anonymous_lookup_ignores_a_bad_token() {
    let mut mock = MockCommunityService::new();
    mock.expect_get_community()
        .times(1)
        .returning(|_| Err(ServiceError::NotFound));

    let uri = format!("/api/community/{}", CommunityId::new());
    let (status, _, _) = send(
        with_community(mock),
        request(Method::GET, &uri, Some("garbage"), None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn financial_report_requires_finance_role() {
    let router = app(AppServices::in_memory(ErrorPolicy::Legacy));
    let user = UserId::new();
    let uri = "/api/revenue/reports/platform";

    let (status, _, _) = send(router.clone(), request(Method::GET, uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(
        router.clone(),
        request(Method::GET, uri, Some(&user_token(user)), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());

    for role in [Role::FINANCE, Role::ADMIN] {
        let token = mint(Some(user.to_string()), &[role]);
        let (status, _, _) = send(router.clone(), request(Method::GET, uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn admin_endpoints_reject_other_roles() {
    let router = app(AppServices::in_memory(ErrorPolicy::Legacy));
    let finance = mint(Some(UserId::new().to_string()), &[Role::FINANCE]);

    let (status, _, _) = send(
        router.clone(),
        request(Method::GET, "/api/analytics/platform/kpis", Some(&finance), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = mint(Some(UserId::new().to_string()), &[Role::ADMIN]);
    let (status, _, _) = send(
        router,
        request(Method::GET, "/api/analytics/platform/kpis", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn whoami_reports_caller_and_roles() {
    let router = app(AppServices::in_memory(ErrorPolicy::Legacy));
    let user = UserId::new();
    let token = mint(Some(user.to_string()), &[Role::new("moderator")]);

    let (status, _, body) = send(router, request(Method::GET, "/api/whoami", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["user_id"], user.to_string());
    assert_eq!(body["roles"], json!(["moderator"]));
}

fn services() -> AppServices {
    AppServices::in_memory(ErrorPolicy::Legacy)
}

/// Every listed endpoint must answer 401 with an empty body when no token is sent.
async fn assert_caller_required(router: Router, endpoints: &[(Method, String)]) {
    for (method, uri) in endpoints {
        let (status, _, body) = send(router.clone(), request(method.clone(), uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert!(body.is_empty(), "{method} {uri}");
    }
}

async fn assert_not_found(router: Router, req: Request<Body>) {
    let (status, _, body) = send(router, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn integrations_status_mapping() {
    let user = UserId::new();
    let connection = PlatformConnection {
        id: ConnectionId::new(),
        user_id: user,
        platform: Platform::Steam,
        external_account_id: "steam-76561198".into(),
        connected_at: Utc::now(),
        last_synced_at: None,
    };
    let connection_id = connection.id;

    let mut mock = MockCrossPlatformIntegrationService::new();
    let returned = connection.clone();
    mock.expect_connect_platform()
        .withf(move |caller, req| *caller == user && req.platform == Platform::Steam)
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    mock.expect_disconnect_platform()
        .withf(move |caller, id| *caller == user && *id == connection_id)
        .times(1)
        .returning(|_, _| Ok(()));
    mock.expect_get_connection()
        .times(1)
        .returning(|_, _| Err(ServiceError::NotFound));
    let router = app(services().with_integrations(mock));
    let token = user_token(user);

    let (status, headers, _) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/integrations/platforms",
            Some(&token),
            Some(json!({ "platform": "steam", "external_account_id": "steam-76561198" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers[header::LOCATION],
        format!("/api/integrations/platforms/{connection_id}").as_str()
    );

    let uri = format!("/api/integrations/platforms/{connection_id}");
    let (status, _, body) = send(router.clone(), request(Method::DELETE, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let uri = format!("/api/integrations/platforms/{}", ConnectionId::new());
    assert_not_found(router, request(Method::GET, &uri, Some(&token), None)).await;
}

#[tokio::test]
async fn integrations_require_a_caller() {
    let mut mock = MockCrossPlatformIntegrationService::new();
    mock.expect_list_connections().times(0);
    mock.expect_connect_platform().times(0);
    mock.expect_get_connection().times(0);
    mock.expect_disconnect_platform().times(0);
    mock.expect_sync_mod().times(0);

    let connection = ConnectionId::new();
    assert_caller_required(
        app(services().with_integrations(mock)),
        &[
            (Method::GET, "/api/integrations/platforms".to_string()),
            (Method::POST, "/api/integrations/platforms".to_string()),
            (Method::GET, format!("/api/integrations/platforms/{connection}")),
            (Method::DELETE, format!("/api/integrations/platforms/{connection}")),
            (Method::POST, format!("/api/integrations/mods/{}/sync", ModId::new())),
        ],
    )
    .await;
}

#[tokio::test]
async fn streaming_status_mapping() {
    let user = UserId::new();
    let game = GameId::new();
    let stream = Stream {
        id: StreamId::new(),
        streamer_id: user,
        game_id: game,
        title: "Any% attempts".into(),
        status: StreamStatus::Live,
        viewer_count: 0,
        peak_viewers: 0,
        started_at: Utc::now(),
        ended_at: None,
    };
    let stream_id = stream.id;

    let mut mock = MockStreamingService::new();
    let returned = stream.clone();
    mock.expect_start_stream()
        .withf(move |caller, req| *caller == user && req.game_id == game)
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    mock.expect_end_stream()
        .times(1)
        .returning(|_, _| Err(ServiceError::invalid_state("stream has already ended")));
    mock.expect_get_stream()
        .times(1)
        .returning(|_| Err(ServiceError::NotFound));
    let router = app(services().with_streaming(mock));
    let token = user_token(user);

    let (status, headers, _) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/streaming/streams",
            Some(&token),
            Some(json!({ "game_id": game, "title": "Any% attempts" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers[header::LOCATION],
        format!("/api/streaming/streams/{stream_id}").as_str()
    );

    let uri = format!("/api/streaming/streams/{stream_id}/end");
    let (status, _, body) = send(router.clone(), request(Method::POST, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "stream has already ended" }));

    let uri = format!("/api/streaming/streams/{}", StreamId::new());
    assert_not_found(router, request(Method::GET, &uri, None, None)).await;
}

#[tokio::test]
async fn streaming_requires_a_caller() {
    let mut mock = MockStreamingService::new();
    mock.expect_start_stream().times(0);
    mock.expect_end_stream().times(0);
    mock.expect_get_settings().times(0);
    mock.expect_update_settings().times(0);

    assert_caller_required(
        app(services().with_streaming(mock)),
        &[
            (Method::POST, "/api/streaming/streams".to_string()),
            (Method::POST, format!("/api/streaming/streams/{}/end", StreamId::new())),
            (Method::GET, "/api/streaming/settings".to_string()),
            (Method::PUT, "/api/streaming/settings".to_string()),
        ],
    )
    .await;
}

#[tokio::test]
async fn revenue_status_mapping() {
    let user = UserId::new();
    let subscription = Subscription {
        id: SubscriptionId::new(),
        subscriber_id: user,
        creator_id: None,
        tier: SubscriptionTier::Premium,
        status: SubscriptionStatus::Active,
        price_cents: SubscriptionTier::Premium.price_cents(),
        currency: "USD".into(),
        started_at: Utc::now(),
        cancelled_at: None,
    };
    let subscription_id = subscription.id;

    let mut mock = MockRevenueService::new();
    let returned = subscription.clone();
    mock.expect_create_subscription()
        .withf(move |caller, req| *caller == user && req.tier == SubscriptionTier::Premium)
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    mock.expect_cancel_subscription()
        .times(1)
        .returning(|_, _| Err(ServiceError::invalid_state("subscription is already cancelled")));
    mock.expect_get_subscription()
        .times(1)
        .returning(|_, _| Err(ServiceError::NotFound));
    let router = app(services().with_revenue(mock));
    let token = user_token(user);

    let (status, headers, _) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/revenue/subscriptions",
            Some(&token),
            Some(json!({ "tier": "premium" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers[header::LOCATION],
        format!("/api/revenue/subscriptions/{subscription_id}").as_str()
    );

    let uri = format!("/api/revenue/subscriptions/{subscription_id}/cancel");
    let (status, _, body) = send(router.clone(), request(Method::POST, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "subscription is already cancelled" }));

    let uri = format!("/api/revenue/subscriptions/{}", SubscriptionId::new());
    assert_not_found(router, request(Method::GET, &uri, Some(&token), None)).await;
}

#[tokio::test]
async fn revenue_requires_a_caller() {
    let mut mock = MockRevenueService::new();
    mock.expect_list_subscriptions().times(0);
    mock.expect_create_subscription().times(0);
    mock.expect_get_subscription().times(0);
    mock.expect_cancel_subscription().times(0);
    mock.expect_earnings().times(0);
    mock.expect_request_payout().times(0);

    let subscription = SubscriptionId::new();
    assert_caller_required(
        app(services().with_revenue(mock)),
        &[
            (Method::GET, "/api/revenue/subscriptions".to_string()),
            (Method::POST, "/api/revenue/subscriptions".to_string()),
            (Method::GET, format!("/api/revenue/subscriptions/{subscription}")),
            (Method::POST, format!("/api/revenue/subscriptions/{subscription}/cancel")),
            (Method::GET, "/api/revenue/earnings".to_string()),
            (Method::POST, "/api/revenue/payouts".to_string()),
        ],
    )
    .await;
}

#[tokio::test]
async fn backups_status_mapping() {
    let user = UserId::new();
    let backup = Backup {
        id: BackupId::new(),
        owner_id: user,
        label: "before patch".into(),
        game_id: None,
        include_mods: false,
        status: BackupStatus::Completed,
        size_bytes: 4096,
        created_at: Utc::now(),
    };
    let backup_id = backup.id;

    let mut mock = MockBackupRecoveryService::new();
    let returned = backup.clone();
    mock.expect_create_backup()
        .withf(move |caller, req| *caller == user && req.label == "before patch")
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    mock.expect_delete_backup()
        .times(1)
        .returning(|_, _| Err(ServiceError::Forbidden));
    mock.expect_get_backup()
        .times(1)
        .returning(|_, _| Err(ServiceError::NotFound));
    let router = app(services().with_backups(mock));
    let token = user_token(user);

    let (status, headers, _) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/backups",
            Some(&token),
            Some(json!({ "label": "before patch" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], format!("/api/backups/{backup_id}").as_str());

    let uri = format!("/api/backups/{backup_id}");
    let (status, _, body) = send(router.clone(), request(Method::DELETE, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());

    let uri = format!("/api/backups/{}", BackupId::new());
    assert_not_found(router, request(Method::GET, &uri, Some(&token), None)).await;
}

#[tokio::test]
async fn backups_require_a_caller() {
    let mut mock = MockBackupRecoveryService::new();
    mock.expect_list_backups().times(0);
    mock.expect_create_backup().times(0);
    mock.expect_get_backup().times(0);
    mock.expect_delete_backup().times(0);
    mock.expect_restore_backup().times(0);
    mock.expect_get_restore_job().times(0);
    mock.expect_get_schedule().times(0);
    mock.expect_update_schedule().times(0);

    let backup = BackupId::new();
    assert_caller_required(
        app(services().with_backups(mock)),
        &[
            (Method::GET, "/api/backups".to_string()),
            (Method::POST, "/api/backups".to_string()),
            (Method::GET, "/api/backups/schedule".to_string()),
            (Method::PUT, "/api/backups/schedule".to_string()),
            (Method::GET, format!("/api/backups/{backup}")),
            (Method::DELETE, format!("/api/backups/{backup}")),
            (Method::POST, format!("/api/backups/{backup}/restore")),
            (Method::GET, format!("/api/backups/restores/{}", RestoreJobId::new())),
        ],
    )
    .await;
}

#[tokio::test]
async fn analytics_status_mapping() {
    let user = UserId::new();
    let report = Report {
        id: ReportId::new(),
        owner_id: user,
        name: "Weekly downloads".into(),
        metrics: vec!["downloads".into()],
        from: None,
        to: None,
        status: ReportStatus::Queued,
        created_at: Utc::now(),
    };
    let report_id = report.id;

    let mut mock = MockBusinessIntelligenceService::new();
    let returned = report.clone();
    mock.expect_create_report()
        .withf(move |caller, req| *caller == user && req.metrics == ["downloads"])
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    mock.expect_get_report()
        .times(1)
        .returning(|_, _| Err(ServiceError::NotFound));
    let router = app(services().with_analytics(mock));
    let token = user_token(user);

    let (status, headers, body) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/analytics/reports",
            Some(&token),
            Some(json!({ "name": "Weekly downloads", "metrics": ["downloads"] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers[header::LOCATION],
        format!("/api/analytics/reports/{report_id}").as_str()
    );
    let body: Report = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, report);

    let uri = format!("/api/analytics/reports/{}", ReportId::new());
    assert_not_found(router, request(Method::GET, &uri, Some(&token), None)).await;
}

#[tokio::test]
async fn analytics_require_a_caller() {
    let mut mock = MockBusinessIntelligenceService::new();
    mock.expect_creator_dashboard().times(0);
    mock.expect_mod_metrics().times(0);
    mock.expect_create_report().times(0);
    mock.expect_get_report().times(0);

    assert_caller_required(
        app(services().with_analytics(mock)),
        &[
            (Method::GET, "/api/analytics/dashboard".to_string()),
            (Method::GET, format!("/api/analytics/mods/{}/metrics", ModId::new())),
            (Method::POST, "/api/analytics/reports".to_string()),
            (Method::GET, format!("/api/analytics/reports/{}", ReportId::new())),
        ],
    )
    .await;
}

#[tokio::test]
async fn organizations_status_mapping() {
    let user = UserId::new();
    let member = UserId::new();
    let now = Utc::now();
    let organization = Organization {
        id: OrganizationId::new(),
        name: "Night Owls".into(),
        owner_id: user,
        plan: OrganizationPlan::Team,
        seat_limit: OrganizationPlan::Team.default_seats(),
        created_at: now,
        updated_at: now,
    };
    let organization_id = organization.id;

    let mut mock = MockEnterpriseAdminService::new();
    let returned = organization.clone();
    mock.expect_create_organization()
        .withf(move |caller, req| *caller == user && req.name == "Night Owls")
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    mock.expect_remove_member()
        .withf(move |caller, org, removed| {
            *caller == user && *org == organization_id && *removed == member
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    mock.expect_add_member()
        .times(1)
        .returning(|_, _, _| Err(ServiceError::Forbidden));
    mock.expect_get_organization()
        .times(1)
        .returning(|_, _| Err(ServiceError::NotFound));
    let router = app(services().with_organizations(mock));
    let token = user_token(user);

    let (status, headers, _) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/organizations",
            Some(&token),
            Some(json!({ "name": "Night Owls" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers[header::LOCATION],
        format!("/api/organizations/{organization_id}").as_str()
    );

    let uri = format!("/api/organizations/{organization_id}/members/{member}");
    let (status, _, body) = send(router.clone(), request(Method::DELETE, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let uri = format!("/api/organizations/{organization_id}/members");
    let (status, _, body) = send(
        router.clone(),
        request(Method::POST, &uri, Some(&token), Some(json!({ "user_id": member }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());

    let uri = format!("/api/organizations/{}", OrganizationId::new());
    assert_not_found(router, request(Method::GET, &uri, Some(&token), None)).await;
}

#[tokio::test]
async fn organizations_require_a_caller() {
    let mut mock = MockEnterpriseAdminService::new();
    mock.expect_create_organization().times(0);
    mock.expect_get_organization().times(0);
    mock.expect_update_organization().times(0);
    mock.expect_list_members().times(0);
    mock.expect_add_member().times(0);
    mock.expect_remove_member().times(0);
    mock.expect_audit_log().times(0);

    let org = OrganizationId::new();
    assert_caller_required(
        app(services().with_organizations(mock)),
        &[
            (Method::POST, "/api/organizations".to_string()),
            (Method::GET, format!("/api/organizations/{org}")),
            (Method::PUT, format!("/api/organizations/{org}")),
            (Method::GET, format!("/api/organizations/{org}/members")),
            (Method::POST, format!("/api/organizations/{org}/members")),
            (Method::DELETE, format!("/api/organizations/{org}/members/{}", UserId::new())),
            (Method::GET, format!("/api/organizations/{org}/audit-log")),
        ],
    )
    .await;
}

#[tokio::test]
async fn optimization_status_mapping() {
    let user = UserId::new();
    let recommendation_id = RecommendationId::new();

    let mut mock = MockGameOptimizationService::new();
    mock.expect_submit_feedback()
        .withf(move |caller, feedback| {
            *caller == user && feedback.recommendation_id == recommendation_id && feedback.rating == 4
        })
        .times(1)
        .returning(|_, _| Ok(()));
    mock.expect_apply_recommendation()
        .times(1)
        .returning(|_, _| Err(ServiceError::NotFound));
    let router = app(services().with_optimization(mock));
    let token = user_token(user);

    let (status, _, body) = send(
        router.clone(),
        request(
            Method::POST,
            "/api/optimization/feedback",
            Some(&token),
            Some(json!({ "recommendation_id": recommendation_id, "rating": 4 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let uri = format!("/api/optimization/recommendations/{}/apply", RecommendationId::new());
    assert_not_found(router, request(Method::POST, &uri, Some(&token), None)).await;
}

#[tokio::test]
async fn optimization_requires_a_caller() {
    let mut mock = MockGameOptimizationService::new();
    mock.expect_analyze_profile().times(0);
    mock.expect_list_recommendations().times(0);
    mock.expect_apply_recommendation().times(0);
    mock.expect_submit_feedback().times(0);

    assert_caller_required(
        app(services().with_optimization(mock)),
        &[
            (Method::POST, "/api/optimization/analyze".to_string()),
            (Method::GET, "/api/optimization/recommendations".to_string()),
            (
                Method::POST,
                format!("/api/optimization/recommendations/{}/apply", RecommendationId::new()),
            ),
            (Method::POST, "/api/optimization/feedback".to_string()),
        ],
    )
    .await;
}
