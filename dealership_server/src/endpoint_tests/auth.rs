use actix_web::{
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
    HttpResponse,
    HttpServer,
};
use chrono::{Duration, Utc};
use dealership_engine::{
    db_types::{NewUserRecord, Role, UserRecord},
    roles::RolePriorityTable,
    UserApi,
};
use discord_tools::{DiscordApi, DiscordConfig};
use dps_common::Secret;
use serde_json::{json, Value};

use super::{
    helpers::{call_capture, into_status_and_body, issuer, test_auth_config, TEST_IDENTITY, TEST_USERNAME},
    mocks::MockUserStore,
};
use crate::{
    auth::TokenIssuer,
    config::AuthConfig,
    routes::{LoginRoute, VerifyAuthRoute},
    server::json_config,
};

const GUILD_ID: &str = "guild-1";
const OWNER_ROLE: &str = "role-owner";
const MANAGER_ROLE: &str = "role-manager";
const CUSTOMER_ROLE: &str = "role-customer";

//----------------------------------------------   Login  ----------------------------------------------------

/// A stand-in for the Discord API, driven by a tiny behaviour table.
#[derive(Clone)]
struct StubDiscord {
    accept_code: bool,
    in_guild: bool,
    /// `None` makes the privileged member lookup answer 500.
    member_roles: Option<Vec<&'static str>>,
}

async fn spawn_stub(stub: StubDiscord) -> String {
    let data = web::Data::new(stub);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/oauth2/token", web::post().to(token_endpoint))
            .route("/users/@me", web::get().to(identity_endpoint))
            .route("/users/@me/guilds", web::get().to(guilds_endpoint))
            .route("/guilds/{guild}/members/{user}", web::get().to(member_endpoint))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("Could not bind the stub Discord server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

async fn token_endpoint(stub: web::Data<StubDiscord>) -> HttpResponse {
    if stub.accept_code {
        HttpResponse::Ok().json(json!({"access_token": "stub-access-token", "token_type": "Bearer"}))
    } else {
        HttpResponse::Ok().json(json!({"error": "invalid_grant", "error_description": "Invalid code in request."}))
    }
}

async fn identity_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "id": TEST_IDENTITY,
        "username": TEST_USERNAME,
        "avatar": "a1b2c3",
        "discriminator": "0",
        "global_name": "Lester C"
    }))
}

async fn guilds_endpoint(stub: web::Data<StubDiscord>) -> HttpResponse {
    if stub.in_guild {
        HttpResponse::Ok().json(json!([{"id": GUILD_ID, "name": "GTA V Dealership"}]))
    } else {
        HttpResponse::Ok().json(json!([{"id": "someone-elses-guild", "name": "Elsewhere"}]))
    }
}

async fn member_endpoint(stub: web::Data<StubDiscord>) -> HttpResponse {
    match &stub.member_roles {
        Some(roles) => HttpResponse::Ok().json(json!({"roles": roles})),
        None => HttpResponse::InternalServerError().finish(),
    }
}

fn discord_config(api_base: String) -> DiscordConfig {
    DiscordConfig {
        api_base,
        client_id: "client-1".to_string(),
        client_secret: Secret::new("client-secret".to_string()),
        redirect_uri: "http://localhost/callback".to_string(),
        guild_id: GUILD_ID.to_string(),
        bot_token: Secret::new("bot-token".to_string()),
        invite_link: "https://discord.gg/dealership".to_string(),
        webhook_url: None,
    }
}

fn stored_user(user: NewUserRecord) -> UserRecord {
    let now = Utc::now();
    UserRecord {
        discord_id: user.discord_id,
        username: user.username,
        avatar: user.avatar,
        global_name: user.global_name,
        discriminator: user.discriminator,
        created_at: now,
        updated_at: now,
    }
}

async fn post_login(api_base: String, code: &str) -> (StatusCode, String) {
    let mut users = MockUserStore::new();
    users.expect_upsert_user().returning(|u| Ok(stored_user(u)));
    let discord = DiscordApi::new(discord_config(api_base)).unwrap();
    let role_table = RolePriorityTable::new(OWNER_ROLE, MANAGER_ROLE, CUSTOMER_ROLE);
    let app = App::new()
        .app_data(json_config())
        .app_data(web::Data::new(discord))
        .app_data(web::Data::new(UserApi::new(users)))
        .app_data(web::Data::new(issuer()))
        .app_data(web::Data::new(role_table))
        .service(LoginRoute::<MockUserStore>::new());
    let app = test::init_service(app).await;
    let req = TestRequest::post().uri("/auth").set_json(json!({ "code": code })).to_request();
    let res = test::call_service(&app, req).await;
    into_status_and_body(res)
}

#[actix_web::test]
async fn login_without_code_is_a_bad_request() {
    // No Discord call is made, so the base URL is never dereferenced.
    let (status, body) = post_login("http://127.0.0.1:9".to_string(), "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No authorization code"), "was: {body}");
}

#[actix_web::test]
async fn failed_code_exchange_issues_no_credential() {
    let base = spawn_stub(StubDiscord { accept_code: false, in_guild: true, member_roles: Some(vec![]) }).await;
    let (status, body) = post_login(base, "bad-code").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Discord auth failed"), "was: {body}");
    assert!(!body.contains("token"), "was: {body}");
}

#[actix_web::test]
async fn login_outside_the_required_guild_is_forbidden() {
    let base = spawn_stub(StubDiscord { accept_code: true, in_guild: false, member_roles: Some(vec![]) }).await;
    let (status, body) = post_login(base, "abc").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Join our Discord server first"), "was: {body}");
    assert!(body.contains("https://discord.gg/dealership"), "was: {body}");
}

#[actix_web::test]
async fn empty_membership_set_logs_in_as_guest() {
    let base = spawn_stub(StubDiscord { accept_code: true, in_guild: true, member_roles: Some(vec![]) }).await;
    let (status, body) = post_login(base, "abc").await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["role"], "guest");
    assert_eq!(response["user"]["id"], TEST_IDENTITY);
    assert_eq!(response["guild"], "GTA V Dealership");
    // The issued credential carries the same identity and role.
    let claims = issuer().verify(response["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, TEST_IDENTITY);
    assert_eq!(claims.role, Role::Guest);
}

#[actix_web::test]
async fn failed_member_lookup_still_logs_in_with_the_default_role() {
    let base = spawn_stub(StubDiscord { accept_code: true, in_guild: true, member_roles: None }).await;
    let (status, body) = post_login(base, "abc").await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["role"], "customer");
}

#[actix_web::test]
async fn owner_wins_when_several_configured_roles_match() {
    let base = spawn_stub(StubDiscord {
        accept_code: true,
        in_guild: true,
        member_roles: Some(vec![CUSTOMER_ROLE, MANAGER_ROLE, OWNER_ROLE]),
    })
    .await;
    let (status, body) = post_login(base, "abc").await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["role"], "owner");
}

//----------------------------------------------   Verify  ----------------------------------------------------

async fn get_verify(auth_header: Option<String>) -> (StatusCode, String) {
    let app = App::new().app_data(web::Data::new(issuer())).service(VerifyAuthRoute::new());
    let app = test::init_service(app).await;
    let mut req = TestRequest::get().uri("/verify-auth");
    if let Some(header) = auth_header {
        req = req.insert_header(("Authorization", header));
    }
    call_capture(&app, req.to_request()).await
}

#[actix_web::test]
async fn verify_without_a_token_is_unauthorized() {
    let (status, body) = get_verify(None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No token provided"), "was: {body}");
}

#[actix_web::test]
async fn verify_echoes_the_claims() {
    let token = issuer().issue(TEST_IDENTITY, TEST_USERNAME, Role::Manager).unwrap();
    let (status, body) = get_verify(Some(format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["user_id"], TEST_IDENTITY);
    assert_eq!(response["role"], "manager");
    assert_eq!(response["valid"], true);
}

#[actix_web::test]
async fn verify_rejects_an_expired_token() {
    let expired_issuer = TokenIssuer::new(&AuthConfig {
        token_lifetime: Duration::hours(-2),
        ..test_auth_config()
    });
    let token = expired_issuer.issue(TEST_IDENTITY, TEST_USERNAME, Role::Owner).unwrap();
    let (status, body) = get_verify(Some(format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Token has expired"), "was: {body}");
}

#[actix_web::test]
async fn verify_rejects_garbage() {
    let (status, body) = get_verify(Some("Bearer made-up-nonsense".to_string())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid token"), "was: {body}");
}
