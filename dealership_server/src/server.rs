use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dealership_engine::{CatalogApi, OrderApi, SqliteDatabase, UserApi};
use discord_tools::DiscordApi;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        AdminOrdersRoute,
        DiscordNotifyRoute,
        LoginRoute,
        PurchaseHistoryRoute,
        SubmitOrderRoute,
        UpdateOrderStatusRoute,
        VehiclesRoute,
        VerifyAuthRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
) -> Result<actix_web::dev::Server, ServerError> {
    let discord = DiscordApi::new(config.discord.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let users_api = UserApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dps::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(users_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(discord.clone()))
            .app_data(web::Data::new(config.roles.clone()))
            .service(health)
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(VerifyAuthRoute::new())
            .service(VehiclesRoute::<SqliteDatabase>::new())
            .service(SubmitOrderRoute::<SqliteDatabase>::new())
            .service(PurchaseHistoryRoute::<SqliteDatabase>::new())
            .service(AdminOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(DiscordNotifyRoute::new())
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Every error answer carries a JSON `{"error": ...}` body, including payload-deserialization
/// failures that would otherwise surface as actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}
