//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate function. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don’t block execution.

use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use dealership_engine::{
    db_types::{NewOrder, NewUserRecord, OrderStatusType, Role},
    fallback_vehicles,
    roles::RolePriorityTable,
    traits::{OrderManagement, UserManagement, VehicleCatalog},
    CatalogApi,
    OrderApi,
    UserApi,
};
use discord_tools::{DiscordApi, WebhookEmbed};
use dps_common::Dollars;
use log::*;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        JsonResponse,
        LoginRequest,
        LoginResponse,
        NewOrderRequest,
        NotificationRequest,
        SubmitOrderResponse,
        UpdateOrderStatusRequest,
        UpdateOrderStatusResponse,
        UserSummary,
        VerifyResponse,
        ORDER_COUNTDOWN_SECS,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
            impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal requires [$($roles:expr),*]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
            impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),*]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $bound:ty) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bound:ty where requires [$($roles:expr),*]) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),*]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(login => Post "/auth" impl UserManagement);
/// Route handler for the login endpoint.
///
/// The storefront posts the OAuth2 authorization code it received from Discord's redirect. The
/// handler walks the login pipeline:
/// code → access token → identity → required-guild check → best-effort role lookup → credential.
///
/// Only the role lookup is allowed to fail: it uses the bot credential, which can be unavailable
/// independently of the user's own token, so a failure there degrades the login to the default
/// role instead of aborting it.
pub async fn login<A>(
    body: web::Json<LoginRequest>,
    discord: web::Data<DiscordApi>,
    users: web::Data<UserApi<A>>,
    signer: web::Data<TokenIssuer>,
    role_table: web::Data<RolePriorityTable>,
) -> Result<HttpResponse, ServerError>
where
    A: UserManagement,
{
    trace!("💻️ Received login request");
    let code = body.into_inner().code;
    if code.is_empty() {
        return Err(ServerError::InvalidRequestBody("No authorization code".to_string()));
    }
    let access_token = discord.exchange_code(&code).await.map_err(|e| {
        debug!("💻️ Code exchange failed. {e}");
        ServerError::CodeExchangeFailed(e.to_string())
    })?;
    let identity = discord.fetch_identity(&access_token).await.map_err(|e| {
        debug!("💻️ Identity fetch failed. {e}");
        ServerError::IdentityFetchFailed(e.to_string())
    })?;
    let guilds = discord.fetch_guilds(&access_token).await.map_err(|e| {
        debug!("💻️ Guild list fetch failed. {e}");
        ServerError::UpstreamFailure(e.to_string())
    })?;
    let guild_id = discord.config().guild_id.as_str();
    let guild_name = match guilds.iter().find(|g| g.id == guild_id) {
        Some(guild) => guild.name.clone(),
        None => {
            debug!("💻️ {} is not a member of the required guild", identity.username);
            return Err(ServerError::NotGuildMember { invite_link: discord.config().invite_link.clone() });
        },
    };
    // The privileged lookup is best-effort. The bot token lives on a separate credential to the
    // user's own, so its failure degrades the role instead of failing the login.
    let role = match discord.fetch_member_roles(guild_id, &identity.id).await {
        Ok(memberships) => role_table.resolve(&memberships),
        Err(e) => {
            warn!("💻️ Could not fetch member roles, using default. {e}");
            Role::Customer
        },
    };
    let record = NewUserRecord {
        discord_id: identity.id.clone(),
        username: identity.username.clone(),
        avatar: identity.avatar.clone(),
        global_name: identity.global_name.clone(),
        discriminator: identity.discriminator.clone(),
    };
    if let Err(e) = users.upsert_user(record).await {
        warn!("💻️ Could not refresh the user record for {}. {e}", identity.id);
    }
    let token = signer.issue(&identity.id, &identity.username, role)?;
    info!("💻️ Login successful for {} with role '{role}'", identity.username);
    let response = LoginResponse { token, user: UserSummary::from(&identity), role, guild: guild_name };
    Ok(HttpResponse::Ok().json(response))
}

route!(verify_auth => Get "/verify-auth" requires []);
/// Route handler for the credential check endpoint.
///
/// The ACL middleware has already validated the signature and expiry of the bearer credential by
/// the time this handler runs, so all that is left is to echo the claims back.
pub async fn verify_auth(claims: JwtClaims) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET verify-auth for {}", claims.sub);
    let response =
        VerifyResponse { user_id: claims.sub, username: claims.username, role: claims.role, valid: true };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Vehicles  ----------------------------------------------------
route!(vehicles => Get "/vehicles" impl VehicleCatalog);
/// Route handler for the public vehicle catalogue.
///
/// This endpoint never answers 5xx: if the datastore is unreachable the static fallback list is
/// served instead, so the storefront can always render a showroom.
pub async fn vehicles<A: VehicleCatalog>(api: web::Data<CatalogApi<A>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET vehicles");
    let vehicles = match api.active_vehicles().await {
        Ok(vehicles) => vehicles,
        Err(e) => {
            warn!("💻️ Could not fetch vehicles from the catalogue, serving the fallback list. {e}");
            fallback_vehicles()
        },
    };
    Ok(HttpResponse::Ok().json(vehicles))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(submit_order => Post "/submit-order" impl OrderManagement where requires []);
/// Route handler for order submission. Any authenticated role may submit an order; the order is
/// keyed to the identity in the caller's credential, never to anything in the request body.
pub async fn submit_order<A: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST submit-order for {}", claims.sub);
    let request = body.into_inner();
    let order = NewOrder {
        discord_id: claims.sub,
        customer_name: claims.username,
        vehicle_id: request.vehicle_id,
        vehicle_name: request.vehicle_name,
        price: Dollars::from(request.price),
        primary_color: request.primary_color,
        secondary_color: request.secondary_color,
        pearl_color: request.pearl_color,
        special_requests: request.special_requests,
        payment_method: request.payment_method,
    };
    let order = api.submit_order(order).await?;
    let response = SubmitOrderResponse {
        message: "Order submitted successfully".to_string(),
        order_id: order.id,
        countdown: ORDER_COUNTDOWN_SECS,
    };
    Ok(HttpResponse::Ok().json(response))
}

route!(purchase_history => Get "/purchase-history" impl OrderManagement where requires []);
/// Route handler for the caller's own order history, newest first. The identity is taken from the
/// credential; there is no way to read another customer's history through this endpoint.
pub async fn purchase_history<A: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET purchase-history for {}", claims.sub);
    let orders = api.orders_for_customer(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(admin_orders => Get "/admin-orders" impl OrderManagement where requires [Role::Owner, Role::Manager]);
/// Route handler for the admin order board: every order in the book, newest first, joined with
/// the profile summary of the customer that placed it.
pub async fn admin_orders<A: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET admin-orders for {}", claims.sub);
    let orders = api.all_orders_with_owners().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(update_order_status => Post "/update-order-status" impl OrderManagement where requires [Role::Owner, Role::Manager]);
/// Route handler for driving the order-status state machine.
///
/// The status string is validated against the enumeration before anything is looked up, and the
/// transition itself is validated by the order API before anything is written.
pub async fn update_order_status<A: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<UpdateOrderStatusRequest>,
    api: web::Data<OrderApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST update-order-status for order {} by {}", request.order_id, claims.sub);
    let status = OrderStatusType::from_str(&request.status).map_err(|e| ServerError::InvalidStatus(e.to_string()))?;
    let order = api.update_status(request.order_id, status, &claims.sub).await?;
    let response = UpdateOrderStatusResponse { message: "Order status updated".to_string(), order };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Notify  ----------------------------------------------------
route!(discord_notify => Post "/discord-notify");
/// Route handler for outbound webhook notifications.
///
/// Delivery is best-effort: an unconfigured webhook or a failed POST is reported as a 200 with an
/// explanatory message, never as an error. Only an unknown notification type is a client error
/// (rejected at deserialization).
pub async fn discord_notify(
    body: web::Json<NotificationRequest>,
    discord: web::Data<DiscordApi>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received notification request");
    let embed = match body.into_inner() {
        NotificationRequest::NewOrder { user, vehicle, price, colors } => {
            let price = Dollars::from(price).to_string();
            WebhookEmbed::new_order(&user, &vehicle, &price, &colors.primary, &colors.secondary)
        },
        NotificationRequest::OrderUpdate { order_id, status } => WebhookEmbed::order_update(&order_id, &status),
    };
    let message = match discord.send_webhook(embed).await {
        Ok(()) => "Notification sent",
        Err(discord_tools::DiscordApiError::WebhookNotConfigured) => {
            warn!("💻️ Discord webhook URL not configured");
            "Webhook not configured"
        },
        Err(e) => {
            warn!("💻️ Webhook delivery failed. {e}");
            "Notification could not be delivered"
        },
    };
    Ok(HttpResponse::Ok().json(JsonResponse::success(message)))
}
