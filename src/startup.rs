use crate::auth::TokenCodec;
use crate::configuration::Settings;
use crate::helpers::JsonResponse;
use crate::middleware::authentication::{AccessGate, Gate};
use crate::routes;
use actix_cors::Cors;
use actix_web::{dev::Server, error, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let codec = TokenCodec::new(settings.auth.keyring());
    let gate = AccessGate::new(codec.clone());

    let codec = web::Data::new(codec);
    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg = match &err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "Invalid JSON at line {}, column {}: {}",
                err.line(),
                err.column(),
                err
            ),
            _ => format!("Invalid request body: {}", err),
        };
        tracing::debug!("{}", msg);
        JsonResponse::<()>::build().bad_request(msg)
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .service(routes::index)
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/auth")
                    .service(routes::auth::signup)
                    .service(routes::auth::login),
            )
            .service(
                web::scope("/api")
                    .wrap(Gate::new(gate.clone()))
                    .service(routes::account::get::list)
                    .service(routes::account::get::item)
                    .service(routes::account::add::add)
                    .service(routes::account::update::item)
                    .service(routes::account::delete::item),
            )
            .service(
                web::scope("/tasks")
                    .wrap(Gate::new(gate.clone()))
                    .service(routes::task::get::list)
                    .service(routes::task::get::stats)
                    .service(routes::task::get::activity)
                    .service(routes::task::get::export)
                    .service(routes::task::get::item)
                    .service(routes::task::add::add)
                    .service(routes::task::update::item)
                    .service(routes::task::update::toggle)
                    .service(routes::task::delete::item),
            )
            .service(
                web::scope("/books")
                    .wrap(Gate::new(gate.clone()))
                    .service(routes::book::get::list)
                    .service(routes::book::get::item)
                    .service(routes::book::add::add)
                    .service(routes::book::update::item)
                    .service(routes::book::delete::item),
            )
            .default_service(web::to(routes::not_found))
            .app_data(json_config.clone())
            .app_data(pg_pool.clone())
            .app_data(codec.clone())
            .app_data(settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
