use std::{rc::Rc, time::Instant};

use actix_web::{
    Error,
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{Method, StatusCode},
};
use colored::{ColoredString, Colorize};
use common::jwt::get_jwt_claims_or_error;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::info;

/// Writes one line per request: status, method, path, latency and caller.
///
/// Bodies are never logged, they carry passwords and one-time codes.
pub struct LoggerMiddleware {
    console_logging_enabled: bool,
}

impl LoggerMiddleware {
    pub fn new(console_logging_enabled: bool) -> Self {
        Self {
            console_logging_enabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
            console_logging_enabled: self.console_logging_enabled,
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
    console_logging_enabled: bool,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_string();
        let query_string = req.query_string().to_string();
        let account_id = get_jwt_claims_or_error(&req).ok().map(|c| c.account_id);
        let console_logging_enabled = self.console_logging_enabled;
        let srv = Rc::clone(&self.service);
        let started = Instant::now();

        Box::pin(async move {
            let res = srv.call(req).await?;

            if console_logging_enabled {
                let elapsed_ms = started.elapsed().as_millis();
                let target = if query_string.is_empty() {
                    path
                } else {
                    format!("{}?{}", path, query_string)
                };
                info!(
                    "[{}] {} {} {} account_id={}",
                    colored_status(res.status()),
                    colored_method(&method),
                    target.bright_white(),
                    format!("({}ms)", elapsed_ms).bright_black(),
                    account_id
                        .map_or("None".to_string(), |id| id.to_string())
                        .bright_blue(),
                );
            }

            Ok(res.map_into_boxed_body())
        })
    }
}

fn colored_status(status: StatusCode) -> ColoredString {
    let code = status.as_u16().to_string();
    match status.as_u16() {
        200..=299 => code.green(),
        300..=399 => code.yellow(),
        400..=499 => code.bright_red(),
        _ => code.red(),
    }
}

fn colored_method(method: &Method) -> ColoredString {
    let name = method.as_str();
    match *method {
        Method::GET => name.blue(),
        Method::POST => name.yellow(),
        Method::PUT | Method::PATCH => name.purple(),
        Method::DELETE => name.red(),
        _ => name.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn passes_responses_through_untouched() {
        let app = test::init_service(
            App::new()
                .wrap(LoggerMiddleware::new(true))
                .route("/ping", web::get().to(|| async { HttpResponse::Created().body("pong") })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/ping?x=1").to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(test::read_body(res).await, "pong");
    }

    #[::core::prelude::v1::test]
    fn status_colors_follow_the_class() {
        colored::control::set_override(true);
        assert_eq!(colored_status(StatusCode::OK), "200".green());
        assert_eq!(colored_status(StatusCode::NOT_FOUND), "404".bright_red());
        assert_eq!(colored_status(StatusCode::INTERNAL_SERVER_ERROR), "500".red());
    }
}
