use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::AUTHORIZATION,
};
use futures::future::{Ready, ok};

use common::{
    env_config::JwtConfig,
    error::Res,
    jwt::{self, JwtClaims},
};

pub struct ExtractionMiddleware {
    jwt_config: Arc<JwtConfig>,
}

impl ExtractionMiddleware {
    pub fn new(jwt_config: JwtConfig) -> Self {
        Self {
            jwt_config: Arc::new(jwt_config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExtractionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ExtractionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractionMiddlewareService {
            service: Rc::new(service),
            jwt_config: Arc::clone(&self.jwt_config),
        })
    }
}

pub struct ExtractionMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: Arc<JwtConfig>,
}

impl<S, B> Service<ServiceRequest> for ExtractionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = bearer_token(&req);
        let jwt_config = Arc::clone(&self.jwt_config);
        let srv = Rc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = token {
                // the outcome is stored even on failure, secured scopes answer with it
                let claims_res = jwt::validate_jwt(&token, &jwt_config.secret);
                if let Err(e) = &claims_res {
                    log::debug!("Rejected bearer token: {}", e);
                }
                req.extensions_mut().insert::<Res<JwtClaims>>(claims_res);
            }
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use common::{jwt::ClaimsSpec, misc::AccountKind};
    use uuid::Uuid;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "extractor-test-secret".to_string(),
            expiration_hours: 1,
        }
    }

    async fn probe(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<Res<JwtClaims>>() {
            Some(Ok(claims)) => HttpResponse::Ok().body(claims.account_id.to_string()),
            Some(Err(_)) => HttpResponse::Ok().body("invalid"),
            None => HttpResponse::Ok().body("absent"),
        }
    }

    #[actix_web::test]
    async fn stores_claims_for_valid_token() {
        let account_id = Uuid::new_v4();
        let token = jwt::generate_jwt(
            ClaimsSpec {
                account_id,
                kind: AccountKind::Customer,
                is_admin: false,
            },
            &config(),
        )
        .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new(config()))
                .route("/", web::get().to(probe)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, account_id.to_string());
    }

    #[actix_web::test]
    async fn records_invalid_and_missing_tokens() {
        let app = test::init_service(
            App::new()
                .wrap(ExtractionMiddleware::new(config()))
                .route("/", web::get().to(probe)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, "Bearer garbage"))
            .to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "invalid");

        let req = test::TestRequest::get().uri("/").to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "absent");
    }
}
