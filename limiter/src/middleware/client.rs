use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::error::AppError;
use governor::{
    DefaultKeyedRateLimiter, Quota, RateLimiter, clock::Clock, middleware::NoOpMiddleware,
    state::keyed::DefaultKeyedStateStore,
};
use std::{future::Future, net::IpAddr, num::NonZeroU32, pin::Pin, rc::Rc, sync::Arc};

type ClientLimiter = DefaultKeyedRateLimiter<String>;

/// Tracked clients above which idle entries are dropped.
const PRUNE_ABOVE: usize = 10_000;

/// Per-client quota keyed by the caller's address.
///
/// The key is the socket peer. `X-Forwarded-For` is only read when the peer is
/// one of `trusted_proxies`. Built once and cloned into every worker, so all
/// workers share the counters.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<ClientLimiter>,
    trusted_proxies: Arc<Vec<IpAddr>>,
}

impl ClientRateLimiter {
    pub fn new(permits_per_minute: u32, trusted_proxies: Vec<IpAddr>) -> Self {
        let permits = NonZeroU32::new(permits_per_minute).unwrap_or_else(|| {
            log::warn!("Client rate limit of 0 requested, allowing 1 request per minute");
            NonZeroU32::MIN
        });
        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(permits))),
            trusted_proxies: Arc::new(trusted_proxies),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ClientRateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ClientRateLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(ClientRateLimiterService {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
            trusted_proxies: Arc::clone(&self.trusted_proxies),
        }))
    }
}

pub struct ClientRateLimiterService<S> {
    service: Rc<S>,
    limiter: Arc<ClientLimiter>,
    trusted_proxies: Arc<Vec<IpAddr>>,
}

impl<S, B> Service<ServiceRequest> for ClientRateLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let limiter = Arc::clone(&self.limiter);
        let client = client_key(&req, &self.trusted_proxies);

        Box::pin(async move {
            if !admit(&limiter, client.clone(), PRUNE_ABOVE) {
                log::warn!("Client {} exceeded the auth rate limit", client);
                return Ok(req.error_response(AppError::TooManyRequests(
                    "Too many attempts. Please try again later.".to_string(),
                )));
            }
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

/// Address the quota is charged to.
fn client_key(req: &ServiceRequest, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = req.peer_addr().map(|addr| addr.ip()) else {
        return "unknown".to_string();
    };
    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    // proxies append on the right; the nearest untrusted hop is the client
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|chain| {
            chain
                .rsplit(',')
                .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
                .find(|hop| !trusted_proxies.contains(hop))
        })
        .unwrap_or(peer)
        .to_string()
}

/// Counts one request for `client`. Once more than `prune_above` clients are
/// tracked, those whose quota has fully replenished are dropped.
fn admit<C: Clock>(
    limiter: &RateLimiter<String, DefaultKeyedStateStore<String>, C, NoOpMiddleware<C::Instant>>,
    client: String,
    prune_above: usize,
) -> bool {
    let allowed = limiter.check_key(&client).is_ok();
    if limiter.len() > prune_above {
        limiter.retain_recent();
        limiter.shrink_to_fit();
        log::debug!("Pruned client limiter to {} entries", limiter.len());
    }
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};
    use governor::clock::FakeRelativeClock;
    use std::{net::SocketAddr, time::Duration};

    fn peer(ip: &str) -> SocketAddr {
        SocketAddr::new(ip.parse().unwrap(), 40_000)
    }

    #[actix_web::test]
    async fn forwarded_header_from_untrusted_peer_is_ignored() {
        let app = test::init_service(
            App::new()
                .wrap(ClientRateLimiter::new(1, Vec::new()))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let mut accepted = 0;
        for i in 0..20 {
            let req = test::TestRequest::post()
                .uri("/")
                .peer_addr(peer("203.0.113.7"))
                .insert_header(("X-Forwarded-For", format!("10.9.9.{}", i)))
                .to_request();
            if test::call_service(&app, req).await.status() == StatusCode::OK {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }

    #[actix_web::test]
    async fn counts_each_peer_separately() {
        let app = test::init_service(
            App::new()
                .wrap(ClientRateLimiter::new(1, Vec::new()))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let from = |ip: &str| test::TestRequest::post().uri("/").peer_addr(peer(ip)).to_request();

        assert_eq!(test::call_service(&app, from("10.0.0.1")).await.status(), StatusCode::OK);
        assert_eq!(
            test::call_service(&app, from("10.0.0.1")).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(test::call_service(&app, from("10.0.0.2")).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn trusted_proxy_forwards_the_nearest_client_hop() {
        let proxy: IpAddr = "10.0.0.254".parse().unwrap();
        let app = test::init_service(
            App::new()
                .wrap(ClientRateLimiter::new(1, vec![proxy]))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let via_proxy = |chain: &str| {
            test::TestRequest::post()
                .uri("/")
                .peer_addr(SocketAddr::new(proxy, 443))
                .insert_header(("X-Forwarded-For", chain.to_string()))
                .to_request()
        };

        assert_eq!(
            test::call_service(&app, via_proxy("198.51.100.1")).await.status(),
            StatusCode::OK
        );
        // a forged left-hand entry does not change the charged client
        assert_eq!(
            test::call_service(&app, via_proxy("6.6.6.6, 198.51.100.1")).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            test::call_service(&app, via_proxy("198.51.100.2")).await.status(),
            StatusCode::OK
        );
    }

    #[::core::prelude::v1::test]
    fn pruning_drops_idle_clients_and_keeps_limited_ones() {
        let clock = FakeRelativeClock::default();
        let limiter: RateLimiter<_, _, _, NoOpMiddleware<_>> = RateLimiter::new(
            Quota::per_minute(NonZeroU32::MIN),
            DefaultKeyedStateStore::<String>::default(),
            clock.clone(),
        );

        assert!(admit(&limiter, "10.0.0.1".to_string(), 2));
        assert!(admit(&limiter, "10.0.0.2".to_string(), 2));
        assert_eq!(limiter.len(), 2);

        clock.advance(Duration::from_secs(61));
        assert!(admit(&limiter, "10.0.0.3".to_string(), 2));
        assert_eq!(limiter.len(), 1);

        assert!(!admit(&limiter, "10.0.0.3".to_string(), 2));
    }
}
