use std::net::IpAddr;

use middleware::{client::ClientRateLimiter, global::GlobalLimiter};

pub mod middleware {
    pub mod client;
    pub mod global;
}

pub fn global_middleware(permits_per_second: u32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_second)
}

/// Per-client limiter; forwarded addresses are honoured only from `trusted_proxies`.
pub fn client_middleware(permits_per_minute: u32, trusted_proxies: Vec<IpAddr>) -> ClientRateLimiter {
    ClientRateLimiter::new(permits_per_minute, trusted_proxies)
}
