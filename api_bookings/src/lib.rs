use actix_web::web;

pub mod lifecycle;
pub mod pricing;
pub mod routes {
    pub mod booking;
}
pub mod services {
    pub mod booking;
}
pub mod dtos {
    pub mod booking;
}

pub fn mount_bookings() -> actix_web::Scope {
    web::scope("/booking")
        .service(routes::booking::get_bookings)
        .service(routes::booking::get_booking)
        .service(routes::booking::post_booking)
        .service(routes::booking::post_booking_action)
}
