use actix_web::web;

pub mod routes {
    pub mod salon_service;
    pub mod service;
}
pub mod services {
    pub mod salon_service;
    pub mod service;
}
pub mod dtos {
    pub mod price;
    pub mod service;
}

pub fn mount_services() -> actix_web::Scope {
    web::scope("/service")
        .service(routes::service::get_services)
        .service(routes::service::get_service)
        .service(routes::service::post_service)
        .service(routes::service::delete_service)
}

pub fn mount_salon_services() -> actix_web::Scope {
    web::scope("/salon-service")
        .service(routes::salon_service::get_own_salon_services)
        .service(routes::salon_service::get_salon_services)
        .service(routes::salon_service::post_salon_services)
        .service(routes::salon_service::patch_salon_service)
        .service(routes::salon_service::delete_salon_service)
}
