use actix_web::web;

pub mod routes {
    pub mod account;
    pub mod address;
}
pub mod services {
    pub mod account;
}
pub mod dtos {
    pub mod account;
}

pub fn mount_accounts() -> actix_web::Scope {
    web::scope("/account")
        .service(routes::account::get_me)
        .service(routes::account::get_customers)
        .service(routes::account::get_customer)
        .service(routes::account::patch_customer)
        .service(routes::account::delete_customer)
        .service(routes::account::get_salons)
        .service(routes::account::get_salon)
        .service(routes::account::patch_salon)
        .service(routes::account::delete_salon)
        .service(routes::address::put_address)
}
