use actix_web::web;

pub mod notifier;
pub mod routes {
    pub mod notification;
}
pub mod services {
    pub mod notification;
}
pub mod dtos {
    pub mod notification;
}

pub fn mount_notifications() -> actix_web::Scope {
    // literal segments first, `{id}` would swallow them otherwise
    web::scope("/notification")
        .service(routes::notification::get_notifications)
        .service(routes::notification::delete_all_notifications)
        .service(routes::notification::post_mark_all_as_read)
        .service(routes::notification::post_mark_all_as_unread)
        .service(routes::notification::get_notification)
        .service(routes::notification::delete_notification)
        .service(routes::notification::post_mark_as_read)
        .service(routes::notification::post_mark_as_unread)
}
