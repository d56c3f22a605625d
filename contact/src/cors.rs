use std::sync::Arc;

use actix_cors::Cors;

/// Origins outside the list get an error response before any handler runs.
/// Requests without an `Origin` header (curl, server-to-server) pass. Only
/// the origin is checked; requested methods and headers are echoed back.
pub fn allow_list(allowed_origins: Arc<Vec<String>>) -> Cors {
    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            allowed_origins
                .iter()
                .any(|allowed| allowed.as_bytes() == origin.as_bytes())
        })
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
