/// Routes listed by the index page, in registration order.
pub const API_ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/{start}",
    "/api/v1.0/{start}/{end}",
];

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Plain text list of the available api routes", content_type = "text/plain", body = String)
    ))]
pub async fn index_handler() -> String {
    let mut listing = String::from("Available Routes:\n");
    for route in API_ROUTES {
        listing.push_str(route);
        listing.push('\n');
    }
    listing
}
