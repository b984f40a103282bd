//! Minimal index page
//!
//! The browser map frontend is served separately; this page only confirms
//! the service is up and points at the API.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Geotag</title></head>
<body>
<h1>Geotag</h1>
<p>Photo geotagging service is running.</p>
<ul>
<li><a href="/health">/health</a></li>
<li><a href="/api/photos">/api/photos</a></li>
<li><a href="/api/tracks">/api/tracks</a></li>
<li><a href="/api/config">/api/config</a></li>
</ul>
</body>
</html>
"#;

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
