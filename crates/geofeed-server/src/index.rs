//! Index page — the map viewers load on first visit.

use axum::response::Html;
use axum_extra::extract::Host;

/// Embedded page template. `{{host}}` is replaced with the request's host
/// so the page opens its WebSocket back to the server that served it.
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>geofeed</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const map = L.map('map').setView([20, 0], 2);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);

const proto = location.protocol === 'https:' ? 'wss' : 'ws';
const socket = new WebSocket(proto + '://{{host}}/ws');
socket.onmessage = (msg) => {
  const point = JSON.parse(msg.data);
  const marker = L.circleMarker([point.latitude, point.longitude], { radius: 6 });
  marker.addTo(map);
  setTimeout(() => map.removeLayer(marker), 30000);
};
</script>
</body>
</html>
"#;

/// Render the index page for the given request host.
pub fn render_index(host: &str) -> String {
    INDEX_TEMPLATE.replace("{{host}}", host)
}

/// `GET /`
pub async fn index_handler(Host(host): Host) -> Html<String> {
    Html(render_index(&host))
}
