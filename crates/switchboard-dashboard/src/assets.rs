//! Embedded static assets.

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Client script. Reads `switchboard.config`, then re-renders `#root`
/// from the live view on load and every `pollIntervalMs`. A failed
/// request leaves the current markup in place.
const APPLICATION_JS: &str = r#"(function () {
  var config = (window.switchboard && window.switchboard.config) || {};
  var viewPath = config.viewPath || '/view';
  var period = config.pollIntervalMs || 1000;
  var root = document.getElementById('root');
  if (!root) {
    return;
  }

  function refresh() {
    fetch(viewPath, { headers: { Accept: 'text/html' } })
      .then(function (resp) {
        if (!resp.ok) {
          throw new Error('status ' + resp.status);
        }
        return resp.text();
      })
      .then(function (html) {
        root.innerHTML = html;
      })
      .catch(function () {});
  }

  refresh();
  setInterval(refresh, period);
})();
"#;

const APPLICATION_CSS: &str = r#"
.special {
    padding-top: 24px;
}

.special .title {
    display: inline-block;
    margin-right: 12px;
}

.alert .media-left i {
    font-size: 1.5em;
}

.table-data h2 {
    margin: 0;
}

.label.bg-error-2 {
    background-color: #c1272d;
}
"#;

pub async fn application_js() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APPLICATION_JS,
    )
        .into_response()
}

pub async fn application_css() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        APPLICATION_CSS,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_served_as_javascript() {
        let resp = application_js().await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
    }

    #[test]
    fn script_reads_embedded_config() {
        assert!(APPLICATION_JS.contains("window.switchboard.config"));
        assert!(APPLICATION_JS.contains("config.viewPath"));
        assert!(APPLICATION_JS.contains("config.pollIntervalMs"));
    }
}
