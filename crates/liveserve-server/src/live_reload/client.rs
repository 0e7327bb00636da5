//! Live reload client script.
//!
//! Served HTML pages get this script injected so the browser reloads
//! itself when a file changes, without any cooperation from the page.

/// JavaScript snippet injected into served HTML pages.
///
/// Connects to the live reload WebSocket and reloads the page on every
/// reload event. Reconnects after a short delay when the server restarts.
const CLIENT_SCRIPT: &str = r#"<script>
(function () {
  var retryDelayMs = 1000;
  function connect() {
    var proto = location.protocol === "https:" ? "wss://" : "ws://";
    var socket = new WebSocket(proto + location.host + "/ws/live-reload");
    socket.onmessage = function (msg) {
      var event = JSON.parse(msg.data);
      if (event.type === "reload") {
        location.reload();
      }
    };
    socket.onclose = function () {
      setTimeout(connect, retryDelayMs);
    };
  }
  connect();
})();
</script>"#;

/// Inject the live reload client script into an HTML document.
///
/// The script is inserted immediately before the closing `</body>` tag
/// (matched case-insensitively). Documents without a `</body>` tag get the
/// script appended at the end.
pub(crate) fn inject(html: &str) -> String {
    // ASCII lowercasing preserves byte offsets
    let lowered = html.to_ascii_lowercase();

    match lowered.rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + CLIENT_SCRIPT.len() + 1);
            out.push_str(&html[..idx]);
            out.push_str(CLIENT_SCRIPT);
            out.push('\n');
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}\n{CLIENT_SCRIPT}"),
    }
}
