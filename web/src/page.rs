//! The landing page, rendered once at startup.

use bytes::Bytes;
use domain::FEED_ELEMENT_ID;
use service::config::Config;

/// Path of the event stream endpoint.
pub const STREAM_PATH: &str = "/stream";

/// Datastar action that opens an SSE connection to `path` and applies the
/// patches it receives.
pub fn datastar_get(path: &str) -> String {
    format!("@get('{path}')")
}

/// Renders the landing page. The page needs no network resource besides the
/// datastar script; all styling is inline.
pub fn render(config: &Config) -> Bytes {
    let script_url = config.datastar_script_url();
    let subscribe = datastar_get(STREAM_PATH);

    Bytes::from(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=0" />
	<script type="module" defer src="{script_url}"></script>
	<style>
		*, *::before, *::after {{
			box-sizing: border-box;
		}}

		* {{
			margin: 0;
		}}

		:root {{
			--bg-color: oklch(92.2% 0 0);
		}}

		@media (prefers-color-scheme: dark) {{
			:root {{
				--bg-color: oklch(25.3267% 0.015896 252.417568);
			}}
		}}

		body {{
			align-items: center;
			background-color: var(--bg-color);
			display: flex;
			flex-direction: column;
			font-family: ui-sans-serif, system-ui, sans-serif, 'Apple Color Emoji', 'Segoe UI Emoji', 'Segoe UI Symbol', 'Noto Color Emoji';
			height: 100vh;
			justify-content: center;
		}}
	</style>
</head>
<body>
	<span id="{FEED_ELEMENT_ID}" data-on-load="{subscribe}"></span>
</body>
</html>
"#
    ))
}
