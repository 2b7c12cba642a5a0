//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> String {
    r##"# Smart RTE configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[editor]
# page_url = "rte://localhost/editor/index.html"
# asset_dir = "/path/to/custom/editor"   # overrides bundled assets
# placeholder = "Start writing..."

[bridge]
# change_debounce_ms = 250   # 0-5000, 0 = report every input
# emit_on_blur = true
# max_message_bytes = 8388608  # 1024-67108864

[webview]
# devtools = false
# transparent = false
# clipboard = true

[history]
# max_depth = 100            # 1-10000

[image_menu]
# enabled = true
# max_width_px = 4096        # 16-16384
# max_radius_px = 512        # 0-1024

[logging]
# level = "info"             # trace, debug, info, warn, error
"##
    .to_string()
}
