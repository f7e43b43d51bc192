/// Default TOML config content with comments.
pub(super) fn default_config_toml() -> &'static str {
    r##"# Casement Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[logging]
# level = "info"              # debug, info, warn, error
# enabled = true
# max_entries = 500           # 1-100000
# max_string_length = 1000    # 16-65536
# max_depth = 6               # 1-32
# redact_keys = ["password", "token", "secret", "authorization", "cookie", "api_key"]
# scrub_secret_patterns = true
# file = "/path/to/casement.log"   # JSON lines; unset disables file output
# max_file_size = 10485760    # bytes before rotation, 1024-1073741824
# max_backups = 5             # 0-100

[bus]
# replay_capacity = 16        # 1-1024

[chrome]
# viewport_width = 1280.0
# viewport_height = 800.0
# top_panel_height = 40.0     # 0-400
# bottom_panel_height = 48.0  # 0-400
# top_panel_visible = true
# bottom_panel_visible = true

[windows]
# default_width = 720.0
# default_height = 480.0
# cascade_offset = 28.0       # 0-200
# maximize_on_activate = true
"##
}
