//! Test fixtures - reusable content constants for tests.

/// Pinned requirements for the bot
pub const REQUIREMENTS: &str = "\
python-telegram-bot==20.7
requests==2.31.0
";

/// Entry script; prints its arguments and exits with a known code
pub const BOT_SCRIPT: &str = "\
echo \"bot started $*\"
exit 3
";

/// Recipe with shell stand-ins for the package managers.
///
/// `install-dependencies` fails like an unresolvable requirement when the
/// manifest pins a `==99` version.
pub const OFFLINE_RECIPE: &str = r#"[image]
name = "bot"
base = "python:3.10-slim"
workdir = "/app"

[system]
packages = ["gcc", "build-essential"]
install = "mkdir -p {layer}/var/lib/apt/lists && echo {packages} > {layer}/system-packages.txt && touch {layer}/var/lib/apt/lists/index"
clean = "rm -rf {layer}/var/lib/apt/lists/*"

[dependencies]
manifest = "requirements.txt"
install = "if grep -q '==99' {manifest}; then echo 'ERROR: No matching distribution found' >&2; exit 1; fi; cp {manifest} {layer}/installed.txt"

[entry]
command = ["sh", "telegram_bot.py"]
"#;
