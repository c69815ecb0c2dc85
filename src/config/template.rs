//! Files written by `strata init`

/// Recipe with every section spelled out at its default value
pub const DEFAULT_RECIPE: &str = r#"# strata recipe
#
# Stages run in order: base, workdir, system-packages, stage-manifest,
# install-dependencies, stage-source, entry. Changing a value rebuilds its
# stage and every stage after it.

[image]
# name = "my-bot"
base = "python:3.10-slim"
workdir = "/app"

[system]
packages = ["gcc", "build-essential"]
# Commands run on the host; everything they install must land under {layer}.
install = 'mkdir -p {layer}/var/lib/apt/lists/partial {layer}/var/cache/apt/archives/partial && apt-get -o Dir::State::Lists={layer}/var/lib/apt/lists -o Dir::Cache={layer}/var/cache/apt update && apt-get -o Dir::State::Lists={layer}/var/lib/apt/lists -o Dir::Cache={layer}/var/cache/apt install -y --no-install-recommends --download-only {packages} && for deb in {layer}/var/cache/apt/archives/*.deb; do dpkg-deb -x "$deb" {layer}/; done'
clean = "rm -rf {layer}/var/lib/apt/lists/* {layer}/var/cache/apt"

[dependencies]
manifest = "requirements.txt"
# {layer}{workdir}/.deps is on PYTHONPATH when the image runs
install = "pip install --no-cache-dir --target {layer}{workdir}/.deps -r {manifest}"
require_pins = false

[source]
ignore_file = ".strataignore"

[entry]
command = ["python", "telegram_bot.py"]

[entry.env]
# PYTHONUNBUFFERED = "1"
"#;

/// Ignore file that keeps interpreter caches and local state out of the image
pub const DEFAULT_IGNORE: &str = "\
.git/
__pycache__/
*.pyc
.venv/
.env
.strata/
";
