//! Django management commands.
//!
//! Options that are not common options become switches of the management
//! command, so `fake = yes` on a `django: migrate` step renders
//! `./manage.py migrate --fake`.

use serde_json::{Map, Value};

use super::{Entry, Family, Table};
use crate::constants::ADHOC_NAME_KEY;
use crate::error::Result;
use crate::options::stringify;
use crate::snippet::Snippet;
use crate::statement::Statement;

/// Options that never turn into switches, on top of the typed common options.
const EXCLUDED: [&str; 2] = ["shell", ADHOC_NAME_KEY];

/// Options consumed by `dumpdata` and `loaddata` to build the fixture path.
const FIXTURE_KEYS: [&str; 3] = ["app", "model", "path"];

/// Renders a django snippet after converting its options into switches.
pub fn django_parser(snippet: &Snippet, args: &[String]) -> Result<String> {
    let options = snippet.options();
    let fixtures = matches!(snippet.name(), "django.dumpdata" | "django.loaddata");

    let mut switches = Vec::new();
    for (key, value) in &options.extra {
        if EXCLUDED.contains(&key.as_str()) || (fixtures && FIXTURE_KEYS.contains(&key.as_str())) {
            continue;
        }

        let key = key.replace('_', "-");
        match value {
            Value::Bool(true) => switches.push(format!("--{key}")),
            Value::Bool(false) => {}
            other => switches.push(format!("--{key}={}", stringify(other))),
        }
    }

    let mut extra = Map::new();
    extra.insert("switches".to_string(), Value::String(switches.join(" ")));
    if let Some(name) = options.get(ADHOC_NAME_KEY) {
        extra.insert("command_name".to_string(), name);
    }

    if fixtures {
        let path = options.get_str("path").unwrap_or_else(|| {
            let app = options.get_str("app").unwrap_or_default();
            match options.get_str("model") {
                Some(model) => format!("fixtures/{app}/{}.json", model.to_lowercase()),
                None => format!("fixtures/{app}/initial.json"),
            }
        });
        extra.insert("path".to_string(), Value::String(path));
    }

    snippet.render_content(args, extra)
}

pub fn table() -> Table {
    let django = Family::new([
        ("check", Entry::text("./manage.py check{% if switches %} {{ switches }}{% endif %}")),
        (
            "command",
            Entry::text(
                "./manage.py {{ command_name }}{% if args %} {{ args|join(' ') }}{% endif %}{% if switches %} {{ switches }}{% endif %}",
            ),
        ),
        (
            "dumpdata",
            Entry::fragments([
                "./manage.py dumpdata {{ app }}{% if model %}.{{ model }}{% endif %}",
                "{{ switches }}",
                "> {{ path }}",
            ]),
        ),
        ("loaddata", Entry::fragments(["./manage.py loaddata", "{{ switches }}", "{{ path }}"])),
        ("migrate", Entry::text("./manage.py migrate{% if switches %} {{ switches }}{% endif %}")),
        (
            "static",
            Entry::text("./manage.py collectstatic{% if switches %} {{ switches }}{% endif %}"),
        ),
    ])
    .with_parser(django_parser)
    .with_default("command");

    [("django".to_string(), Entry::Family(django))].into_iter().collect()
}
