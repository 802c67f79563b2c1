use super::{Entry, Table};

pub fn table() -> Table {
    let entries = [
        (
            "pip",
            Entry::fragments([
                "{% if venv %}source {{ venv }}/bin/activate &&{% endif %}",
                "pip{% if version %}{{ version }}{% endif %}",
                r#"{% if op == "upgrade" %}install --upgrade{% elif op == "remove" %}uninstall -y{% else %}{{ op|default("install") }}{% endif %}"#,
                "{{ args[0] }}",
            ]),
        ),
        (
            "pip3",
            Entry::fragments([
                "{% if venv %}source {{ venv }}/bin/activate &&{% endif %}",
                "pip3",
                r#"{% if op == "upgrade" %}install --upgrade{% else %}{{ op|default("install") }}{% endif %}"#,
                "{{ args[0] }}",
            ]),
        ),
        ("virtualenv", Entry::text("virtualenv {{ args[0] }}")),
    ];

    entries.into_iter().map(|(name, entry)| (name.to_string(), entry)).collect()
}
