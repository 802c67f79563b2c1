use super::{Entry, Family, Table};

const PASSWORD: &str = r#"{% if admin_pass %}export PGPASSWORD="{{ admin_pass }}" &&{% endif %}"#;

const CONNECTION: [&str; 3] = [
    r#"-U {{ admin_user|default("postgres") }}"#,
    r#"--host={{ host|default("localhost") }}"#,
    r#"--port={{ port|default("5432") }}"#,
];

fn client(program: &str, rest: &[&str]) -> Entry {
    let fragments = [PASSWORD, program]
        .into_iter()
        .chain(CONNECTION)
        .chain(rest.iter().copied());
    Entry::fragments(fragments)
}

pub fn table() -> Table {
    let user = Family::new([
        (
            "create",
            client(
                "createuser",
                &[
                    // No database or role creation, not a superuser.
                    "-DRS {{ args[0] }}",
                    r#"{% if password %}&& psql -U {{ admin_user|default("postgres") }} --host={{ host|default("localhost") }} --port={{ port|default("5432") }} -c "ALTER USER {{ args[0] }} WITH ENCRYPTED PASSWORD '{{ password }}';"{% endif %}"#,
                ],
            ),
        ),
        ("drop", client("dropuser", &["{{ args[0] }}"])),
        (
            "exists",
            client("psql", &[r#"-c "SELECT 1 FROM pg_roles WHERE rolname='{{ args[0] }}';""#]),
        ),
    ]);

    let pgsql = Family::new([
        (
            "create",
            client(
                "createdb",
                &[
                    "{% if owner %}--owner={{ owner }}{% endif %}",
                    "{% if template %}--template={{ template }}{% endif %}",
                    "{{ args[0] }}",
                ],
            ),
        ),
        ("drop", client("dropdb", &["{{ args[0] }}"])),
        (
            "dump",
            client(
                "pg_dump",
                &[
                    "--column-inserts",
                    r#"--file={{ file_name|default("dump.sql") }}"#,
                    "{{ args[0] }}",
                ],
            ),
        ),
        (
            "exec",
            client("psql", &["--dbname={{ database }}", r#"-c "{{ args[0] }}""#]),
        ),
        (
            "exists",
            client("psql", &[r"-lqt | cut -d \| -f 1 | grep -qw {{ args[0] }}"]),
        ),
        ("user", Entry::Family(user)),
    ]);

    [("pgsql".to_string(), Entry::Family(pgsql))].into_iter().collect()
}
