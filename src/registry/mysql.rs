use super::{Entry, Family, Table};

const CONNECTION: [&str; 4] = [
    r#"--user={{ admin_user|default("root") }}"#,
    r#"{% if admin_pass %}--password="{{ admin_pass }}"{% endif %}"#,
    r#"--host={{ host|default("localhost") }}"#,
    r#"--port={{ port|default("3306") }}"#,
];

/// `program` followed by the connection switches and the given fragments.
fn client(program: &str, rest: &[&str]) -> Entry {
    let fragments = std::iter::once(program).chain(CONNECTION).chain(rest.iter().copied());
    Entry::fragments(fragments)
}

pub fn table() -> Table {
    let user = Family::new([
        (
            "create",
            client(
                "mysql",
                &[
                    r#"--execute="CREATE USER IF NOT EXISTS '{{ args[0] }}'@'{{ host|default("localhost") }}'{% if password %} IDENTIFIED BY '{{ password }}'{% endif %}""#,
                ],
            ),
        ),
        (
            "drop",
            client(
                "mysql",
                &[r#"--execute="DROP USER IF EXISTS '{{ args[0] }}'@'{{ host|default("localhost") }}'""#],
            ),
        ),
        (
            "exists",
            client(
                "mysql",
                &[r#"--execute="SELECT EXISTS(SELECT 1 FROM mysql.user WHERE user = '{{ args[0] }}')""#],
            ),
        ),
    ]);

    let mysql = Family::new([
        (
            "create",
            client(
                "mysqladmin create",
                &[
                    "{{ args[0] }}",
                    r#"{% if owner %}&& mysql --user={{ admin_user|default("root") }}{% if admin_pass %} --password="{{ admin_pass }}"{% endif %} --host={{ host|default("localhost") }} --port={{ port|default("3306") }} --execute="GRANT ALL ON {{ args[0] }}.* TO '{{ owner }}'@'{{ host|default("localhost") }}'"{% endif %}"#,
                ],
            ),
        ),
        ("drop", client("mysqladmin drop", &["{{ args[0] }}"])),
        (
            "dump",
            client(
                "mysqldump",
                &["--complete-inserts", r#"{{ args[0] }} > {{ path|default("dump.sql") }}"#],
            ),
        ),
        (
            "exec",
            client(
                "mysql",
                &[r#"--execute="{{ args[0] }}""#, r#"{{ database|default("default") }}"#],
            ),
        ),
        (
            "exists",
            client(
                "mysql",
                &[
                    r#"--execute="SELECT SCHEMA_NAME FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = '{{ args[0] }}'""#,
                ],
            ),
        ),
        (
            "grant",
            client(
                "mysql",
                &[
                    r#"--execute="GRANT {{ args[0] }} ON {{ database|default("default") }}.* TO '{{ user }}'@'{{ host|default("localhost") }}'""#,
                ],
            ),
        ),
        ("user", Entry::Family(user)),
    ]);

    [("mysql".to_string(), Entry::Family(mysql))].into_iter().collect()
}
