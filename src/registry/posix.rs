//! File and directory commands common to every POSIX system.

use super::{Entry, Table};

fn dir() -> Entry {
    Entry::fragments([
        "mkdir",
        "{% if mode %}-m {{ mode }}{% endif %}",
        "{% if recursive is not defined or recursive %}-p{% endif %}",
        "{{ args[0] }}",
        "{% if group %}&& chgrp -R {{ group }} {{ args[0] }}{% endif %}",
        "{% if owner %}&& chown -R {{ owner }} {{ args[0] }}{% endif %}",
    ])
}

fn rsync(remote: bool) -> Entry {
    let mut fragments = vec![
        "rsync",
        "--cvs-exclude",
        "--checksum",
        "--compress",
        "{% if delete %}--delete{% endif %}",
        "{% if links %}--copy-links{% endif %}",
        "{% if exclude %}--exclude-from={{ exclude }}{% endif %}",
        // --partial and --progress
        "-P",
        "{% if recursive %}--recursive{% endif %}",
        "{{ args[0] }}",
    ];
    if remote {
        fragments.push(r#"-e "ssh -i {{ key_file }} -p {{ port|default("22") }}""#);
        fragments.push("{{ user }}@{{ host }}:{{ args[1] }}");
    } else {
        fragments.push("{{ args[1] }}");
    }
    Entry::fragments(fragments)
}

pub fn table() -> Table {
    let entries = [
        ("append", Entry::text(r#"echo "{{ content }}" >> {{ args[0] }}"#)),
        (
            "archive",
            Entry::fragments([
                "tar -cz",
                "{% if absolute %}-P{% endif %}",
                "{% if view %}-v{% endif %}",
                "{% if exclude %}--exclude {{ exclude }}{% endif %}",
                "{% if strip %}--strip-components {{ strip }}{% endif %}",
                "-f {{ args[0] }} {{ to }}",
            ]),
        ),
        (
            "copy",
            Entry::fragments([
                "cp",
                "{% if not overwrite %}-n{% endif %}",
                "{% if recursive %}-R{% endif %}",
                "{{ args[0] }} {{ args[1] }}",
            ]),
        ),
        ("dir", dir()),
        (
            "extract",
            Entry::fragments([
                "tar",
                "-xz",
                "{% if absolute %}-P{% endif %}",
                "{% if view %}-v{% endif %}",
                "{% if exclude %}--exclude {{ exclude }}{% endif %}",
                "{% if strip %}--strip-components {{ strip }}{% endif %}",
                r#"-f {{ args[0] }} {{ to|default("./") }}"#,
            ]),
        ),
        (
            "file",
            Entry::fragments([
                "{% if content %}cat > {{ args[0] }} << EOF\n{{ content }}\nEOF{% else %}touch {{ args[0] }}{% endif %}",
                "{% if mode %}&& chmod {{ mode }} {{ args[0] }}{% endif %}",
                "{% if group %}&& chgrp {{ group }} {{ args[0] }}{% endif %}",
                "{% if owner %}&& chown {{ owner }} {{ args[0] }}{% endif %}",
            ]),
        ),
        (
            "link",
            Entry::fragments(["ln -s", "{% if force %}-f{% endif %}", "{{ args[0] }} {{ args[1] }}"]),
        ),
        ("mkdir", dir()),
        ("move", Entry::text("mv {{ args[0] }} {{ args[1] }}")),
        (
            "perms",
            Entry::fragments([
                "{% if group %}chgrp {% if recursive %}-R {% endif %}{{ group }} {{ args[0] }};{% endif %}",
                "{% if mode %}chmod {% if recursive %}-R {% endif %}{{ mode }} {{ args[0] }};{% endif %}",
                "{% if owner %}chown {% if recursive %}-R {% endif %}{{ owner }} {{ args[0] }}{% endif %}",
            ]),
        ),
        ("push", rsync(true)),
        (
            "remove",
            Entry::fragments([
                "rm",
                "{% if force %}-f{% endif %}",
                "{% if recursive %}-r{% endif %}",
                "{{ args[0] }}",
            ]),
        ),
        ("rename", Entry::text("mv {{ args[0] }} {{ args[1] }}")),
        (
            "replace",
            Entry::fragments([
                r#"sed -i {{ backup|default(".b") }}"#,
                r#""s{{ delimiter|default("/") }}{{ find }}{{ delimiter|default("/") }}{{ sub }}{{ delimiter|default("/") }}g""#,
                "{{ args[0] }}",
            ]),
        ),
        (
            "scopy",
            Entry::fragments([
                "scp",
                "{% if key_file %}-i {{ key_file }}{% endif %}",
                r#"-P {{ port|default("22") }}"#,
                "{{ args[0] }}",
                "{{ user }}@{{ host }}:{{ args[1] }}",
            ]),
        ),
        (
            "ssl",
            Entry::fragments([
                "certbot certonly",
                "--agree-tos",
                r#"--email {{ email|default("webmaster@" ~ args[0]) }}"#,
                "-n --webroot",
                r#"-w {{ webroot|default("/var/www/maint/www") }}"#,
                "-d {{ args[0] }}",
            ]),
        ),
        ("sync", rsync(false)),
        ("touch", Entry::text("touch {{ args[0] }}")),
        ("wait", Entry::text("sleep {{ args[0] }}")),
        ("write", Entry::text("cat > {{ args[0] }} << EOF\n{{ content }}\nEOF")),
    ];

    entries.into_iter().map(|(name, entry)| (name.to_string(), entry)).collect()
}
