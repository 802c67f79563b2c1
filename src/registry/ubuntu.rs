//! Debian and Ubuntu specific commands.

use super::{Entry, Table};

pub fn table() -> Table {
    let apache = Entry::family([
        (
            "disable",
            Entry::text(
                r#"{% if args[0] is startingwith("mod_") %}a2dismod{% else %}a2dissite{% endif %} {{ args[0] }}"#,
            ),
        ),
        ("disable_module", Entry::text("a2dismod {{ args[0] }}")),
        ("disable_site", Entry::text("a2dissite {{ args[0] }}")),
        (
            "enable",
            Entry::text(
                r#"{% if args[0] is startingwith("mod_") %}a2enmod{% else %}a2ensite{% endif %} {{ args[0] }}"#,
            ),
        ),
        ("enable_module", Entry::text("a2enmod {{ args[0] }}")),
        ("enable_site", Entry::text("a2ensite {{ args[0] }}")),
        ("reload", Entry::text("service apache2 reload")),
        ("restart", Entry::text("service apache2 restart")),
        ("start", Entry::text("service apache2 start")),
        ("stop", Entry::text("service apache2 stop")),
        ("test", Entry::text("apachectl configtest")),
    ]);

    let system = Entry::family([
        ("reboot", Entry::text("reboot")),
        ("update", Entry::text("apt-get update -y")),
        ("upgrade", Entry::text("apt-get upgrade -y")),
    ]);

    // --gecos suppresses the interactive prompts of adduser.
    let user = Entry::family([
        (
            "create",
            Entry::fragments([
                "adduser {{ args[0] }} --gecos '' --disabled-password",
                "{% if home %}--home {{ home }}{% endif %}",
                "{% if groups %}&& {% for group in groups %}adduser {{ args[0] }} {{ group }};{% endfor %}{% endif %}",
            ]),
        ),
        ("remove", Entry::text("deluser {{ args[0] }}")),
    ]);

    let entries = [
        ("apache", apache),
        ("install", Entry::text("apt-get install -y {{ args[0] }}")),
        ("reload", Entry::text("service {{ args[0] }} reload")),
        ("restart", Entry::text("service {{ args[0] }} restart")),
        ("run", Entry::text("{{ args[0] }}")),
        ("start", Entry::text("service {{ args[0] }} start")),
        ("stop", Entry::text("service {{ args[0] }} stop")),
        ("system", system),
        ("uninstall", Entry::text("apt-get remove -y {{ args[0] }}")),
        ("upgrade", Entry::text("apt-get install -y --only-upgrade {{ args[0] }}")),
        ("user", user),
    ];

    entries.into_iter().map(|(name, entry)| (name.to_string(), entry)).collect()
}
