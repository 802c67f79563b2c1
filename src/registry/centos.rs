//! CentOS and other yum based distributions.

use super::{Entry, Table};

pub fn table() -> Table {
    let apache = Entry::family([
        ("reload", Entry::text("apachectl -k reload")),
        ("restart", Entry::text("apachectl -k restart")),
        ("start", Entry::text("apachectl -k start")),
        ("stop", Entry::text("apachectl -k stop")),
        ("test", Entry::text("apachectl configtest")),
    ]);

    let system = Entry::family([
        ("reboot", Entry::text("reboot")),
        ("update", Entry::text("yum check-update")),
        ("upgrade", Entry::text("yum update -y")),
    ]);

    let user = Entry::family([
        (
            "create",
            Entry::fragments([
                "adduser {{ args[0] }}",
                "{% if home %}--home {{ home }}{% endif %}",
                "{% if groups %}&& {% for group in groups %}gpasswd -a {{ args[0] }} {{ group }};{% endfor %}{% endif %}",
            ]),
        ),
        ("remove", Entry::text("userdel -r {{ args[0] }}")),
    ]);

    let entries = [
        ("apache", apache),
        ("install", Entry::text("yum install -y {{ args[0] }}")),
        ("reload", Entry::text("systemctl reload {{ args[0] }}")),
        ("restart", Entry::text("systemctl restart {{ args[0] }}")),
        ("run", Entry::text("{{ args[0] }}")),
        ("start", Entry::text("systemctl start {{ args[0] }}")),
        ("stop", Entry::text("systemctl stop {{ args[0] }}")),
        ("system", system),
        ("uninstall", Entry::text("yum remove -y {{ args[0] }}")),
        ("upgrade", Entry::text("yum update -y {{ args[0] }}")),
        ("user", user),
    ];

    entries.into_iter().map(|(name, entry)| (name.to_string(), entry)).collect()
}
