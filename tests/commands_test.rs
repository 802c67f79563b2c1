use serde_json::{json, Value};
use tease::commands::factory::{command_factory, get_command};
use tease::commands::system::{self, Centos, Ubuntu};
use tease::commands::{django, messages, mysql, pgsql, posix, python, ItemizedCommand};
use tease::error::Error;
use tease::options::Options;
use tease::registry::Profile;
use tease::statement::{Statement, StatementFlags};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn options(pairs: &[(&str, Value)]) -> Options {
    Options::from_map(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())))
}

#[test]
fn test_command_wrapping() {
    let command = posix::touch(
        &args(&["/tmp/ready"]),
        options(&[("cd", json!("/srv")), ("register", json!("touched")), ("stop", json!(true))]),
    )
    .unwrap();

    assert_eq!(
        command.get_statement(StatementFlags::default()),
        "# touch /tmp/ready\n( cd /srv && touch /tmp/ready )\ntouched=$?;\nif [[ $touched -gt 0 ]]; exit 1; fi;"
    );
}

#[test]
fn test_itemized_command() {
    let command = ItemizedCommand::new(
        system::install::<Ubuntu>,
        args(&["git", "curl", "nginx"]),
        args(&["$item"]),
        options(&[("comment", json!("install tools")), ("items", json!(["git", "curl", "nginx"]))]),
        "install",
    )
    .unwrap();

    assert!(command.is_itemized());
    assert_eq!(command.get_commands().len(), 3);
    assert!(command.get_commands().iter().all(|c| c.options.items.is_none()));
    assert_eq!(
        command.get_statement(StatementFlags::default()),
        "# install tools\napt-get install -y git\napt-get install -y curl\napt-get install -y nginx"
    );
}

#[test]
fn test_itemized_command_default_comment() {
    let command =
        ItemizedCommand::new(posix::remove, args(&["a", "b"]), args(&["/tmp/$item"]), Options::new(), "remove")
            .unwrap();
    let statement = command.get_statement(StatementFlags::default());
    assert!(statement.starts_with("# execute multiple commands\n"));
    assert_eq!(statement.lines().count(), 3);
}

#[test]
fn test_itemized_command_fails_at_construction() {
    let result = ItemizedCommand::new(posix::move_path, args(&["a"]), args(&["$item"]), Options::new(), "move");
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_posix_builders() {
    let link = posix::link(&args(&["/srv/releases/42"]), Options::new()).unwrap();
    assert_eq!(link.statement, "ln -s /srv/releases/42 42");

    let replace = posix::replace(
        &args(&["/etc/hosts"]),
        options(&[("find", json!("old")), ("sub", json!("new"))]),
    )
    .unwrap();
    assert_eq!(replace.statement, "sed -i .b 's/old/new/g' /etc/hosts");

    let write = posix::write(&args(&["/tmp/x"]), options(&[("content", json!("a\nb"))])).unwrap();
    assert_eq!(write.statement, "cat > /tmp/x << EOF\na\nb\nEOF");

    let sync = posix::sync(&args(&["./src/", "/srv/app"]), Options::new()).unwrap();
    assert_eq!(
        sync.statement,
        "rsync --cvs-exclude --checksum --compress --copy-links -P --recursive ./src/ /srv/app"
    );

    let push = posix::rsync(
        &args(&["./dist/", "/var/www"]),
        options(&[("host", json!("web1")), ("key_file", json!("~/.ssh/deploy")), ("user", json!("deploy"))]),
    )
    .unwrap();
    assert!(push.statement.ends_with(r#"-e "ssh -i ~/.ssh/deploy -p 22" deploy@web1:/var/www"#));
}

#[test]
fn test_scopy_never_uses_sudo() {
    let command = posix::scopy(
        &args(&["dump.sql", "/backups/"]),
        options(&[("host", json!("db1")), ("sudo", json!(true))]),
    )
    .unwrap();
    assert!(!command.options.sudo.enabled);
    assert_eq!(command.statement, "scp -P 22 dump.sql db1:/backups/");
}

#[test]
fn test_webhooks_validate_url() {
    assert!(matches!(messages::slack(&args(&["hi"]), Options::new()), Err(Error::InvalidInput(_))));
    assert!(matches!(
        messages::slack(&args(&["hi"]), options(&[("url", json!("not a url"))])),
        Err(Error::InvalidInput(_))
    ));

    let twist = messages::twist(
        &args(&["deployed"]),
        options(&[("url", json!("https://twist.com/api/v3/integration_incoming/post_data?x=1"))]),
    )
    .unwrap();
    assert!(twist.statement.contains(r#"'{"content": "deployed", "title": "Notice"}'"#));
}

#[test]
fn test_pip() {
    let command = python::pip(&args(&["django"]), options(&[("op", json!("upgrade"))])).unwrap();
    assert_eq!(command.statement, "pip3 install --upgrade django");

    let command = python::pip(&args(&["django"]), options(&[("op", json!("remove")), ("version", json!(2))])).unwrap();
    assert_eq!(command.statement, "pip uninstall -y django");
}

#[test]
fn test_system_upgrade() {
    let all = system::upgrade::<Centos>(&[], Options::new()).unwrap();
    assert_eq!(all.statement, "yum update -y");
    let one = system::upgrade::<Ubuntu>(&args(&["openssl"]), Options::new()).unwrap();
    assert_eq!(one.statement, "apt-get install -y --only-upgrade openssl");
}

#[test]
fn test_get_command() {
    let command = get_command("restart", Profile::Centos, &args(&["nginx"]), Options::new())
        .unwrap()
        .unwrap();
    assert_eq!(command.get_statement(StatementFlags::bare()), "systemctl restart nginx");
    assert_eq!(command.name(), "restart");

    let itemized = get_command(
        "touch",
        Profile::Ubuntu,
        &args(&["/tmp/$item"]),
        options(&[("items", json!("a,b"))]),
    )
    .unwrap()
    .unwrap();
    assert!(itemized.is_itemized());

    let prompt = get_command("prompt", Profile::Ubuntu, &args(&["answer"]), Options::new())
        .unwrap()
        .unwrap();
    assert!(prompt.get_statement(StatementFlags::default()).contains("read answer"));

    assert!(get_command("teleport", Profile::Ubuntu, &[], Options::new()).unwrap().is_none());
    assert!(matches!(
        get_command("template", Profile::Ubuntu, &args(&["only-source"]), Options::new()),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        get_command("scopy", Profile::Ubuntu, &args(&["a", "b"]), Options::new()),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_command_factory_numbers_commands() {
    let triples = vec![
        ("update".to_string(), vec![], Options::new()),
        ("teleport".to_string(), vec![], Options::new()),
        ("install".to_string(), args(&["nginx"]), Options::new()),
    ];
    let commands = command_factory(triples, Profile::Ubuntu).unwrap();

    let numbers: Vec<usize> = commands.iter().map(|c| c.number).collect();
    assert_eq!(numbers, [1, 2]);
    assert_eq!(commands[1].command.get_statement(StatementFlags::bare()), "apt-get install -y nginx");
}

#[test]
fn test_mysql_builders() {
    let create = mysql::create(&args(&["shop"]), options(&[("owner", json!("app"))])).unwrap();
    assert_eq!(
        create.statement,
        "mysqladmin create --user=root --host=localhost --port=3306 shop && \
         mysql --user=root --host=localhost --port=3306 --execute=\"GRANT ALL ON shop.* TO 'app'@'localhost'\""
    );
    assert_eq!(create.options.comment.as_deref(), Some("create shop mysql database"));

    let dump = mysql::dump(&args(&["shop"]), Options::new()).unwrap();
    assert_eq!(
        dump.statement,
        "mysqldump --user=root --host=localhost --port=3306 --complete-inserts shop > shop.sql"
    );

    let exists = mysql::exists(&args(&["shop"]), Options::new()).unwrap();
    assert_eq!(exists.options.register.as_deref(), Some("shop_exists"));

    let grant = mysql::grant(
        &args(&["app"]),
        options(&[("database", json!("shop")), ("privileges", json!("SELECT")), ("host", json!("db"))]),
    )
    .unwrap();
    assert_eq!(
        grant.statement,
        "mysql --user=root --host=db --port=3306 --execute=\"GRANT SELECT ON shop.* TO 'app'@'db'\""
    );
}

#[test]
fn test_mysql_user() {
    let create = mysql::user(
        &args(&["app"]),
        options(&[("admin_pass", json!("s3cret")), ("password", json!("pw")), ("sudo", json!(true))]),
    )
    .unwrap();
    assert_eq!(
        create.statement,
        "mysql --user=root --password=\"s3cret\" --host=localhost --port=3306 \
         --execute=\"CREATE USER IF NOT EXISTS 'app'@'localhost' IDENTIFIED BY 'pw'\""
    );
    assert!(!create.options.sudo.enabled);

    let drop = mysql::user(&args(&["app"]), options(&[("op", json!("drop"))])).unwrap();
    assert_eq!(
        drop.statement,
        "mysql --user=root --host=localhost --port=3306 --execute=\"DROP USER IF EXISTS 'app'@'localhost'\""
    );
    assert!(matches!(mysql::user(&[], Options::new()), Err(Error::InvalidInput(_))));
}

#[test]
fn test_pgsql_builders() {
    let create = pgsql::create(&args(&["shop"]), options(&[("owner", json!("app"))])).unwrap();
    assert_eq!(create.statement, "createdb -U postgres --host=localhost --port=5432 --owner=\"app\" shop");

    let dump = pgsql::dump(&args(&["shop"]), Options::new()).unwrap();
    assert_eq!(
        dump.statement,
        "pg_dump -U postgres --host=localhost --port=5432 --column-inserts --dbname=\"shop\" --file=\"shop.sql\""
    );

    let exists = pgsql::exists(&args(&["shop"]), Options::new()).unwrap();
    assert_eq!(
        exists.statement,
        "psql -U postgres --host=localhost --port=5432 -lqt | cut -d \\| -f 1 | grep -qw shop"
    );
    assert_eq!(exists.options.register.as_deref(), Some("shop_exists"));
}

#[test]
fn test_pgsql_user() {
    let create = pgsql::user(
        &args(&["app"]),
        options(&[("admin_pass", json!("s3cret")), ("password", json!("pw"))]),
    )
    .unwrap();
    assert_eq!(
        create.statement,
        "export PGPASSWORD=\"s3cret\" && createuser -U postgres --host=localhost --port=5432 -DRS app && \
         export PGPASSWORD=\"s3cret\" && psql -U postgres --host=localhost --port=5432 \
         -c \"ALTER USER app WITH ENCRYPTED PASSWORD 'pw';\""
    );

    let exists = pgsql::user(&args(&["app"]), options(&[("op", json!("exists"))])).unwrap();
    assert_eq!(
        exists.statement,
        "psql -U postgres --host=localhost --port=5432 -c \"SELECT 1 FROM pg_roles WHERE rolname='app';\""
    );
    assert_eq!(exists.options.register.as_deref(), Some("pgsql_user_exists"));
    assert!(matches!(
        pgsql::user(&args(&["app"]), options(&[("op", json!("rename"))])),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_django_builders() {
    let dump = django::dump(&args(&["blog.Post"]), Options::new()).unwrap();
    assert_eq!(
        dump.statement,
        "./manage.py dumpdata --format=\"json\" --indent=4 blog.Post > ../deploy/fixtures/blog.Post.json"
    );

    let load = django::load(&args(&["blog"]), options(&[("format", json!("yaml"))])).unwrap();
    assert_eq!(load.statement, "./manage.py loaddata ../deploy/fixtures/blog.yaml");

    let check = django::check(&[], Options::new()).unwrap();
    assert_eq!(check.statement, "./manage.py check");
    assert_eq!(check.options.register.as_deref(), Some("django_checks_out"));

    let adhoc = django::django(&args(&["createsuperuser", "root"]), Options::new()).unwrap();
    assert_eq!(adhoc.statement, "./manage.py createsuperuser root");
    assert_eq!(
        adhoc.options.comment.as_deref(),
        Some("run createsuperuser django management command")
    );
}

#[test]
fn test_get_command_database_and_php() {
    let bare = |name: &str, values: &[&str]| {
        get_command(name, Profile::Ubuntu, &args(values), Options::new())
            .unwrap()
            .map(|command| command.get_statement(StatementFlags::bare()))
    };

    assert_eq!(bare("php.module", &["xml"]).as_deref(), Some("phpenmod xml"));
    assert_eq!(bare("django.static", &[]).as_deref(), Some("./manage.py collectstatic --noinput"));
    assert_eq!(
        bare("pgsql.drop", &["shop"]).as_deref(),
        Some("dropdb -U postgres --host=localhost --port=5432 shop")
    );
    assert_eq!(
        bare("mysql.load", &["shop", "shop.sql"]).as_deref(),
        Some("mysql --user=root --host=localhost --port=3306 shop < shop.sql")
    );
    assert!(bare("mysql.vacuum", &["shop"]).is_none());
}
