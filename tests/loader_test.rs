use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tease::context::{Context, Variable};
use tease::error::Error;
use tease::loader::{filter_steps, Loader, Step};
use tease::options::Options;
use tease::registry::{Profile, Registry};
use tease::statement::{Statement, StatementFlags};
use tempfile::TempDir;

fn write_steps(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn load(path: &Path, profile: Profile) -> Vec<Step> {
    let mut loader = Loader::new(path, profile);
    loader.load().unwrap();
    loader.get_steps().unwrap()
}

fn statement(step: &Step) -> String {
    step.get_statement(StatementFlags::default())
}

#[test]
fn test_ini_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.ini",
        "[make app dir]\ndir: /opt/app\nmode: 755\ngroup: www\nowner: deploy\n",
    );

    let steps = load(&path, Profile::Ubuntu);
    assert_eq!(steps.len(), 1);
    assert_eq!(
        statement(&steps[0]),
        "# make app dir\nmkdir -m 755 -p /opt/app && chgrp -R www /opt/app && chown -R deploy /opt/app"
    );
}

#[test]
fn test_raw_steps() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.ini",
        "[say hello]\necho: \"hello world\"\n_note: ignored\nsudo: yes\nenv: live, staging\n",
    );

    let mut loader = Loader::new(&path, Profile::Ubuntu);
    assert!(!loader.is_loaded());
    loader.load().unwrap();
    assert!(loader.is_loaded());

    let raw = &loader.steps()[0];
    assert_eq!(raw.name, "echo");
    assert_eq!(raw.args, ["hello world"]);
    assert_eq!(raw.options.comment.as_deref(), Some("say hello"));
    assert!(raw.options.sudo.enabled);
    assert_eq!(raw.options.environments, ["live", "staging"]);
    assert!(!raw.options.contains("_note"));
}

#[test]
fn test_yaml_itemized_install() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.yml",
        "- install packages:\n    install: $item\n    items: [git, curl, nginx]\n",
    );

    let steps = load(&path, Profile::Ubuntu);
    assert!(steps[0].is_itemized());
    assert_eq!(
        statement(&steps[0]),
        "# install packages\napt-get install -y git\napt-get install -y curl\napt-get install -y nginx"
    );

    let steps = load(&path, Profile::Centos);
    let without_comment = StatementFlags { include_comment: false, ..StatementFlags::default() };
    let lines: Vec<String> =
        steps[0].get_statement(without_comment).lines().map(String::from).collect();
    assert_eq!(lines, ["yum install -y git", "yum install -y curl", "yum install -y nginx"]);
}

#[test]
fn test_family_resolved_from_first_argument() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.ini",
        "[reload apache]\napache: reload\n\n[enable rewrite]\napache: enable mod_rewrite\n\n[drop db user]\npgsql: user drop olduser\n",
    );

    let steps = load(&path, Profile::Ubuntu);
    assert_eq!(steps[0].name(), "apache.reload");
    assert_eq!(statement(&steps[0]), "# reload apache\nservice apache2 reload");
    assert_eq!(statement(&steps[1]), "# enable rewrite\na2enmod mod_rewrite");
    assert_eq!(steps[2].name(), "pgsql.user.drop");
    assert_eq!(
        statement(&steps[2]),
        "# drop db user\ndropuser -U postgres --host=localhost --port=5432 olduser"
    );
}

#[test]
fn test_dotted_fallback_resolution() {
    let loader = Loader::new("steps.ini", Profile::Ubuntu);

    let step = loader.find_snippet("apache.reload", vec![], Options::new()).unwrap();
    assert!(step.is_valid());
    assert_eq!(step.get_statement(StatementFlags::bare()), "service apache2 reload");

    let step = loader
        .find_snippet("mysql.user.drop", vec!["bob".to_string()], Options::new())
        .unwrap();
    assert!(step.is_valid());

    let step = loader.find_snippet("apache.explode", vec![], Options::new()).unwrap();
    assert!(!step.is_valid());
    assert_eq!(step.get_statement(StatementFlags::bare()), "# apache.explode: command not found");
}

#[test]
fn test_unknown_command_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(&dir, "steps.ini", "[first]\nfrobnicate: now\n\n[second]\ntouch: /tmp/ok\n");

    let steps = load(&path, Profile::Ubuntu);
    assert_eq!(steps.len(), 2);
    assert!(!steps[0].is_valid());
    assert_eq!(statement(&steps[0]), "# first\n# frobnicate: command not found");
    assert_eq!(statement(&steps[1]), "# second\ntouch /tmp/ok");
}

#[test]
fn test_django_commands() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.ini",
        "[migrate]\ndjango: migrate\n\n\
         [superuser]\ndjango: createsuperuser\nno_input: yes\nusername: admin\n\n\
         [dump posts]\ndjango: dumpdata\napp: blog\nmodel: Post\n\n\
         [load fixtures]\ndjango: loaddata\napp: blog\n\n\
         [plain flags]\ndjango: check\ndeploy: yes\nfail_level: no\n",
    );

    let steps = load(&path, Profile::Ubuntu);
    let bare: Vec<String> = steps.iter().map(|s| s.get_statement(StatementFlags::bare())).collect();
    assert_eq!(bare[0], "./manage.py migrate");
    assert_eq!(bare[1], "./manage.py createsuperuser --no-input --username=admin");
    assert_eq!(bare[2], "./manage.py dumpdata blog.Post > fixtures/blog/post.json");
    assert_eq!(bare[3], "./manage.py loaddata fixtures/blog/initial.json");
    assert_eq!(bare[4], "./manage.py check --deploy");
}

#[test]
fn test_context_pre_renders_steps_file() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(&dir, "steps.ini", "[get the site]\nrun: \"curl https://{{ domain }}/\"\n");

    let mut context = Context::new();
    context.add(Variable::new("domain", json!("example.com")));

    let mut loader = Loader::new(&path, Profile::Ubuntu).with_context(context);
    loader.load().unwrap();
    let steps = loader.get_steps().unwrap();
    assert_eq!(loader.steps()[0].args, ["curl https://example.com/"]);
    assert_eq!(steps[0].get_statement(StatementFlags::bare()), "curl https://example.com/");
}

#[test]
fn test_global_options_are_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.ini",
        "[as root]\ntouch: /tmp/a\n\n[as deploy]\ntouch: /tmp/b\nsudo: deploy\n",
    );

    let mut loader = Loader::new(&path, Profile::Ubuntu)
        .with_options(Options::from_map([("sudo".to_string(), json!(true))]));
    loader.load().unwrap();
    let steps = loader.get_steps().unwrap();

    assert_eq!(steps[0].get_statement(StatementFlags::bare()), "sudo -u root touch /tmp/a");
    assert_eq!(steps[1].get_statement(StatementFlags::bare()), "sudo -u deploy touch /tmp/b");
}

#[test]
fn test_templates_dir_is_first_location() {
    let loader = Loader::new("/srv/project/steps.ini", Profile::Ubuntu).with_locations(["/etc/tease"]);
    assert_eq!(
        loader.locations(),
        [Path::new("/srv/project/templates").to_path_buf(), Path::new("/etc/tease").to_path_buf()]
    );
}

#[test]
fn test_load_failures() {
    let dir = TempDir::new().unwrap();

    let mut loader = Loader::new(dir.path().join("missing.ini"), Profile::Ubuntu);
    assert!(matches!(loader.load(), Err(Error::LoadError { .. })));

    let path = write_steps(&dir, "steps.txt", "[x]\ntouch: /tmp/x\n");
    let mut loader = Loader::new(&path, Profile::Ubuntu);
    assert!(matches!(loader.load(), Err(Error::LoadError { .. })));

    let path = write_steps(&dir, "broken.ini", "touch: /tmp/x\n");
    let mut loader = Loader::new(&path, Profile::Ubuntu);
    assert!(matches!(loader.load(), Err(Error::LoadError { .. })));
    assert!(!loader.is_loaded());

    let path = write_steps(&dir, "steps.ini", "[x]\ntouch: /tmp/x\n");
    let mut loader =
        Loader::new(&path, Profile::Centos).with_registry(Arc::new(Registry::empty()));
    assert!(matches!(loader.load(), Err(Error::UnknownProfile { .. })));
}

#[test]
fn test_invalid_input_propagates() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(&dir, "steps.ini", "[notify]\nslack: \"deployed\"\n");
    let mut loader = Loader::new(&path, Profile::Ubuntu);
    loader.load().unwrap();
    assert!(matches!(loader.get_steps(), Err(Error::InvalidInput(_))));

    let path = write_steps(&dir, "template.ini", "[config]\ntemplate: only-source.conf\n");
    let mut loader = Loader::new(&path, Profile::Ubuntu);
    loader.load().unwrap();
    assert!(matches!(loader.get_steps(), Err(Error::InvalidInput(_))));
}

#[test]
fn test_slack_with_url() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.ini",
        "[notify]\nslack: \"deployed\"\nurl: https://hooks.slack.com/services/T0/B0/X\n",
    );
    let steps = load(&path, Profile::Ubuntu);
    assert_eq!(
        steps[0].get_statement(StatementFlags::bare()),
        r#"curl -X POST -H 'Content-type: application/json' --data '{"text": "deployed"}' https://hooks.slack.com/services/T0/B0/X"#
    );
}

#[test]
fn test_filter_steps() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(
        &dir,
        "steps.yml",
        "- anywhere:\n    touch: /tmp/a\n    tags: web\n\
         - live only:\n    touch: /tmp/b\n    env: live\n    tags: [web, db]\n\
         - staging only:\n    touch: /tmp/c\n    env: staging\n",
    );
    let steps = load(&path, Profile::Ubuntu);

    let live = vec!["live".to_string()];
    let names: Vec<String> = filter_steps(steps.clone(), Some(live.as_slice()), None)
        .iter()
        .filter_map(|s| s.comment().map(String::from))
        .collect();
    assert_eq!(names, ["anywhere", "live only"]);

    let db = vec!["db".to_string()];
    let kept = filter_steps(steps, None, Some(db.as_slice()));
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].comment(), Some("live only"));
}

#[test]
fn test_php_module() {
    let dir = TempDir::new().unwrap();
    let path = write_steps(&dir, "steps.ini", "[enable xml]\nphp.module: xml\n\n[enable gd]\nphp: module gd\n");

    let steps = load(&path, Profile::Centos);
    assert_eq!(steps[0].get_statement(StatementFlags::bare()), "phpenmod xml");
    assert_eq!(steps[1].get_statement(StatementFlags::bare()), "phpenmod gd");
}

#[test]
fn test_global_context_wins_in_templates() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("templates")).unwrap();
    fs::write(dir.path().join("templates").join("env"), "MODE={{ mode }}").unwrap();
    let path = write_steps(&dir, "steps.ini", "[write env]\ntemplate: env /srv/.env\nmode: step\nbackup: no\n");

    let mut context = Context::new();
    context.add(Variable::new("mode", json!("global")));

    let mut loader = Loader::new(&path, Profile::Ubuntu).with_context(context);
    loader.load().unwrap();
    let steps = loader.get_steps().unwrap();
    assert_eq!(
        steps[0].get_statement(StatementFlags::bare()),
        "cat > /srv/.env << EOF\nMODE=global\nEOF"
    );
}
