use std::fs;

use tease::docs::{to_docs, DocFormat};
use tease::loader::{Loader, Step};
use tease::registry::Profile;
use tease::script::{to_script, write_output};
use tease::statement::{Statement, StatementFlags};
use tempfile::TempDir;

const STEPS: &str = "\
[intro]
explain: \"Set up the web server.\"
heading: web server

[home page]
screenshot: images/home.png
caption: Home page
width: 640

[install nginx]
install: nginx

[site config]
template: site.conf /etc/nginx/site.conf
domain: example.com

[mystery]
frobnicate: now
";

fn load_steps() -> (TempDir, Vec<Step>) {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("templates")).unwrap();
    fs::write(dir.path().join("templates").join("site.conf"), "server_name {{ domain }};").unwrap();
    let path = dir.path().join("steps.ini");
    fs::write(&path, STEPS).unwrap();

    let mut loader = Loader::new(&path, Profile::Ubuntu);
    loader.load().unwrap();
    let steps = loader.get_steps().unwrap();
    (dir, steps)
}

#[test]
fn test_script_output() {
    let (_dir, steps) = load_steps();

    assert_eq!(
        to_script(&steps),
        "#! /usr/bin/env bash\n\
         \n\
         # install nginx\n\
         apt-get install -y nginx\n\
         \n\
         # site config\n\
         if [[ -f /etc/nginx/site.conf ]]; then mv /etc/nginx/site.conf /etc/nginx/site.conf.b; fi;\n\
         cat > /etc/nginx/site.conf << EOF\n\
         server_name example.com;\n\
         EOF\n\
         \n\
         # mystery\n\
         # frobnicate: command not found\n"
    );
}

#[test]
fn test_screenshot_statement_is_image_path() {
    let (_dir, steps) = load_steps();
    assert_eq!(steps[1].name(), "screenshot");
    assert_eq!(steps[1].get_statement(StatementFlags::bare()), "images/home.png");
}

#[test]
fn test_markdown_docs() {
    let (_dir, steps) = load_steps();
    let docs = to_docs(&steps, DocFormat::Markdown);

    assert!(docs.starts_with("## Web Server\n\nSet up the web server.\n\n![Home page](images/home.png)\n\n"));
    assert!(docs.contains("Install nginx:\n\n```bash\napt-get install -y nginx\n```\n"));
    assert!(docs.contains("Site config:\n\n```conf\nserver_name example.com;\n```\n"));
    assert!(docs.contains("Mystery:\n\n```bash\n# frobnicate: command not found\n```\n"));
}

#[test]
fn test_rst_docs() {
    let (_dir, steps) = load_steps();
    let docs = to_docs(&steps, DocFormat::Rst);

    assert!(docs.starts_with("Web Server\n==========\n\nSet up the web server.\n"));
    assert!(docs.contains(".. figure:: images/home.png\n    :alt: Home page\n    :width: 640\n"));
    assert!(docs.contains(".. code-block:: bash\n\n    apt-get install -y nginx\n"));
    assert!(docs.contains(".. code-block:: conf\n\n    server_name example.com;\n"));
}

#[test]
fn test_plain_docs() {
    let (_dir, steps) = load_steps();
    let docs = to_docs(&steps, DocFormat::Plain);

    assert!(docs.starts_with("***** Web Server *****\n"));
    assert!(docs.contains("\nimages/home.png\n"));
    assert!(docs.contains("---\napt-get install -y nginx\n---"));
    assert!(docs.contains("+++\nserver_name example.com;\n+++"));
}

#[test]
fn test_write_output_creates_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("deploy.sh");

    write_output(&path, "#! /usr/bin/env bash\n").unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "#! /usr/bin/env bash\n");
}
