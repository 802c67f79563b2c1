//! File system commands.

use std::path::Path;

use serde_json::Value;

use super::{default_comment, required_arg, required_option, Command};
use crate::error::Result;
use crate::options::{stringify, Options};

pub fn append(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "append", "a path")?;
    let content = options.get_str("content").unwrap_or_default();
    let options = default_comment(options, format!("append to {path}"));
    Ok(Command::new(format!(r#"echo "{content}" >> {path}"#), options))
}

/// `tar` switches shared by archive and extract.
fn tar(base: &str, options: &Options) -> Vec<String> {
    let mut switches = base.to_string();
    if options.get_bool("absolute", false) {
        switches.push('P');
    }
    if options.get_bool("view", false) {
        switches.push('v');
    }

    let mut tokens = vec!["tar".to_string(), switches];
    if let Some(exclude) = options.get_str("exclude") {
        tokens.push(format!("--exclude {exclude}"));
    }
    if let Some(strip) = options.get_str("strip") {
        tokens.push(format!("--strip-components {strip}"));
    }
    tokens
}

pub fn archive(args: &[String], options: Options) -> Result<Command> {
    let from = required_arg(args, 0, "archive", "a path to archive")?;
    let to = options.get_str("to").unwrap_or_else(|| ".".to_string());
    let file_name = options.get_str("file_name").unwrap_or_else(|| "archive.tgz".to_string());

    let mut tokens = tar("-cz", &options);
    tokens.push(format!("-f {to}/{file_name} {from}"));
    let options = default_comment(options, format!("archive {from}"));
    Ok(Command::new(tokens.join(" "), options))
}

pub fn copy(args: &[String], options: Options) -> Result<Command> {
    let from = required_arg(args, 0, "copy", "a source path")?;
    let to = required_arg(args, 1, "copy", "a target path")?;

    let mut tokens = vec!["cp"];
    if !options.get_bool("overwrite", false) {
        tokens.push("-n");
    }
    if options.get_bool("recursive", false) {
        tokens.push("-R");
    }
    tokens.extend([from, to]);

    let options = default_comment(options, format!("copy {from} to {to}"));
    Ok(Command::new(tokens.join(" "), options))
}

pub fn dir(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "dir", "a path")?;
    let recursive = options.get_bool("recursive", true);
    let flag = if recursive { " -R" } else { "" };

    let mut tokens = vec!["mkdir".to_string()];
    if let Some(mode) = options.get_str("mode") {
        tokens.push(format!("-m {mode}"));
    }
    if recursive {
        tokens.push("-p".to_string());
    }
    tokens.push(path.to_string());
    if let Some(group) = options.get_str("group") {
        tokens.push(format!("&& chgrp{flag} {group} {path}"));
    }
    if let Some(owner) = options.get_str("owner") {
        tokens.push(format!("&& chown{flag} {owner} {path}"));
    }

    let options = default_comment(options, format!("create directory {path}"));
    Ok(Command::new(tokens.join(" "), options))
}

pub fn extract(args: &[String], options: Options) -> Result<Command> {
    let from = required_arg(args, 0, "extract", "an archive path")?;
    let to = options.get_str("to").unwrap_or_else(|| "./".to_string());

    let mut tokens = tar("-xz", &options);
    tokens.push(format!("-f {from} {to}"));
    let options = default_comment(options, format!("extract {from}"));
    Ok(Command::new(tokens.join(" "), options))
}

/// Links `args[0]`; the target defaults to the base name of the source.
pub fn link(args: &[String], options: Options) -> Result<Command> {
    let source = required_arg(args, 0, "link", "a source path")?;
    let target = match args.get(1) {
        Some(target) => target.clone(),
        None => options.get_str("target").unwrap_or_else(|| {
            Path::new(source)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.to_string())
        }),
    };

    let mut tokens = vec!["ln -s"];
    if options.get_bool("force", false) {
        tokens.push("-f");
    }
    tokens.extend([source, target.as_str()]);

    let statement = tokens.join(" ");
    let options = default_comment(options, format!("link to {source}"));
    Ok(Command::new(statement, options))
}

pub fn move_path(args: &[String], options: Options) -> Result<Command> {
    let from = required_arg(args, 0, "move", "a source path")?;
    let to = required_arg(args, 1, "move", "a target path")?;
    let options = default_comment(options, format!("move {from} to {to}"));
    Ok(Command::new(format!("mv {from} {to}"), options))
}

/// `chgrp`, `chown` and `chmod` chained for whichever of group, owner and mode is set.
pub fn perms(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "perms", "a path")?;
    let flag = if options.get_bool("recursive", false) { " -R" } else { "" };

    let statements: Vec<String> = [("chgrp", "group"), ("chown", "owner"), ("chmod", "mode")]
        .into_iter()
        .filter_map(|(program, key)| {
            options.get_str(key).map(|value| format!("{program}{flag} {value} {path}"))
        })
        .collect();

    let options = default_comment(options, format!("set permissions on {path}"));
    Ok(Command::new(statements.join(" && "), options))
}

pub fn remove(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "remove", "a path")?;

    let mut tokens = vec!["rm"];
    if options.get_bool("force", false) {
        tokens.push("-f");
    }
    if options.get_bool("recursive", false) {
        tokens.push("-r");
    }
    tokens.push(path);

    let statement = tokens.join(" ");
    let options = default_comment(options, format!("remove {path}"));
    Ok(Command::new(statement, options))
}

pub fn replace(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "replace", "a path")?;
    let find = required_option(&options, "find", "replace")?;
    let sub = options.get_str("sub").or_else(|| options.get_str("replace")).unwrap_or_default();
    let backup = options.get_str("backup").unwrap_or_else(|| ".b".to_string());
    let d = options.get_str("delimiter").unwrap_or_else(|| "/".to_string());

    let statement = format!("sed -i {backup} 's{d}{find}{d}{sub}{d}g' {path}");
    let options = default_comment(options, format!("find and replace in {path}"));
    Ok(Command::new(statement, options))
}

/// `rsync`, over ssh when `host`, `key_file` and `user` are all given.
pub fn rsync(args: &[String], options: Options) -> Result<Command> {
    let source = required_arg(args, 0, "rsync", "a source path")?;
    let target = required_arg(args, 1, "rsync", "a target path")?;

    let mut tokens = sync_tokens(source, &options);
    let remote = (options.get_str("host"), options.get_str("key_file"), options.get_str("user"));
    match remote {
        (Some(host), Some(key_file), Some(user)) => {
            let port = options.get("port").map(|p| stringify(&p)).unwrap_or_else(|| "22".into());
            tokens.push(format!(r#"-e "ssh -i {key_file} -p {port}""#));
            tokens.push(format!("{user}@{host}:{target}"));
        }
        _ => tokens.push(target.to_string()),
    }

    let options = default_comment(options, format!("sync {source} with {target}"));
    Ok(Command::new(tokens.join(" "), options))
}

/// Copies to a remote host with `scp`. A `host` option is required.
pub fn scopy(args: &[String], options: Options) -> Result<Command> {
    let from = required_arg(args, 0, "scopy", "a source path")?;
    let to = required_arg(args, 1, "scopy", "a target path")?;
    let host = required_option(&options, "host", "scopy")?;

    let mut tokens = vec!["scp".to_string()];
    if let Some(key_file) = options.get_str("key_file") {
        tokens.push(format!("-i {key_file}"));
    }
    let port = options.get("port").map(|p| stringify(&p)).unwrap_or_else(|| "22".into());
    tokens.push(format!("-P {port}"));
    tokens.push(from.to_string());
    match options.get_str("user") {
        Some(user) => tokens.push(format!("{user}@{host}:{to}")),
        None => tokens.push(format!("{host}:{to}")),
    }

    let mut options = default_comment(options, format!("copy {from} to remote {to}"));
    // scp runs as the invoking user so its ssh keys are found.
    options.set("sudo", Value::Bool(false));
    Ok(Command::new(tokens.join(" "), options))
}

pub fn sync(args: &[String], options: Options) -> Result<Command> {
    let source = required_arg(args, 0, "sync", "a source path")?;
    let target = required_arg(args, 1, "sync", "a target path")?;

    let mut tokens = sync_tokens(source, &options);
    tokens.push(target.to_string());

    let options = default_comment(options, format!("sync {source} with {target}"));
    Ok(Command::new(tokens.join(" "), options))
}

fn sync_tokens(source: &str, options: &Options) -> Vec<String> {
    let mut tokens: Vec<String> = ["rsync", "--cvs-exclude", "--checksum", "--compress"]
        .into_iter()
        .map(String::from)
        .collect();
    if options.get_bool("links", true) {
        tokens.push("--copy-links".into());
    }
    if options.get_bool("delete", false) {
        tokens.push("--delete".into());
    }
    if let Some(exclude) = options.get_str("exclude") {
        tokens.push(format!("--exclude-from={exclude}"));
    }
    // --partial and --progress
    tokens.push("-P".into());
    if options.get_bool("recursive", true) {
        tokens.push("--recursive".into());
    }
    tokens.push(source.to_string());
    tokens
}

pub fn touch(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "touch", "a path")?;
    let options = default_comment(options, format!("touch {path}"));
    Ok(Command::new(format!("touch {path}"), options))
}

pub fn wait(args: &[String], options: Options) -> Result<Command> {
    let seconds = required_arg(args, 0, "wait", "a number of seconds")?;
    let options = default_comment(options, format!("pause for {seconds} seconds"));
    Ok(Command::new(format!("sleep {seconds}"), options))
}

/// Writes `content` to a file; multi-line content goes through a heredoc.
pub fn write(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "write", "a path")?;
    let content = options.get_str("content").unwrap_or_default();

    let statement = if content.contains('\n') {
        format!("cat > {path} << EOF\n{content}\nEOF")
    } else {
        format!(r#"echo "{content}" > {path}"#)
    };

    let options = default_comment(options, format!("write to {path}"));
    Ok(Command::new(statement, options))
}
