//! Name based construction of programmatic commands.

use log::warn;

use super::system::{self, Centos, Ubuntu};
use super::{
    django, messages, mysql, pgsql, php, posix, python, Command, CommandBuilder, ItemizedCommand,
    Prompt,
};
use crate::constants::TEMPLATE_COMMAND;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::registry::Profile;
use crate::statement::Statement;
use crate::template::TemplateCommand;

fn shared(name: &str) -> Option<CommandBuilder> {
    let builder: CommandBuilder = match name {
        "append" => posix::append,
        "archive" => posix::archive,
        "copy" => posix::copy,
        "dir" | "mkdir" => posix::dir,
        "extract" => posix::extract,
        "link" => posix::link,
        "move" => posix::move_path,
        "perms" => posix::perms,
        "remove" => posix::remove,
        "replace" => posix::replace,
        "rsync" | "push" => posix::rsync,
        "scopy" => posix::scopy,
        "sync" => posix::sync,
        "touch" => posix::touch,
        "wait" => posix::wait,
        "write" => posix::write,
        "dialog" => messages::dialog,
        "echo" => messages::echo,
        "explain" => messages::explain,
        "screenshot" => messages::screenshot,
        "slack" => messages::slack,
        "twist" => messages::twist,
        "pip" => python::pip,
        "pip_file" | "pipf" => python::pip_file,
        "virtualenv" => python::virtualenv,
        "django" => django::django,
        "django.check" => django::check,
        "django.dump" | "django.dumpdata" => django::dump,
        "django.load" | "django.loaddata" => django::load,
        "django.migrate" => django::migrate,
        "django.static" | "django.collectstatic" => django::collect_static,
        "mysql.create" => mysql::create,
        "mysql.drop" => mysql::drop,
        "mysql.dump" => mysql::dump,
        "mysql.exists" => mysql::exists,
        "mysql.grant" => mysql::grant,
        "mysql.load" => mysql::load,
        "mysql.user" => mysql::user,
        "pgsql.create" => pgsql::create,
        "pgsql.drop" => pgsql::drop,
        "pgsql.dump" => pgsql::dump,
        "pgsql.exists" => pgsql::exists,
        "pgsql.load" => pgsql::load,
        "pgsql.user" => pgsql::user,
        "php.module" => php::module,
        "reboot" => system::reboot,
        _ => return None,
    };
    Some(builder)
}

fn platform<P: system::Platform>(name: &str) -> Option<CommandBuilder> {
    let builder: CommandBuilder = match name {
        "install" => system::install::<P>,
        "uninstall" => system::uninstall::<P>,
        "update" => system::update::<P>,
        "upgrade" => system::upgrade::<P>,
        "reload" => system::reload::<P>,
        "restart" => system::restart::<P>,
        "start" => system::start::<P>,
        "stop" => system::stop::<P>,
        _ => return None,
    };
    Some(builder)
}

/// The builder registered under `name` for a profile.
pub fn builder(name: &str, profile: Profile) -> Option<CommandBuilder> {
    let specific = match profile {
        Profile::Ubuntu => platform::<Ubuntu>(name),
        Profile::Centos => platform::<Centos>(name),
    };
    specific.or_else(|| shared(name))
}

/// Constructs a command by name.
///
/// `template` yields a [`TemplateCommand`], `prompt` a [`Prompt`], and an
/// `items` option an [`ItemizedCommand`]. Unknown names are logged and
/// yield `None`.
///
/// # Errors
/// * `Error::InvalidInput` if the builder rejects its arguments
pub fn get_command(
    name: &str,
    profile: Profile,
    args: &[String],
    options: Options,
) -> Result<Option<Box<dyn Statement>>> {
    if name == TEMPLATE_COMMAND {
        let (source, target) = match args {
            [source, target, ..] => (source, target),
            _ => {
                return Err(Error::InvalidInput(
                    "template requires a source and a target".to_string(),
                ))
            }
        };
        return Ok(Some(Box::new(TemplateCommand::new(source, target, options))));
    }

    if name == "prompt" {
        return Ok(Some(Box::new(Prompt::from_options(args, options)?)));
    }

    let Some(builder) = builder(name, profile) else {
        warn!("Command does not exist: {name}");
        return Ok(None);
    };

    if let Some(items) = options.items.clone() {
        let command = ItemizedCommand::new(builder, items, args.to_vec(), options, name)?;
        return Ok(Some(Box::new(command)));
    }

    let command: Command = builder(args, options)?.with_name(name);
    Ok(Some(Box::new(command)))
}

/// A constructed command and its 1-based position in the script.
pub struct Numbered {
    pub number: usize,
    pub command: Box<dyn Statement>,
}

/// Constructs commands for `(name, args, options)` triples in order.
///
/// Unknown commands are skipped; numbering counts only constructed commands.
///
/// # Errors
/// * The first `Error::InvalidInput` raised by a builder
pub fn command_factory<I>(triples: I, profile: Profile) -> Result<Vec<Numbered>>
where
    I: IntoIterator<Item = (String, Vec<String>, Options)>,
{
    let mut commands = Vec::new();
    for (name, args, options) in triples {
        if let Some(command) = get_command(&name, profile, &args, options)? {
            commands.push(Numbered { number: commands.len() + 1, command });
        }
    }
    Ok(commands)
}
