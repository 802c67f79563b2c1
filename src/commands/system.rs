//! Package and service management, which differ per distribution.
//!
//! Builders are generic over a [`Platform`] so a single function yields the
//! `apt-get`/`service` form on Ubuntu and the `yum`/`systemctl` form on CentOS:
//! `system::install::<Ubuntu>` is an ordinary [`CommandBuilder`](super::CommandBuilder).

use super::{default_comment, required_arg, Command};
use crate::error::Result;
use crate::options::Options;

/// Distribution specific command syntax.
pub trait Platform {
    const INSTALL: &'static str;
    const UNINSTALL: &'static str;
    const UPDATE: &'static str;
    const UPGRADE: &'static str;
    const UPGRADE_PACKAGE: &'static str;

    fn service(action: &str, name: &str) -> String;
}

pub struct Ubuntu;

impl Platform for Ubuntu {
    const INSTALL: &'static str = "apt-get install -y";
    const UNINSTALL: &'static str = "apt-get remove -y";
    const UPDATE: &'static str = "apt-get update -y";
    const UPGRADE: &'static str = "apt-get upgrade -y";
    const UPGRADE_PACKAGE: &'static str = "apt-get install -y --only-upgrade";

    fn service(action: &str, name: &str) -> String {
        format!("service {name} {action}")
    }
}

pub struct Centos;

impl Platform for Centos {
    const INSTALL: &'static str = "yum install -y";
    const UNINSTALL: &'static str = "yum remove -y";
    const UPDATE: &'static str = "yum check-update";
    const UPGRADE: &'static str = "yum update -y";
    const UPGRADE_PACKAGE: &'static str = "yum update -y";

    fn service(action: &str, name: &str) -> String {
        format!("systemctl {action} {name}")
    }
}

pub fn install<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    let package = required_arg(args, 0, "install", "a package name")?;
    let options = default_comment(options, format!("install {package}"));
    Ok(Command::new(format!("{} {package}", P::INSTALL), options))
}

pub fn uninstall<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    let package = required_arg(args, 0, "uninstall", "a package name")?;
    let options = default_comment(options, format!("remove {package}"));
    Ok(Command::new(format!("{} {package}", P::UNINSTALL), options))
}

pub fn update<P: Platform>(_args: &[String], options: Options) -> Result<Command> {
    let options = default_comment(options, "update the package index".to_string());
    Ok(Command::new(P::UPDATE, options))
}

/// Upgrades one package when a name is given, otherwise the whole system.
pub fn upgrade<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    match args.first() {
        Some(package) => {
            let options = default_comment(options, format!("upgrade {package}"));
            Ok(Command::new(format!("{} {package}", P::UPGRADE_PACKAGE), options))
        }
        None => {
            let options = default_comment(options, "upgrade the system".to_string());
            Ok(Command::new(P::UPGRADE, options))
        }
    }
}

pub fn reboot(_args: &[String], options: Options) -> Result<Command> {
    let options = default_comment(options, "reboot the system".to_string());
    Ok(Command::new("reboot", options))
}

fn service<P: Platform>(action: &str, args: &[String], options: Options) -> Result<Command> {
    let name = required_arg(args, 0, action, "a service name")?;
    let options = default_comment(options, format!("{action} {name} service"));
    Ok(Command::new(P::service(action, name), options))
}

pub fn reload<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    service::<P>("reload", args, options)
}

pub fn restart<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    service::<P>("restart", args, options)
}

pub fn start<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    service::<P>("start", args, options)
}

pub fn stop<P: Platform>(args: &[String], options: Options) -> Result<Command> {
    service::<P>("stop", args, options)
}
