//! Command registry: per-profile tables of command templates and builders.
//!
//! A profile (`ubuntu`, `centos`) is a closed namespace mapping command names
//! to an [`Entry`]. Platform specific commands are merged with the shared
//! tables so the same step name produces `apt-get` on one profile and `yum`
//! on the other.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::snippet::Snippet;

mod centos;
mod django;
mod messages;
mod mysql;
mod pgsql;
mod php;
mod posix;
mod python;
mod ubuntu;

pub use django::django_parser;

/// Custom rendering strategy bound to a command family.
///
/// Receives the snippet and the (possibly itemized) positional arguments and
/// returns the inline statement.
pub type Parser = fn(&Snippet, &[String]) -> Result<String>;

/// Programmatic statement builder.
///
/// Builders validate their input; an `Err` is raised when the step is
/// resolved, not when it is rendered.
pub type Builder = fn(&[String], &Options) -> Result<String>;

/// Literal template content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A single template string.
    Text(String),
    /// Template fragments rendered one by one; non-empty outputs are joined with a space.
    Fragments(Vec<String>),
}

/// What a snippet renders from.
#[derive(Clone)]
pub enum Body {
    Literal(Content),
    Builder(Builder),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Literal(content) => f.debug_tuple("Literal").field(content).finish(),
            Body::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

/// A group of sub-commands such as `apache.reload` or `mysql.user.create`.
#[derive(Clone, Default)]
pub struct Family {
    pub entries: IndexMap<String, Entry>,
    pub parser: Option<Parser>,
    /// Sub-command used for ad hoc invocations whose name is not in `entries`.
    pub default: Option<String>,
}

impl Family {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            parser: None,
            default: None,
        }
    }

    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A registry value.
#[derive(Clone)]
pub enum Entry {
    Literal(Content),
    Family(Family),
    Builder(Builder),
}

impl Entry {
    pub fn text(template: impl Into<String>) -> Self {
        Entry::Literal(Content::Text(template.into()))
    }

    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Entry::Literal(Content::Fragments(fragments.into_iter().map(Into::into).collect()))
    }

    pub fn family<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        Entry::Family(Family::new(entries))
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Literal(content) => f.debug_tuple("Literal").field(content).finish(),
            Entry::Family(family) => {
                f.debug_list().entries(family.entries.keys()).finish()
            }
            Entry::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

/// Command names of one profile.
pub type Table = IndexMap<String, Entry>;

/// Supported platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Ubuntu,
    Centos,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Ubuntu, Profile::Centos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Ubuntu => "ubuntu",
            Profile::Centos => "centos",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ubuntu" => Ok(Profile::Ubuntu),
            "centos" => Ok(Profile::Centos),
            _ => Err(Error::UnknownProfile { profile: s.to_string() }),
        }
    }
}

/// Merges tables left to right; later tables overwrite earlier keys.
pub fn merge<I>(tables: I) -> Table
where
    I: IntoIterator<Item = Table>,
{
    let mut merged = Table::new();
    for table in tables {
        merged.extend(table);
    }
    merged
}

/// Read-only lookup structure over all profiles.
#[derive(Debug, Clone)]
pub struct Registry {
    profiles: IndexMap<Profile, Table>,
}

impl Registry {
    /// An empty registry, mostly useful for tests and custom tables.
    pub fn empty() -> Self {
        Self { profiles: IndexMap::new() }
    }

    pub fn with_table(mut self, profile: Profile, table: Table) -> Self {
        self.profiles.insert(profile, table);
        self
    }

    pub fn table(&self, profile: Profile) -> Option<&Table> {
        self.profiles.get(&profile)
    }

    /// Resolves a possibly dotted command name.
    ///
    /// The name is tried as a direct key first. Failing that, the leading
    /// segment selects a family and the remainder is resolved inside it.
    pub fn lookup(&self, profile: Profile, name: &str) -> Option<&Entry> {
        self.table(profile).and_then(|table| lookup_in(table, name))
    }

    /// Parser of the family at the root of a dotted name.
    pub fn family_parser(&self, profile: Profile, name: &str) -> Option<Parser> {
        let root = name.split('.').next()?;
        match self.table(profile)?.get(root)? {
            Entry::Family(family) => family.parser,
            _ => None,
        }
    }
}

impl Default for Registry {
    /// The built-in tables for every supported profile.
    fn default() -> Self {
        let shared = || {
            [
                django::table(),
                messages::table(),
                mysql::table(),
                pgsql::table(),
                php::table(),
                posix::table(),
                python::table(),
            ]
        };

        let ubuntu = merge(std::iter::once(ubuntu::table()).chain(shared()));
        let centos = merge(std::iter::once(centos::table()).chain(shared()));

        Self::empty().with_table(Profile::Ubuntu, ubuntu).with_table(Profile::Centos, centos)
    }
}

fn lookup_in<'a>(table: &'a Table, name: &str) -> Option<&'a Entry> {
    if let Some(entry) = table.get(name) {
        return Some(entry);
    }

    let (head, rest) = name.split_once('.')?;
    match table.get(head)? {
        Entry::Family(family) => lookup_in(&family.entries, rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("Ubuntu".parse::<Profile>().unwrap(), Profile::Ubuntu);
        assert!(matches!("arch".parse::<Profile>(), Err(Error::UnknownProfile { .. })));
    }

    #[test]
    fn test_merge_later_wins() {
        let first: Table = [("run".to_string(), Entry::text("a"))].into_iter().collect();
        let second: Table = [("run".to_string(), Entry::text("b"))].into_iter().collect();
        let merged = merge([first, second]);
        assert!(matches!(&merged["run"], Entry::Literal(Content::Text(t)) if t == "b"));
    }
}
