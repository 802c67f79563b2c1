use super::{Entry, Table};

pub fn table() -> Table {
    let php = Entry::family([("module", Entry::text("phpenmod {{ args[0] }}"))]);
    [("php".to_string(), php)].into_iter().collect()
}
