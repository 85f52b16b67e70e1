//! CLI command for hashing user names

use crate::formats::common::{hash_name, lookup_name};

pub fn execute(names: &[String]) {
    for name in names {
        let hash = hash_name(name);
        let known = if lookup_name(hash).is_some() { "" } else { "  (not in dictionary)" };
        println!("{hash:>10}  {hash:#010x}  {name}{known}");
    }
}
