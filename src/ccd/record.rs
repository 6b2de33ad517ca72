use std::{fs, io, path::Path};

use serde::Serialize;
use tracing::{debug, instrument};

use super::CcdError;

/// One client of the VPN server, as described by its file in the client config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub name: String,
    pub enabled: bool,
    pub static_address: String,
    pub static_netmask_or_peer: String,
}

impl UserRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            static_address: String::new(),
            static_netmask_or_peer: String::new(),
        }
    }
}

struct Directive {
    keyword: &'static str,
    /// Returns `false` when the arguments don't fit, leaving the record untouched.
    apply: fn(&mut UserRecord, &[&str]) -> bool,
}

const DIRECTIVES: &[Directive] = &[
    Directive {
        keyword: "ifconfig-push",
        apply: ifconfig_push,
    },
    Directive {
        keyword: "disable",
        apply: disable,
    },
];

fn ifconfig_push(record: &mut UserRecord, args: &[&str]) -> bool {
    match args {
        [local, remote] => {
            record.static_address = (*local).to_owned();
            record.static_netmask_or_peer = (*remote).to_owned();
            true
        }
        _ => false,
    }
}

fn disable(record: &mut UserRecord, _args: &[&str]) -> bool {
    record.enabled = false;
    true
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

/// Extracts the known directives from `content`. Unknown and malformed lines are ignored.
pub fn parse_str(name: &str, content: &str) -> UserRecord {
    let mut record = UserRecord::new(name);

    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let Some(directive) = DIRECTIVES.iter().find(|d| d.keyword == keyword) else {
            continue;
        };

        let args = tokens.take_while(|t| !is_comment(t)).collect::<Vec<_>>();
        if !(directive.apply)(&mut record, &args) {
            debug!("{name}: skipping malformed {keyword} on line {line_no}", line_no = n + 1);
        }
    }

    record
}

/// Reads the client config file at `path` and parses it into a record named `name`.
#[instrument]
pub fn parse(name: &str, path: &Path) -> Result<UserRecord, CcdError> {
    let meta = fs::metadata(path).map_err(CcdError::file(path))?;
    if !meta.is_file() {
        return Err(CcdError::FileUnreadable {
            path: path.to_owned(),
            source: io::Error::new(io::ErrorKind::Other, "not a regular file"),
        });
    }

    let bytes = fs::read(path).map_err(CcdError::file(path))?;

    Ok(parse_str(name, &String::from_utf8_lossy(&bytes)))
}
