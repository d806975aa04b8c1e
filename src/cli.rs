use std::{
    fmt, fs,
    io::{self, Read},
    path::PathBuf,
    str::FromStr,
};

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log what happens to each entry and link (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sort the entries of a bibliography by one or more fields
    Sort {
        #[arg(value_name = "INPUT")]
        from: Source,
        /// Field to sort by; repeat for secondary keys. `entrytype` sorts by entry type
        #[arg(short, long = "field", value_name = "FIELD", required = true)]
        fields: Vec<String>,
        /// Reverse the order of every field
        #[arg(short, long)]
        reverse: bool,
        /// Print only the citation keys
        #[arg(long)]
        keys: bool,
        /// Print the citation keys as a JSON array
        #[arg(long, conflicts_with = "keys")]
        json: bool,
    },
    /// Unwrap search-engine redirect links to their destination
    Clean {
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },
    /// Normalize links: drop \url{} wrappers, resolve DOIs, escape unsafe characters
    Sanitize {
        #[arg(value_name = "LINK", required = true)]
        links: Vec<String>,
    },
}

#[derive(Clone, Debug)]
/// Where a bibliography is read from: standard input (`-`) or a file.
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn read_to_string(&self) -> io::Result<String> {
        match self {
            Source::Stdin => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
            Source::File(path) => fs::read_to_string(path),
        }
    }
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Source::Stdin);
        }
        fs::canonicalize(s)
            .map(Source::File)
            .map_err(|e| format!("cannot open `{s}`: {e}"))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn from_str_identifies_existing_file() {
        let tmp = NamedTempFile::new().expect("tmp file");
        let path = tmp.path().to_path_buf();
        let src = Source::from_str(path.to_str().unwrap()).expect("parse");
        match src {
            Source::File(p) => {
                let can = std::fs::canonicalize(&path).unwrap();
                assert_eq!(p, can);
            }
            _ => panic!("expected file source"),
        }
    }

    #[test]
    fn dash_means_stdin() {
        assert!(matches!(Source::from_str("-"), Ok(Source::Stdin)));
    }

    #[test]
    fn from_str_rejects_missing_files() {
        proptest::proptest!(|(s in "[A-Za-z0-9._]{1,32}")| {
            let path = PathBuf::from(&s);
            proptest::prop_assume!(!path.exists());
            let err = Source::from_str(&s).unwrap_err();
            proptest::prop_assert!(err.contains(&s));
        })
    }

    #[test]
    fn sort_requires_a_field() {
        let parsed = Cli::try_parse_from(["bibkit", "sort", "-"]);
        assert!(parsed.is_err());

        let parsed =
            Cli::try_parse_from(["bibkit", "sort", "-", "-f", "year", "--field", "author", "-r"])
                .expect("parse");
        match parsed.command {
            Command::Sort {
                fields, reverse, ..
            } => {
                assert_eq!(fields, ["year", "author"]);
                assert!(reverse);
            }
            _ => panic!("expected sort"),
        }
    }
}
