use std::fmt;
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy, Debug)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Numeric ID of a tweet.
    TweetId
);

id_type!(
    /// Numeric ID of a user account.
    UserId
);

/// Read IDs from a file, one per line. Blank lines are skipped.
pub fn load_ids<T>(path: impl AsRef<Path>) -> Result<Vec<T>>
where
    T: FromStr<Err = ParseIntError>,
{
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read id file {}", path.display()))?;
    parse_ids(&contents).with_context(|| format!("invalid id in {}", path.display()))
}

fn parse_ids<T>(contents: &str) -> Result<Vec<T>>
where
    T: FromStr<Err = ParseIntError>,
{
    contents
        .lines()
        .enumerate()
        .map(|(i, l)| (i, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .map(|(i, l)| {
            l.parse()
                .with_context(|| format!("line {}: {:?}", i + 1, l))
        })
        .collect()
}
