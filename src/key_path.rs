// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::fmt;

use anyhow::{anyhow, Error};
use saphyr::Yaml;

/// A sequence of nested mapping keys, e.g. `Metadata` / `AWS::CloudFormation::Interface`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn new<I, S>(segments: I) -> KeyPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Walks the path from `doc`, failing on the first missing key or non-mapping node.
    pub fn lookup<'a>(&self, doc: &'a Yaml) -> Result<&'a Yaml, Error> {
        let mut node = doc;
        for (depth, segment) in self.segments.iter().enumerate() {
            let Yaml::Hash(map) = node else {
                return Err(anyhow!(
                    "template has no `{}`: {} is not a mapping",
                    self,
                    self.describe_prefix(depth)
                ));
            };

            node = map
                .get(&Yaml::String(segment.clone()))
                .ok_or_else(|| anyhow!("template has no `{}`: missing key `{}`", self, segment))?;
        }
        Ok(node)
    }

    fn describe_prefix(&self, depth: usize) -> String {
        match depth {
            0 => "the document root".to_string(),
            _ => format!("`{}`", self.segments[..depth].join(".")),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
