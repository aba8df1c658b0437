// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Loads CloudFormation templates, expanding short-form intrinsic function tags,
// and emits documents with those intrinsics folded back into short form.


mod emitter;
mod loader;

use anyhow::{anyhow, Error};
use saphyr::Yaml;

pub use emitter::emit_yaml_str;
pub use loader::parse_yaml_str;

const LOCAL_TAG_HANDLE: &str = "!";

// Short-form tags that keep their name instead of gaining the "Fn::" prefix.
const UNPREFIXED_INTRINSICS: [&str; 2] = ["Ref", "Condition"];
const INTRINSIC_PREFIX: &str = "Fn::";
const GET_ATT: &str = "Fn::GetAtt";

pub fn parse_template_str(input: &str) -> Result<Yaml, Error> {
    let docs = parse_yaml_str(input)?;
    match <[Yaml; 1]>::try_from(docs) {
        Ok([doc]) => Ok(doc),
        Err(docs) if docs.is_empty() => Err(anyhow!("template is empty")),
        Err(_) => Err(anyhow!("template must contain a single yaml document")),
    }
}
