// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::collections::HashMap;

use anyhow::{anyhow, Error};
use saphyr::{Hash, Yaml};
use saphyr_parser::{Event, EventReceiver, Parser, TScalarStyle, Tag};

use super::{GET_ATT, INTRINSIC_PREFIX, LOCAL_TAG_HANDLE, UNPREFIXED_INTRINSICS};

const CORE_TAG_HANDLES: [&str; 2] = ["tag:yaml.org,2002:", "!!"];

pub fn parse_yaml_str(input: &str) -> Result<Vec<Yaml>, Error> {
    let mut loader = Loader::default();
    let mut yaml_parser = Parser::new_from_str(input);
    yaml_parser.load(&mut loader, true)?;
    loader.finish()
}

#[derive(Default)]
struct Loader {
    docs: Vec<Yaml>,
    root: Option<Yaml>,
    frames: Vec<Frame>,
    anchors: HashMap<usize, Yaml>,
    error: Option<Error>,
}

// An open sequence or mapping.
struct Frame {
    node: Yaml,
    anchor_id: usize,
    intrinsic: Option<String>,
    pending_key: Option<Yaml>,
}

impl EventReceiver for Loader {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }

        if let Err(err) = self.handle_event(event) {
            self.error = Some(err);
        }
    }
}

impl Loader {
    fn finish(self) -> Result<Vec<Yaml>, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.docs),
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::DocumentStart => {
                self.root = None;
            }
            Event::DocumentEnd => {
                let doc = self.root.take().unwrap_or(Yaml::Null);
                self.docs.push(doc);
            }
            Event::SequenceStart(anchor_id, tag) => {
                self.open(Yaml::Array(Vec::new()), anchor_id, tag.as_ref())?;
            }
            Event::MappingStart(anchor_id, tag) => {
                self.open(Yaml::Hash(Hash::new()), anchor_id, tag.as_ref())?;
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.close()?;
            }
            Event::Scalar(value, style, anchor_id, tag) => {
                let node = parse_scalar(value, style, tag.as_ref())?;
                self.insert(node, anchor_id)?;
            }
            Event::Alias(anchor_id) => {
                let node = self
                    .anchors
                    .get(&anchor_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("yaml alias refers to an unknown anchor"))?;
                self.insert(node, 0)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn open(&mut self, node: Yaml, anchor_id: usize, tag: Option<&Tag>) -> Result<(), Error> {
        let intrinsic = match tag {
            Some(tag) if !is_core_tag(tag) => Some(intrinsic_name(tag)?),
            _ => None,
        };

        self.frames.push(Frame {
            node,
            anchor_id,
            intrinsic,
            pending_key: None,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| anyhow!("yaml collection closed before it was opened"))?;

        if frame.pending_key.is_some() {
            return Err(anyhow!("yaml mapping key has no value"));
        }

        let node = match frame.intrinsic {
            Some(name) => wrap_intrinsic(name, frame.node),
            None => frame.node,
        };
        self.insert(node, frame.anchor_id)
    }

    fn insert(&mut self, node: Yaml, anchor_id: usize) -> Result<(), Error> {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }

        let Some(frame) = self.frames.last_mut() else {
            self.root = Some(node);
            return Ok(());
        };

        match &mut frame.node {
            Yaml::Array(items) => items.push(node),
            Yaml::Hash(map) => match frame.pending_key.take() {
                Some(key) => {
                    map.insert(key, node);
                }
                None => frame.pending_key = Some(node),
            },
            _ => return Err(anyhow!("yaml node nested inside a scalar")),
        }
        Ok(())
    }
}

fn parse_scalar(value: String, style: TScalarStyle, tag: Option<&Tag>) -> Result<Yaml, Error> {
    match tag {
        None if style == TScalarStyle::Plain => Ok(Yaml::from_str(&value)),
        None => Ok(Yaml::String(value)),
        Some(tag) if is_core_tag(tag) => parse_core_scalar(value, &tag.suffix),
        Some(tag) => {
            let name = intrinsic_name(tag)?;
            let arg = match name.as_str() {
                GET_ATT => split_get_att(&value),
                _ => Yaml::String(value),
            };
            Ok(wrap_intrinsic(name, arg))
        }
    }
}

fn parse_core_scalar(value: String, suffix: &str) -> Result<Yaml, Error> {
    let yaml = match suffix {
        "str" => return Ok(Yaml::String(value)),
        "null" if value.is_empty() => return Ok(Yaml::Null),
        "bool" => match yaml11_bool(&value) {
            Some(flag) => return Ok(Yaml::Boolean(flag)),
            None => Yaml::from_str(&value),
        },
        "int" | "float" | "null" => Yaml::from_str(&value),
        _ => return Err(anyhow!("unsupported yaml tag: !!{}", suffix)),
    };

    let matches_tag = matches!(
        (suffix, &yaml),
        ("int", Yaml::Integer(_))
            | ("float", Yaml::Real(_))
            | ("float", Yaml::Integer(_))
            | ("bool", Yaml::Boolean(_))
            | ("null", Yaml::Null)
    );
    if !matches_tag {
        return Err(anyhow!("yaml value {:?} is not a valid !!{}", value, suffix));
    }

    // "!!float 1" must still read back as a float once emitted.
    match yaml {
        Yaml::Integer(number) if suffix == "float" => Ok(Yaml::Real(format!("{}.0", number))),
        yaml => Ok(yaml),
    }
}

// YAML 1.1 spellings accepted by CloudFormation tooling.
fn yaml11_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "on" | "true" => Some(true),
        "no" | "off" | "false" => Some(false),
        _ => None,
    }
}

fn is_core_tag(tag: &Tag) -> bool {
    CORE_TAG_HANDLES.contains(&tag.handle.as_str())
}

fn intrinsic_name(tag: &Tag) -> Result<String, Error> {
    if tag.handle != LOCAL_TAG_HANDLE || tag.suffix.is_empty() {
        return Err(anyhow!("unsupported yaml tag: {}{}", tag.handle, tag.suffix));
    }

    if UNPREFIXED_INTRINSICS.contains(&tag.suffix.as_str()) {
        Ok(tag.suffix.clone())
    } else {
        Ok(format!("{}{}", INTRINSIC_PREFIX, tag.suffix))
    }
}

fn wrap_intrinsic(name: String, arg: Yaml) -> Yaml {
    let mut map = Hash::new();
    map.insert(Yaml::String(name), arg);
    Yaml::Hash(map)
}

// "Resource.Attr.Sub" -> [Resource, "Attr.Sub"]
fn split_get_att(value: &str) -> Yaml {
    let parts = match value.split_once('.') {
        Some((resource, attribute)) => vec![
            Yaml::String(resource.to_string()),
            Yaml::String(attribute.to_string()),
        ],
        None => vec![Yaml::String(value.to_string())],
    };
    Yaml::Array(parts)
}
