// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use anyhow::Error;
use saphyr::{Hash, Yaml, YamlEmitter};

use super::{GET_ATT, INTRINSIC_PREFIX, LOCAL_TAG_HANDLE, UNPREFIXED_INTRINSICS};

const INDENT: &str = "  ";

/// Emits one document in block style, without a document start marker.
///
/// Layout follows saphyr's `YamlEmitter` (compact sequences of mappings, two space
/// indent, `[]`/`{}` for empty collections). Scalars are rendered by saphyr itself so
/// quoting stays identical. Single-key `Ref`, `Condition` and `Fn::*` mappings are
/// written as short-form tags (`!Ref Env`, `!GetAtt Vpc.CidrBlock`), except directly
/// under another short-form tag where YAML allows only one tag per node.
pub fn emit_yaml_str(doc: &Yaml) -> Result<String, Error> {
    let mut emitter = BlockEmitter {
        out: String::new(),
        level: -1,
    };
    emitter.emit_node(doc)?;
    Ok(emitter.out)
}

struct BlockEmitter {
    out: String,
    level: isize,
}

impl BlockEmitter {
    fn emit_node(&mut self, node: &Yaml) -> Result<(), Error> {
        match node {
            Yaml::Array(items) => self.emit_array(items),
            Yaml::Hash(map) => self.emit_hash(map),
            _ => self.emit_scalar(node),
        }
    }

    fn emit_array(&mut self, items: &[Yaml]) -> Result<(), Error> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }

        self.level += 1;
        for (cnt, item) in items.iter().enumerate() {
            if cnt > 0 {
                self.newline_indent(self.level);
            }
            self.out.push('-');
            self.emit_val(true, item)?;
        }
        self.level -= 1;
        Ok(())
    }

    fn emit_hash(&mut self, map: &Hash) -> Result<(), Error> {
        if map.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }

        self.level += 1;
        for (cnt, (key, value)) in map.iter().enumerate() {
            if cnt > 0 {
                self.newline_indent(self.level);
            }

            if matches!(key, Yaml::Array(_) | Yaml::Hash(_)) {
                self.out.push('?');
                self.emit_val(true, key)?;
                self.newline_indent(self.level);
                self.out.push(':');
                self.emit_val(true, value)?;
            } else {
                self.emit_node(key)?;
                self.out.push(':');
                self.emit_val(false, value)?;
            }
        }
        self.level -= 1;
        Ok(())
    }

    // Writes the value that follows a `-` or a `key:`.
    fn emit_val(&mut self, inline: bool, value: &Yaml) -> Result<(), Error> {
        match value {
            Yaml::Hash(map) => {
                if let Some((tag, arg)) = short_form(map) {
                    self.out.push(' ');
                    self.out.push_str(&tag);
                    return self.emit_tagged_arg(&arg);
                }
                self.open_collection(inline || map.is_empty());
                self.emit_hash(map)
            }
            Yaml::Array(items) => {
                self.open_collection(inline || items.is_empty());
                self.emit_array(items)
            }
            _ => {
                self.out.push(' ');
                self.emit_node(value)
            }
        }
    }

    fn emit_tagged_arg(&mut self, arg: &Yaml) -> Result<(), Error> {
        match arg {
            Yaml::Array(items) if !items.is_empty() => {
                self.open_collection(false);
                self.emit_array(items)
            }
            Yaml::Hash(map) if !map.is_empty() => {
                self.open_collection(false);
                self.emit_hash(map)
            }
            _ => {
                self.out.push(' ');
                self.emit_node(arg)
            }
        }
    }

    fn open_collection(&mut self, same_line: bool) {
        if same_line {
            self.out.push(' ');
        } else {
            self.newline_indent(self.level + 1);
        }
    }

    fn newline_indent(&mut self, level: isize) {
        self.out.push('\n');
        for _ in 0..level.max(0) {
            self.out.push_str(INDENT);
        }
    }

    fn emit_scalar(&mut self, node: &Yaml) -> Result<(), Error> {
        let mut rendered = String::new();
        {
            let mut emitter = YamlEmitter::new(&mut rendered);
            emitter.dump(node)?;
        }

        let scalar = rendered.strip_prefix("---").unwrap_or(rendered.as_str());
        let scalar = scalar.strip_prefix(|c: char| c == '\n' || c == ' ').unwrap_or(scalar);
        self.out.push_str(scalar);
        Ok(())
    }
}

// `{Ref: Env}` -> ("!Ref", Env)
// `{Fn::GetAtt: [Vpc, CidrBlock]}` -> ("!GetAtt", "Vpc.CidrBlock")
fn short_form(map: &Hash) -> Option<(String, Yaml)> {
    if map.len() != 1 {
        return None;
    }
    let (Yaml::String(key), arg) = map.iter().next()? else {
        return None;
    };

    let name = if UNPREFIXED_INTRINSICS.contains(&key.as_str()) {
        key.as_str()
    } else {
        key.strip_prefix(INTRINSIC_PREFIX).filter(|name| !name.is_empty())?
    };
    let tag = format!("{}{}", LOCAL_TAG_HANDLE, name);

    // Tagged scalars load back as strings, so other scalars keep the long form.
    let arg = match arg {
        Yaml::Array(parts) if key == GET_ATT => join_get_att(parts).unwrap_or_else(|| arg.clone()),
        Yaml::String(_) | Yaml::Array(_) | Yaml::Hash(_) => arg.clone(),
        _ => return None,
    };
    Some((tag, arg))
}

// Only joins pairs that split back into the same pair on load.
fn join_get_att(parts: &[Yaml]) -> Option<Yaml> {
    match parts {
        [Yaml::String(resource), Yaml::String(attribute)] if !resource.contains('.') => {
            Some(Yaml::String(format!("{}.{}", resource, attribute)))
        }
        _ => None,
    }
}
