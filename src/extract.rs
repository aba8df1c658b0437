// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::path::Path;

use anyhow::{Context, Error};
use saphyr::{Hash, Yaml};
use tracing::debug;

use crate::{
    cfn_yaml::{emit_yaml_str, parse_template_str},
    key_path::KeyPath,
    yaml_utils::read_template_file,
};

pub const METADATA_KEY: &str = "Metadata";
pub const INTERFACE_KEY: &str = "AWS::CloudFormation::Interface";
pub const PARAMETER_GROUPS_KEY: &str = "ParameterGroups";
pub const PARAMETER_LABELS_KEY: &str = "ParameterLabels";
pub const PARAMETERS_KEY: &str = "Parameters";

pub struct Projection {
    pub field: String,
    pub path: KeyPath,
}

/// Output fields and the template paths they are copied from, in output order.
pub struct ExtractionPlan {
    projections: Vec<Projection>,
}

impl ExtractionPlan {
    pub fn new() -> ExtractionPlan {
        ExtractionPlan {
            projections: Vec::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, path: KeyPath) -> ExtractionPlan {
        self.projections.push(Projection {
            field: field.into(),
            path,
        });
        self
    }

    /// `ParameterGroups` and `ParameterLabels` from the console interface metadata,
    /// followed by the top-level `Parameters`.
    pub fn cloudformation_interface() -> ExtractionPlan {
        ExtractionPlan::new()
            .with(
                PARAMETER_GROUPS_KEY,
                KeyPath::new([METADATA_KEY, INTERFACE_KEY, PARAMETER_GROUPS_KEY]),
            )
            .with(
                PARAMETER_LABELS_KEY,
                KeyPath::new([METADATA_KEY, INTERFACE_KEY, PARAMETER_LABELS_KEY]),
            )
            .with(PARAMETERS_KEY, KeyPath::new([PARAMETERS_KEY]))
    }

    pub fn apply(&self, doc: &Yaml) -> Result<Yaml, Error> {
        let mut result = Hash::new();
        for projection in &self.projections {
            let value = projection.path.lookup(doc)?;
            debug!(field = %projection.field, path = %projection.path, "copied template value");
            result.insert(Yaml::String(projection.field.clone()), value.clone());
        }
        Ok(Yaml::Hash(result))
    }
}

impl Default for ExtractionPlan {
    fn default() -> ExtractionPlan {
        ExtractionPlan::cloudformation_interface()
    }
}

/// Returns the text written to stdout: the extracted document plus a trailing newline.
pub fn extract_parameters_str(template_string: &str) -> Result<String, Error> {
    let template = parse_template_str(template_string)?;
    let extracted = ExtractionPlan::default().apply(&template)?;

    let mut out_str = emit_yaml_str(&extracted)?;
    out_str.push('\n');
    Ok(out_str)
}

pub fn extract_parameters_file(filename: &Path) -> Result<String, Error> {
    debug!(template = %filename.display(), "reading template");
    let template_string = read_template_file(filename)?;

    extract_parameters_str(&template_string)
        .with_context(|| format!("failed to process template `{}`", filename.display()))
}
