// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::{fs, path::Path};

use anyhow::{Context, Error};

pub fn read_template_file(filename: &Path) -> Result<String, Error> {
    fs::read_to_string(filename).with_context(|| format!("failed to read template `{}`", filename.display()))
}
