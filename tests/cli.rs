// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn testdata_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src/extract/tests/testdata/tests")
}

fn testdata(name: &str) -> PathBuf {
    testdata_dir().join(format!("{}.yaml", name))
}

#[allow(deprecated)]
fn cfn_params_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cfn-params").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_parameter_interface() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata("minimal_scenario"))
        .assert()
        .success()
        .stdout("ParameterGroups: []\nParameterLabels: {}\nParameters:\n  Env:\n    Type: String\n");
}

#[test]
fn prints_intrinsics_in_short_form() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata("intrinsic_values"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Default: !Ref \"AWS::NoValue\""))
        .stdout(predicate::str::contains("Default: !GetAtt Vpc.DefaultSubnet"))
        .stdout(predicate::str::contains("Default: 1.0"));
}

#[test]
fn missing_template_option_is_a_usage_error() {
    cfn_params_cmd()
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn missing_file() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata("does_not_exist"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to read template"));
}

#[test]
fn unreadable_template_path() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata_dir())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to read template"));
}

#[test]
fn missing_parameters_key() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata("missing_parameters"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing key `Parameters`"));
}

#[test]
fn missing_interface_key() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata("missing_interface"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing key `AWS::CloudFormation::Interface`"));
}

#[test]
fn malformed_template() {
    cfn_params_cmd()
        .arg("--template")
        .arg(testdata("malformed_yaml"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to process template"));
}
