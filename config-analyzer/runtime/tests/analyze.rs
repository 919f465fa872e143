use clap::Parser;
use mesh_config_analyzer_runtime::{Args, Status};

fn testdata(name: &str) -> String {
    format!("{}/tests/testdata/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn run(args: &[&str]) -> (Status, String) {
    let args = Args::try_parse_from(std::iter::once("mesh-config-analyzer").chain(args.iter().copied()))
        .expect("arguments must parse");
    let mut out = Vec::new();
    let status = args.analyze(&mut out).expect("analysis must succeed");
    (status, String::from_utf8(out).expect("output must be utf-8"))
}

#[test]
fn valid_directory() {
    let (status, out) = run(&[&testdata("valid")]);
    assert_eq!(status, Status::Ok);
    assert_eq!(
        out,
        "\u{2714} No validation issues found when analyzing 3 resource(s).\n"
    );
}

#[test]
fn nested_directories() {
    let (status, out) = run(&[&testdata("nested")]);
    assert_eq!(status, Status::Ok);
    assert_eq!(
        out,
        "\u{2714} No validation issues found when analyzing 3 resource(s).\n"
    );
}

#[test]
fn directory_without_manifests() {
    let (status, out) = run(&[&testdata("no-manifests")]);
    assert_eq!(status, Status::Ok);
    assert_eq!(
        out,
        "Skipped analyzer gateway.SecretAnalyzer: its inputs were not provided.\n\
         \u{2714} No validation issues found when analyzing 0 resource(s).\n"
    );
}

#[test]
fn missing_secret() {
    let (status, out) = run(&[&testdata("missing-secret.yaml")]);
    assert_eq!(status, Status::IssuesFound);
    assert_eq!(
        out,
        "Error [IST0101] (Gateway web.apps) Referenced credentialName not found: \"web-cert\"\n"
    );
}

#[test]
fn unmatched_selector_uses_default_namespace() {
    let (status, out) = run(&["-n", "apps", &testdata("unmatched-selector.yaml")]);
    assert_eq!(status, Status::IssuesFound);
    assert_eq!(
        out,
        "Error [IST0101] (Gateway orphan.apps) Referenced selector not found: \"app=nothing\"\n"
    );
}

#[test]
fn default_gateway_namespace() {
    let (status, out) = run(&[&testdata("default-gateway.yaml")]);
    assert_eq!(status, Status::IssuesFound);
    assert_eq!(
        out,
        "Error [IST0101] (Gateway ingress.apps) Referenced credentialName not found: \"ingress-cert\"\n"
    );

    let (status, _) = run(&[
        "--istio-namespace",
        "mesh-ingress",
        &testdata("default-gateway.yaml"),
    ]);
    assert_eq!(status, Status::Ok);
}

#[test]
fn multiple_paths() {
    let (status, out) = run(&[
        &testdata("valid"),
        &testdata("unmatched-selector.yaml"),
    ]);
    assert_eq!(status, Status::IssuesFound);
    assert_eq!(
        out,
        "Error [IST0101] (Gateway orphan.default) Referenced selector not found: \"app=nothing\"\n"
    );
}

#[test]
fn thresholds_are_case_insensitive() {
    let (status, out) = run(&[
        "--output-threshold",
        "error",
        "--failure-threshold",
        "warning",
        &testdata("missing-secret.yaml"),
    ]);
    assert_eq!(status, Status::IssuesFound);
    assert!(out.contains("web-cert"), "{}", out);
}

#[test]
fn json_output() {
    let (status, out) = run(&["-o", "json", &testdata("missing-secret.yaml")]);
    assert_eq!(status, Status::IssuesFound);
    let value: serde_json::Value = serde_json::from_str(&out).expect("output must be json");
    assert_eq!(
        value,
        serde_json::json!([{
            "code": "IST0101",
            "level": "Error",
            "origin": "Gateway web.apps",
            "field": "credentialName",
            "value": "web-cert",
            "message": "Referenced credentialName not found: \"web-cert\"",
        }])
    );
}

#[test]
fn yaml_output() {
    let (_, out) = run(&["-o", "yaml", &testdata("unmatched-selector.yaml")]);
    let value: serde_yaml::Value = serde_yaml::from_str(&out).expect("output must be yaml");
    assert_eq!(value[0]["field"].as_str(), Some("selector"));
    assert_eq!(value[0]["origin"].as_str(), Some("Gateway orphan.default"));
}

#[test]
fn list_analyzers() {
    let (status, out) = run(&["--list-analyzers"]);
    assert_eq!(status, Status::Ok);
    assert_eq!(
        out,
        "gateway.SecretAnalyzer: Checks a gateway's referenced secrets for correctness\n"
    );
}

#[test]
fn parse_error() {
    let args = Args::try_parse_from(["mesh-config-analyzer", testdata("invalid.yaml").as_str()])
        .expect("arguments must parse");
    let error = args
        .analyze(&mut Vec::new())
        .expect_err("invalid manifests must fail");
    assert!(
        format!("{:#}", error).contains("invalid.yaml"),
        "{:#}",
        error
    );
}

#[test]
fn missing_path() {
    let args = Args::try_parse_from(["mesh-config-analyzer", testdata("does-not-exist.yaml").as_str()])
        .expect("arguments must parse");
    assert!(args.analyze(&mut Vec::new()).is_err());
}
