use gopack_core::declaration::Declaration;

#[test]
fn parse_full_declaration_in_file_order() {
    let decl = Declaration::from_str(
        r#"
repo = "github.com/me/app"

[deps.zeta]
import = "github.com/x/zeta"
branch = "dev"

[deps.alpha]
import = "github.com/x/alpha"
scm = "hg"
source = "https://hg.example.org/alpha"
tag = "v1.0"

[dev-deps.check]
import = "launchpad.net/gocheck"
commit = "abc123"
"#,
    )
    .unwrap();

    assert_eq!(decl.repo.as_deref(), Some("github.com/me/app"));
    let keys: Vec<&str> = decl.deps.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
    assert_eq!(decl.deps["zeta"].branch.as_deref(), Some("dev"));
    assert_eq!(decl.deps["alpha"].scm.as_deref(), Some("hg"));
    assert_eq!(decl.dev_deps["check"].commit.as_deref(), Some("abc123"));
    assert_eq!(decl.len(), 3);
}

#[test]
fn empty_declaration() {
    let decl = Declaration::from_str("").unwrap();
    assert!(decl.repo.is_none());
    assert!(decl.is_empty());
}

#[test]
fn missing_import_is_not_a_parse_error() {
    let decl = Declaration::from_str("[deps.foo]\nbranch = \"dev\"\n").unwrap();
    assert!(decl.deps["foo"].import.is_none());
}

#[test]
fn wrong_field_type_is_config_error() {
    let err = Declaration::from_str("[deps.foo]\nimport = 42\n").unwrap_err();
    assert!(err.to_string().contains("Config error"), "got: {err}");
}

#[test]
fn unknown_entry_field_is_config_error() {
    let err = Declaration::from_str("[deps.foo]\nimport = \"a/b\"\nbrnach = \"dev\"\n")
        .unwrap_err();
    assert!(err.to_string().contains("Config error"), "got: {err}");
}

#[test]
fn malformed_toml_is_config_error() {
    assert!(Declaration::from_str("[deps.foo\nimport = ").is_err());
}
