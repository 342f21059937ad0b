//! End-to-end loader tests against real files and live system properties.
//!
//! Verifies:
//! 1. XML file → tree round-trip including nested `<property>` flattening
//! 2. property-map contents are independent of property element order
//! 3. `${key}` substitution against process-wide system properties
//! 4. properties files wrap into a single root node

use std::env;
use std::fs;
use std::time::Duration;

use keel_config::{ConfigError, load_properties_file, load_xml_file, load_xml_str};

#[test]
fn xml_file_builds_full_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0"?>
<!-- application wiring -->
<app name="demo">
  <server host="0.0.0.0" port="8080">
    <property name="accept.timeout" value="5s"/>
    <property name="backlog" value="128"/>
  </server>
  <motd>Welcome &amp; enjoy</motd>
</app>
"#,
    )
    .unwrap();

    let root = load_xml_file(&path).unwrap();
    assert_eq!(root.name(), "app");

    let server = root.child("server").unwrap();
    assert_eq!(server.attribute("host"), Some("0.0.0.0"));
    assert_eq!(server.attribute_as::<u16>("port").unwrap(), Some(8080));
    assert_eq!(
        server.property_as::<Duration>("accept.timeout").unwrap(),
        Some(Duration::from_secs(5))
    );
    assert_eq!(server.property_or("backlog", 0usize).unwrap(), 128);
    assert!(server.children().is_empty());

    assert_eq!(root.find("motd").unwrap().value(), Some("Welcome & enjoy"));
}

#[test]
fn property_map_ignores_element_order() {
    let forward = load_xml_str(
        r#"<pool>
             <property name="min" value="2"/>
             <property name="max" value="16"/>
           </pool>"#,
    )
    .unwrap();
    let reversed = load_xml_str(
        r#"<pool>
             <property name="max" value="16"/>
             <property name="min" value="2"/>
           </pool>"#,
    )
    .unwrap();

    let mut fwd: Vec<_> = forward.properties().collect();
    let mut rev: Vec<_> = reversed.properties().collect();
    fwd.sort();
    rev.sort();
    assert_eq!(fwd, rev);
    assert_eq!(fwd, vec![("max", "16"), ("min", "2")]);
}

#[test]
fn substitution_resolves_against_process_env() {
    unsafe { env::set_var("KEEL_IT_SUBST_HOME", "/opt/keel") };

    let root = load_xml_str(
        r#"<app dir="${KEEL_IT_SUBST_HOME}/data">
             <property name="log.dir" value="${KEEL_IT_SUBST_HOME}/log"/>
           </app>"#,
    )
    .unwrap();
    assert_eq!(root.attribute("dir"), Some("/opt/keel/data"));
    assert_eq!(root.property("log.dir"), Some("/opt/keel/log"));
}

#[test]
fn substitution_failure_names_the_key() {
    let err = load_xml_str(r#"<app dir="${KEEL_IT_SUBST_ABSENT}"/>"#).unwrap_err();
    match err {
        ConfigError::UnresolvedVariable { name, .. } => {
            assert_eq!(name, "KEEL_IT_SUBST_ABSENT");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn properties_file_wraps_into_root_node() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.properties");
    fs::write(&path, "# settings\nhost = localhost\nport = 9090\n").unwrap();

    let root = load_properties_file(&path).unwrap();
    assert_eq!(root.name(), "properties");
    assert_eq!(root.property("host"), Some("localhost"));
    assert_eq!(root.property_as::<u16>("port").unwrap(), Some(9090));
    assert!(root.children().is_empty());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.xml");
    let err = load_xml_file(&path).unwrap_err();
    assert!(err.to_string().contains("absent.xml"));
}
