//! Structural validation of assembled documents.
//!
//! [`CycloneDx13Validator`] checks the parts of the CycloneDX 1.3 JSON schema
//! that an assembled document can violate: required members, closed member
//! sets, enumerations, string formats, and reference integrity.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Result, SbomGraphError};

/// Validates a serialized document against one schema version.
pub trait SchemaValidator {
    /// Schema version this validator checks
    fn schema_version(&self) -> &str;

    /// Every violation found; empty means the document conforms
    fn validate(&self, document: &Value) -> Vec<String>;

    /// Fail with [`SbomGraphError::SchemaViolation`] unless the document conforms
    fn ensure_valid(&self, document: &Value) -> Result<()> {
        let violations = self.validate(document);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SbomGraphError::SchemaViolation { violations })
        }
    }
}

const ROOT_MEMBERS: &[&str] = &[
    "$schema",
    "bomFormat",
    "specVersion",
    "serialNumber",
    "version",
    "metadata",
    "components",
    "services",
    "externalReferences",
    "dependencies",
    "compositions",
];

const METADATA_MEMBERS: &[&str] = &[
    "timestamp",
    "tools",
    "authors",
    "component",
    "manufacture",
    "supplier",
    "licenses",
    "properties",
];

const COMPONENT_MEMBERS: &[&str] = &[
    "type",
    "mime-type",
    "bom-ref",
    "supplier",
    "author",
    "publisher",
    "group",
    "name",
    "version",
    "description",
    "scope",
    "hashes",
    "licenses",
    "copyright",
    "cpe",
    "purl",
    "swid",
    "modified",
    "pedigree",
    "externalReferences",
    "properties",
    "components",
    "evidence",
];

const COMPONENT_TYPES: &[&str] = &[
    "application",
    "framework",
    "library",
    "container",
    "operating-system",
    "device",
    "firmware",
    "file",
];

static SERIAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("static regex")
});

/// CycloneDX 1.3 JSON structural validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycloneDx13Validator;

impl SchemaValidator for CycloneDx13Validator {
    fn schema_version(&self) -> &str {
        "1.3"
    }

    fn validate(&self, document: &Value) -> Vec<String> {
        let mut report = Report::default();
        let Some(root) = document.as_object() else {
            report.push("$", "document must be a JSON object");
            return report.violations;
        };

        report.closed_members("$", root, ROOT_MEMBERS);
        match root.get("bomFormat").and_then(Value::as_str) {
            Some("CycloneDX") => {}
            Some(other) => report.push("$.bomFormat", format!("must be 'CycloneDX', got '{other}'")),
            None => report.push("$.bomFormat", "required string is missing"),
        }
        match root.get("specVersion").and_then(Value::as_str) {
            Some(v) if v == self.schema_version() => {}
            Some(other) => report.push(
                "$.specVersion",
                format!("must be '{}', got '{other}'", self.schema_version()),
            ),
            None => report.push("$.specVersion", "required string is missing"),
        }
        if let Some(serial) = root.get("serialNumber") {
            match serial.as_str() {
                Some(s) if SERIAL_NUMBER.is_match(s) => {}
                _ => report.push("$.serialNumber", "must be a urn:uuid serial number"),
            }
        }
        match root.get("version") {
            None => report.push("$.version", "required integer is missing"),
            Some(v) if v.as_u64().is_some_and(|n| n >= 1) => {}
            Some(_) => report.push("$.version", "must be an integer >= 1"),
        }

        let mut refs = HashSet::new();
        if let Some(metadata) = root.get("metadata") {
            validate_metadata(metadata, &mut refs, &mut report);
        }
        if let Some(components) = root.get("components") {
            match components.as_array() {
                Some(list) => {
                    for (i, component) in list.iter().enumerate() {
                        validate_component(
                            &format!("$.components[{i}]"),
                            component,
                            &mut refs,
                            &mut report,
                        );
                    }
                }
                None => report.push("$.components", "must be an array"),
            }
        }
        if let Some(dependencies) = root.get("dependencies") {
            validate_dependencies(dependencies, &refs, &mut report);
        }

        report.violations
    }
}

#[derive(Default)]
struct Report {
    violations: Vec<String>,
}

impl Report {
    fn push(&mut self, at: &str, message: impl AsRef<str>) {
        self.violations.push(format!("{at}: {}", message.as_ref()));
    }

    fn closed_members(&mut self, at: &str, object: &Map<String, Value>, allowed: &[&str]) {
        for key in object.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push(at, format!("unexpected member '{key}'"));
            }
        }
    }

    fn required_string<'v>(
        &mut self,
        at: &str,
        object: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v str> {
        match object.get(key) {
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                self.push(&format!("{at}.{key}"), "must be a string");
                None
            }
            None => {
                self.push(&format!("{at}.{key}"), "required string is missing");
                None
            }
        }
    }

    fn optional_string(&mut self, at: &str, object: &Map<String, Value>, key: &str) {
        if object.get(key).is_some_and(|v| !v.is_string()) {
            self.push(&format!("{at}.{key}"), "must be a string");
        }
    }
}

fn validate_metadata(metadata: &Value, refs: &mut HashSet<String>, report: &mut Report) {
    let Some(object) = metadata.as_object() else {
        report.push("$.metadata", "must be an object");
        return;
    };
    report.closed_members("$.metadata", object, METADATA_MEMBERS);

    if let Some(timestamp) = object.get("timestamp") {
        let valid = timestamp
            .as_str()
            .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok());
        if !valid {
            report.push("$.metadata.timestamp", "must be an RFC 3339 date-time");
        }
    }
    if let Some(tools) = object.get("tools") {
        match tools.as_array() {
            Some(list) => {
                for (i, tool) in list.iter().enumerate() {
                    let at = format!("$.metadata.tools[{i}]");
                    match tool.as_object() {
                        Some(t) => {
                            for key in ["vendor", "name", "version"] {
                                report.optional_string(&at, t, key);
                            }
                        }
                        None => report.push(&at, "must be an object"),
                    }
                }
            }
            None => report.push("$.metadata.tools", "must be an array"),
        }
    }
    if let Some(component) = object.get("component") {
        validate_component("$.metadata.component", component, refs, report);
    }
    if let Some(properties) = object.get("properties") {
        validate_properties("$.metadata.properties", properties, report);
    }
}

fn validate_component(at: &str, component: &Value, refs: &mut HashSet<String>, report: &mut Report) {
    let Some(object) = component.as_object() else {
        report.push(at, "must be an object");
        return;
    };
    report.closed_members(at, object, COMPONENT_MEMBERS);

    if let Some(kind) = report.required_string(at, object, "type") {
        if !COMPONENT_TYPES.contains(&kind) {
            report.push(&format!("{at}.type"), format!("unknown component type '{kind}'"));
        }
    }
    report.required_string(at, object, "name");
    report.required_string(at, object, "version");
    report.optional_string(at, object, "purl");

    match object.get("bom-ref") {
        Some(Value::String(r)) => {
            if !refs.insert(r.clone()) {
                report.push(&format!("{at}.bom-ref"), format!("duplicate bom-ref '{r}'"));
            }
        }
        Some(_) => report.push(&format!("{at}.bom-ref"), "must be a string"),
        None => {}
    }
    if let Some(properties) = object.get("properties") {
        validate_properties(&format!("{at}.properties"), properties, report);
    }
}

fn validate_properties(at: &str, properties: &Value, report: &mut Report) {
    let Some(list) = properties.as_array() else {
        report.push(at, "must be an array");
        return;
    };
    for (i, property) in list.iter().enumerate() {
        let at = format!("{at}[{i}]");
        match property.as_object() {
            Some(p) => {
                report.optional_string(&at, p, "name");
                report.optional_string(&at, p, "value");
            }
            None => report.push(&at, "must be an object"),
        }
    }
}

fn validate_dependencies(dependencies: &Value, refs: &HashSet<String>, report: &mut Report) {
    let Some(list) = dependencies.as_array() else {
        report.push("$.dependencies", "must be an array");
        return;
    };
    let mut seen_refs = HashSet::new();
    for (i, dependency) in list.iter().enumerate() {
        let at = format!("$.dependencies[{i}]");
        let Some(object) = dependency.as_object() else {
            report.push(&at, "must be an object");
            continue;
        };
        report.closed_members(&at, object, &["ref", "dependsOn"]);
        if let Some(r) = report.required_string(&at, object, "ref") {
            if !refs.contains(r) {
                report.push(&format!("{at}.ref"), format!("unknown bom-ref '{r}'"));
            }
            if !seen_refs.insert(r.to_string()) {
                report.push(&format!("{at}.ref"), format!("duplicate dependency entry '{r}'"));
            }
        }
        let Some(depends_on) = object.get("dependsOn") else {
            continue;
        };
        let Some(targets) = depends_on.as_array() else {
            report.push(&format!("{at}.dependsOn"), "must be an array");
            continue;
        };
        let mut unique = HashSet::new();
        for target in targets {
            match target.as_str() {
                Some(t) => {
                    if !unique.insert(t) {
                        report.push(&format!("{at}.dependsOn"), format!("duplicate item '{t}'"));
                    }
                    if !refs.contains(t) {
                        report.push(&format!("{at}.dependsOn"), format!("unknown bom-ref '{t}'"));
                    }
                }
                None => report.push(&format!("{at}.dependsOn"), "items must be strings"),
            }
        }
    }
}
