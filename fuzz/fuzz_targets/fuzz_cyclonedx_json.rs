#![no_main]
use libfuzzer_sys::fuzz_target;
use sbomgraph::compare::{compare_sboms, parse_uid};
use sbomgraph::sbom::{CycloneDx13Validator, CycloneDxBom, SchemaValidator};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX reader used by the comparison commands, and the
/// schema validator on arbitrary JSON.
///
/// Prefixes input with a minimal CycloneDX JSON wrapper to increase
/// the likelihood of reaching component handling.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(s) {
        let _ = CycloneDx13Validator.validate(&value);
    }
    let _ = CycloneDxBom::from_json_str(s);

    if s.len() < MAX_WRAPPED_INPUT_LEN {
        let wrapped = format!(
            r#"{{"bomFormat":"CycloneDX","specVersion":"1.3","components":[{s}]}}"#,
        );
        if let (Ok(bom), Ok(uid)) = (CycloneDxBom::from_json_str(&wrapped), parse_uid("name,purl")) {
            assert!(compare_sboms(&bom, &bom, &uid).is_equal());
        }
    }
});
