//! Export preparation.
//!
//! Rewrites a finding aid so that it can be loaded by discovery systems that
//! expect a flat container hierarchy:
//!
//! - every subcontainer points directly at the root of its hierarchy and
//!   carries no `@id` (see [`crate::storage::normalize`]);
//! - `<origination label="Creator">` is relabeled `creator`;
//! - the internal collection identifier
//!   (`archdesc/did/unitid[@type="aspace_uri"]`) is removed.
//!
//! Problems are reported as human-readable diagnostics, most general first.

use crate::document::{Document, NodeId};
use crate::objects::INTERNAL_UNITID_TYPE;
use crate::storage::normalize;
use tracing::debug;

/// Context line for documents that cannot be parsed.
pub const PARSE_FAILURE: &str = "Unable to parse XML file";

/// Context line for container hierarchies that cannot be normalized.
pub const SUBCONTAINER_FAILURE: &str = "problem processing subcontainers";

/// Context line for documents that cannot be serialized again.
pub const SERIALIZE_FAILURE: &str = "Unable to serialize XML file";

/// Applies the export rewrites to a document in place.
///
/// The container hierarchy is checked before anything is changed, so a
/// failure leaves the document untouched.
pub fn prepare_for_export(doc: &mut Document) -> Result<(), Vec<String>> {
    let mut containers = doc.elements_named_mut("container");
    let rewritten = normalize(&mut containers)
        .map_err(|errors| with_context(SUBCONTAINER_FAILURE, errors))?;

    let mut relabeled = 0;
    for origination in doc.elements_named_mut("origination") {
        if origination.attribute("label") == Some("Creator") {
            origination.set_attribute("label", "creator");
            relabeled += 1;
        }
    }

    let internal_ids = internal_unit_ids(doc);
    for id in &internal_ids {
        doc.remove(*id).map_err(|err| vec![err.to_string()])?;
    }

    debug!(
        containers = rewritten,
        originations = relabeled,
        removed_unitids = internal_ids.len(),
        "prepared document for export"
    );
    Ok(())
}

/// Parses `xml`, applies the export rewrites and serializes the result.
pub fn prepare_xml_for_export(xml: &[u8]) -> Result<String, Vec<String>> {
    let mut doc =
        Document::parse(xml).map_err(|err| with_context(PARSE_FAILURE, vec![err.to_string()]))?;
    prepare_for_export(&mut doc)?;
    doc.to_xml_string()
        .map_err(|err| with_context(SERIALIZE_FAILURE, vec![err.to_string()]))
}

/// `<unitid type="aspace_uri">` elements directly under `archdesc/did`.
fn internal_unit_ids(doc: &Document) -> Vec<NodeId> {
    let Some(archdesc) = doc.first_child_named(doc.root(), "archdesc") else {
        return Vec::new();
    };
    doc.child_elements_named(archdesc, "did")
        .into_iter()
        .flat_map(|did| doc.child_elements_named(did, "unitid"))
        .filter(|unitid| {
            doc.element(*unitid)
                .and_then(|e| e.attribute("type"))
                == Some(INTERNAL_UNITID_TYPE)
        })
        .collect()
}

fn with_context(context: &str, errors: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(errors.len() + 1);
    out.push(context.to_string());
    out.extend(errors);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SAMPLE_EAD;

    #[test]
    fn test_prepare_sample() {
        let output = prepare_xml_for_export(SAMPLE_EAD.as_bytes()).unwrap();

        assert!(output.contains(r#"<origination label="creator">"#));
        assert!(!output.contains(r#"label="Creator""#));
        assert!(!output.contains("aspace_uri"));
        assert!(output.contains("<unitid>MC.100</unitid>"));
        assert!(output.contains(
            r#"<container id="b1" type="Box" label="Mixed Materials [32101081442384]">1</container>"#
        ));
        assert!(output.contains(r#"<container parent="b1" type="Folder">2</container>"#));
        // Untouched parts keep their source form.
        assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(output.contains("<p>Correspondence<lb/>and diaries.</p>"));
    }

    #[test]
    fn test_deep_hierarchy() {
        let xml = r#"<ead><archdesc><dsc><c id="c1"><did><container id="A" type="Box">1</container><container id="B" parent="A" type="Folder">2</container><container id="C" parent="B" type="Item">3</container></did></c></dsc></archdesc></ead>"#;
        let output = prepare_xml_for_export(xml.as_bytes()).unwrap();
        assert_eq!(
            output,
            r#"<ead><archdesc><dsc><c id="c1"><did><container id="A" type="Box">1</container><container parent="A" type="Folder">2</container><container parent="A" type="Item">3</container></did></c></dsc></archdesc></ead>"#
        );
    }

    #[test]
    fn test_nested_unitid_kept() {
        let xml = r#"<ead><archdesc><did><unitid type="aspace_uri">/r/1</unitid></did><dsc><c><did><unitid type="aspace_uri">/r/2</unitid></did></c></dsc></archdesc></ead>"#;
        let output = prepare_xml_for_export(xml.as_bytes()).unwrap();
        assert_eq!(
            output,
            r#"<ead><archdesc><did></did><dsc><c><did><unitid type="aspace_uri">/r/2</unitid></did></c></dsc></archdesc></ead>"#
        );
    }

    #[test]
    fn test_subcontainer_failure_leaves_document_untouched() {
        let xml = r#"<ead><archdesc><did><origination label="Creator"/><container id="A">1</container><container parent="A">2</container></did></archdesc></ead>"#;
        let mut doc = Document::parse_str(xml).unwrap();
        let errors = prepare_for_export(&mut doc).unwrap_err();
        assert_eq!(errors[0], SUBCONTAINER_FAILURE);
        assert!(errors[1].contains("no id"));
        assert_eq!(doc.to_xml_string().unwrap(), xml);
    }

    #[test]
    fn test_parse_failure() {
        let errors = prepare_xml_for_export(b"<ead><archdesc></ead>").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], PARSE_FAILURE);
    }
}
