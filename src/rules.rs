//! Business rules for publishable finding aids.
//!
//! A finding aid can be schema-valid and still be unfit for publication.
//! [`RuleSet::check`] applies the publication rules to a parsed document and
//! returns one human-readable diagnostic per violated rule; offending
//! elements are combined into that single diagnostic. An empty list means
//! the document passed.
//!
//! # Example
//!
//! ```rust
//! use ead_rs::rules::{is_valid_eadid, RuleSet};
//!
//! assert!(is_valid_eadid("mss_417"));
//! assert!(!is_valid_eadid("mss.417"));
//!
//! let diagnostics = RuleSet::default().check_bytes(b"<ead><eadheader/></ead>");
//! assert_eq!(diagnostics[0], "Required element <eadid> not found.");
//! ```

use crate::document::{Document, NodeId};
use crate::markup::cleanup_whitespace;
use crate::objects::Level;
use crate::relators::is_relator_code;
use regex::Regex;
use std::net::Ipv6Addr;
use std::sync::LazyLock;
use tracing::debug;

static VALID_EADID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:_[a-z0-9]+){1,7}$").expect("valid eadid regex")
});
// RFC 3986 `absolute-URI` with an optional fragment. IP literals are
// captured as `ip` and checked separately.
static ABSOLUTE_URI: LazyLock<Regex> = LazyLock::new(|| {
    const PCT_ENCODED: &str = "%[0-9A-Fa-f]{2}";
    const UNRESERVED_SUB_DELIMS: &str = r"A-Za-z0-9\-._~!$&'()*+,;=";
    let reg_name = format!("(?:[{UNRESERVED_SUB_DELIMS}]|{PCT_ENCODED})");
    let userinfo = format!("(?:[{UNRESERVED_SUB_DELIMS}:]|{PCT_ENCODED})");
    let pchar = format!("(?:[{UNRESERVED_SUB_DELIMS}:@]|{PCT_ENCODED})");
    let pattern = format!(
        r"^[A-Za-z][A-Za-z0-9+.\-]*:(?://(?:{userinfo}*@)?(?:\[(?P<ip>[^\]]*)\]|{reg_name}*)(?::[0-9]*)?(?:/{pchar}*)*|/?(?:{pchar}+(?:/{pchar}*)*)?)(?:\?(?:{pchar}|[/?])*)?(?:#(?:{pchar}|[/?])*)?$"
    );
    Regex::new(&pattern).expect("valid absolute uri regex")
});
static IP_FUTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v[0-9A-Fa-f]+\.[A-Za-z0-9\-._~!$&'()*+,;=:]+$").expect("valid ipvfuture regex")
});

/// Longest accepted `<eadid>`, in bytes.
pub const MAX_EADID_LENGTH: usize = 251;

/// Repositories accepted by default.
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "Akkasah: Center for Photography (NYU Abu Dhabi)",
    "Center for Brooklyn History",
    "Fales Library and Special Collections",
    "NYU Abu Dhabi Archives and Special Collections",
    "New York University Archives",
    "New-York Historical Society",
    "Poly Archives at Bern Dibner Library of Science and Technology",
    "Tamiment Library and Robert F. Wagner Labor Archives",
];

/// Elements whose `role` must be a relator code when they appear inside
/// one of [`ROLE_CONTEXTS`].
const NAME_ELEMENTS: &[&str] = &["corpname", "famname", "persname"];
const ROLE_CONTEXTS: &[&str] = &["controlaccess", "origination", "repository"];

/// Returns true if `eadid` is 2 to 8 groups of lowercase letters and
/// digits joined by single underscores.
pub fn is_valid_eadid(eadid: &str) -> bool {
    eadid.len() <= MAX_EADID_LENGTH && VALID_EADID.is_match(eadid)
}

/// Returns true if `uri` is a syntactically valid absolute URI (RFC 3986),
/// optionally followed by a fragment.
pub fn is_absolute_uri(uri: &str) -> bool {
    let Some(captures) = ABSOLUTE_URI.captures(uri) else {
        return false;
    };
    match captures.name("ip") {
        Some(ip) => ip.as_str().parse::<Ipv6Addr>().is_ok() || IP_FUTURE.is_match(ip.as_str()),
        None => true,
    }
}

/// Returns the characters of `eadid` that may not appear in an identifier,
/// each once, in order of appearance.
pub fn invalid_eadid_chars(eadid: &str) -> Vec<char> {
    let mut invalid = Vec::new();
    for c in eadid.chars() {
        let allowed = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_';
        if !allowed && !invalid.contains(&c) {
            invalid.push(c);
        }
    }
    invalid
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Diagnostic for a document that is not well-formed or not schema-valid.
pub fn invalid_xml_message() -> String {
    "The XML in this file is not valid.  Please check it using an XML validator.".to_string()
}

/// Diagnostic for a missing required element.
pub fn missing_required_element_message(element: &str) -> String {
    format!("Required element {} not found.", element)
}

/// Diagnostic for a malformed `<eadid>`.
pub fn invalid_eadid_message(eadid: &str, invalid_chars: &[char]) -> String {
    let mut message = format!(
        "Invalid <eadid> \"{}\": an identifier must be 2 to 8 groups of lowercase letters \
         and digits joined by single underscores, at most {} characters long.",
        eadid, MAX_EADID_LENGTH
    );
    if !invalid_chars.is_empty() {
        let chars: Vec<String> = invalid_chars.iter().map(char::to_string).collect();
        message.push_str(&format!(" Invalid characters: {}", chars.join(", ")));
    }
    message
}

/// Diagnostic for an unknown repository.
pub fn invalid_repository_message(repository: &str) -> String {
    format!(
        "Invalid <repository><corpname>: \"{}\" is not a recognized repository.",
        repository
    )
}

/// Diagnostic for elements hidden from the public.
pub fn audience_internal_message(elements: &[String]) -> String {
    format!(
        "Elements with audience=\"internal\" are not allowed in a published finding aid: {}",
        elements.join(", ")
    )
}

/// Diagnostic for names with unknown relator codes, as
/// `(element, code)` pairs.
pub fn unrecognized_relator_codes_message(pairs: &[(String, String)]) -> String {
    let mut message = "Unrecognized relator codes:".to_string();
    for (element, code) in pairs {
        message.push_str(&format!("\n  {}: {}", element, code));
    }
    message
}

/// Diagnostic for a top-level description at the wrong level.
pub fn invalid_archdesc_level_message(required: Level, found: Option<&str>) -> String {
    format!(
        "The <archdesc> level must be \"{}\", found \"{}\".",
        required,
        found.unwrap_or_default()
    )
}

/// Diagnostic for digital objects whose links are not absolute URIs.
pub fn invalid_dao_href_message(hrefs: &[String]) -> String {
    let quoted: Vec<String> = hrefs.iter().map(|href| format!("\"{}\"", href)).collect();
    format!(
        "Digital object links must be absolute URIs: {}",
        quoted.join(", ")
    )
}

// ============================================================================
// Rule Set
// ============================================================================

/// Publication rules and their settings.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Accepted repository names
    pub repositories: Vec<String>,
    /// Required `<archdesc>` level
    pub required_level: Level,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            repositories: DEFAULT_REPOSITORIES.iter().map(|r| r.to_string()).collect(),
            required_level: Level::Collection,
        }
    }
}

impl RuleSet {
    /// Creates a rule set with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the accepted repository names.
    pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories = repositories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the required `<archdesc>` level.
    pub fn with_required_level(mut self, level: Level) -> Self {
        self.required_level = level;
        self
    }

    /// Parses `xml` and checks it.
    ///
    /// A document that cannot be parsed yields the invalid-XML diagnostic
    /// followed by the parser error.
    pub fn check_bytes(&self, xml: &[u8]) -> Vec<String> {
        match Document::parse(xml) {
            Ok(doc) => self.check(&doc),
            Err(err) => vec![
                invalid_xml_message(),
                "Unable to parse XML file".to_string(),
                err.to_string(),
            ],
        }
    }

    /// Checks a parsed document, returning one diagnostic per violated rule.
    pub fn check(&self, doc: &Document) -> Vec<String> {
        let root = doc.root();
        let header = doc.first_child_named(root, "eadheader");
        let eadid = header.and_then(|header| doc.first_child_named(header, "eadid"));
        let archdesc = doc.first_child_named(root, "archdesc");
        let repository = archdesc
            .and_then(|archdesc| doc.first_child_named(archdesc, "did"))
            .and_then(|did| doc.first_child_named(did, "repository"))
            .and_then(|repository| doc.first_child_named(repository, "corpname"));

        let mut diagnostics = Vec::new();
        if eadid.is_none() {
            diagnostics.push(missing_required_element_message("<eadid>"));
        }
        if archdesc.is_none() {
            diagnostics.push(missing_required_element_message("<archdesc>"));
        }
        if archdesc.is_some() && repository.is_none() {
            diagnostics.push(missing_required_element_message("<repository><corpname>"));
        }

        if let Some(eadid) = eadid {
            let value = text(doc, eadid);
            if !is_valid_eadid(&value) {
                diagnostics.push(invalid_eadid_message(&value, &invalid_eadid_chars(&value)));
            }
        }

        if let Some(repository) = repository {
            let name = text(doc, repository);
            if !self.repositories.iter().any(|r| *r == name) {
                diagnostics.push(invalid_repository_message(&name));
            }
        }

        if let Some(archdesc) = archdesc {
            let level = doc.element(archdesc).and_then(|e| e.attribute("level"));
            if level.map(str::trim) != Some(self.required_level.as_str()) {
                diagnostics.push(invalid_archdesc_level_message(self.required_level, level));
            }
        }

        let internal = internal_elements(doc);
        if !internal.is_empty() {
            diagnostics.push(audience_internal_message(&internal));
        }

        let relators = unrecognized_relators(doc);
        if !relators.is_empty() {
            diagnostics.push(unrecognized_relator_codes_message(&relators));
        }

        let hrefs = relative_dao_hrefs(doc);
        if !hrefs.is_empty() {
            diagnostics.push(invalid_dao_href_message(&hrefs));
        }

        debug!(violations = diagnostics.len(), "checked publication rules");
        diagnostics
    }
}

/// Cleaned text of an element; unreadable text counts as empty.
fn text(doc: &Document, id: NodeId) -> String {
    doc.text_content(id)
        .map(|text| cleanup_whitespace(&text))
        .unwrap_or_default()
}

fn internal_elements(doc: &Document) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for element in doc.find_all(|e| e.attribute("audience") == Some("internal")) {
        let name = format!("<{}>", doc.local_name(element).unwrap_or_default());
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn unrecognized_relators(doc: &Document) -> Vec<(String, String)> {
    let names = doc.find_all(|e| {
        NAME_ELEMENTS.contains(&e.local_name())
            && e.attribute("role").is_some_and(|role| !is_relator_code(role.trim()))
    });

    // Grouped by context, then in document order.
    let mut pairs = Vec::new();
    for context in ROLE_CONTEXTS {
        for &name in &names {
            let parent = doc.parent(name).and_then(|parent| doc.local_name(parent));
            if parent != Some(*context) {
                continue;
            }
            let element = doc.local_name(name).unwrap_or_default();
            let role = doc
                .element(name)
                .and_then(|e| e.attribute("role"))
                .unwrap_or_default();
            pairs.push((
                format!(
                    "<{context}><{element}>{}</{element}></{context}>",
                    text(doc, name)
                ),
                role.trim().to_string(),
            ));
        }
    }
    pairs
}

fn relative_dao_hrefs(doc: &Document) -> Vec<String> {
    doc.find_all(|e| e.local_name() == "dao")
        .into_iter()
        .filter_map(|dao| doc.element(dao).and_then(|e| e.attribute("href")))
        .map(str::trim)
        .filter(|href| !is_absolute_uri(href))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SAMPLE_EAD;

    const INVALID_EAD: &str = r#"<ead xmlns="urn:isbn:1-931666-22-9" xmlns:xlink="http://www.w3.org/1999/xlink">
  <eadheader><eadid>mc.100</eadid></eadheader>
  <archdesc level="collection">
    <did>
      <repository><corpname role="grt">NYU Archives</corpname></repository>
      <origination label="Creator">
        <corpname role="cpr">Queens College</corpname>
        <corpname role="orz">Hunter College</corpname>
        <famname role="fro">Draper family</famname>
        <persname role="clb">Daisy, Bert</persname>
        <persname role="cre">Orchid, Ella</persname>
      </origination>
      <dao xlink:href="https://hdl.handle.net/2333.1/abc"/>
      <dao xlink:href="files/local.pdf"/>
    </did>
    <bioghist audience="internal"><p>Private.</p></bioghist>
    <processinfo audience="internal"><p>Also private.</p></processinfo>
    <scopecontent audience="internal"><p>Hidden too.</p></scopecontent>
    <controlaccess>
      <corpname role="orz">Columbia University</corpname>
      <famname role="cpo">Buell Family</famname>
      <persname role="grt">Jane Doe, 1800-1900</persname>
      <persname role="pht">John Doe, 1800-1900</persname>
    </controlaccess>
  </archdesc>
</ead>"#;

    fn pair(element: &str, code: &str) -> (String, String) {
        (element.to_string(), code.to_string())
    }

    #[test]
    fn test_valid_eadids() {
        for eadid in [
            "a_b",
            "a_b_c_d_e_f_g_h",
            "0_1_2_3_4_5_6_7",
            "1_abcdefghijklmnopqrstuvwzyz_0123456789_a",
            "mss_417",
            "photos_220",
            "rg_38_0_1_2",
        ] {
            assert!(is_valid_eadid(eadid), "{}", eadid);
        }
    }

    #[test]
    fn test_invalid_eadids() {
        for eadid in [
            "", "a", "a1", "_", "A", "é", "中文", "A_B_C_D_E_F_G_H", "a_", "_a", "a__b", "a-b",
            "a.b", "a_b_c_d_e_f_g_h_i", "a b c", "mss.417", "PHOTOS_220", "Rg_38_0_1_2",
        ] {
            assert!(!is_valid_eadid(eadid), "{}", eadid);
        }
        let long = format!("{}_b", "a".repeat(MAX_EADID_LENGTH));
        assert!(!is_valid_eadid(&long));
    }

    #[test]
    fn test_absolute_uris() {
        for uri in [
            "https://hdl.handle.net/2333.1/abc",
            "http://example.org",
            "http://user:pw@example.org:8080/a/b?q=1&r=%20#frag",
            "http://[::1]/x",
            "http://[2001:db8::7]:80/",
            "http://[v1.fe80::a+en1]/",
            "mailto:archives@example.org",
            "urn:isbn:1-931666-22-9",
            "file:///tmp/scan.pdf",
            "tel:+1-212-998-2500",
        ] {
            assert!(is_absolute_uri(uri), "{}", uri);
        }
    }

    #[test]
    fn test_invalid_absolute_uris() {
        for uri in [
            "",
            "files/local.pdf",
            "/files/local.pdf",
            "//example.org/a",
            r"C:\files\scan1.pdf",
            "http://[broken",
            "http://[not-an-ip]/",
            "https://example.org/%zz",
            "https://example.org/%2",
            "http://exa<mple>.org",
            "http://example.org/a b",
            "1http://example.org",
            "http://example.org:80a/",
        ] {
            assert!(!is_absolute_uri(uri), "{}", uri);
        }
    }

    #[test]
    fn test_malformed_dao_hrefs_reported() {
        let hrefs = [
            r"C:\files\scan1.pdf",
            "http://[broken",
            "https://example.org/%zz",
            "http://exa&lt;mple&gt;.org",
        ];
        let daos: String = hrefs
            .iter()
            .map(|href| format!(r#"<dao xlink:href="{}"/>"#, href))
            .collect();
        let xml = SAMPLE_EAD
            .replace(r#" audience="internal""#, "")
            .replace("<langmaterial>", &format!("{}<langmaterial>", daos));

        let diagnostics = RuleSet::default().check_bytes(xml.as_bytes());
        assert_eq!(
            diagnostics,
            [invalid_dao_href_message(&[
                r"C:\files\scan1.pdf".to_string(),
                "http://[broken".to_string(),
                "https://example.org/%zz".to_string(),
                "http://exa<mple>.org".to_string(),
            ])]
        );
    }

    #[test]
    fn test_relator_codes_grouped_by_context() {
        let xml = r#"<ead><eadheader><eadid>mc_100</eadid></eadheader>
  <archdesc level="collection">
    <did>
      <repository><corpname role="grt">Fales Library and Special Collections</corpname></repository>
      <origination><persname role="clb">Daisy, Bert</persname></origination>
    </did>
    <controlaccess><corpname role="orz">Columbia University</corpname></controlaccess>
  </archdesc>
</ead>"#;
        let diagnostics = RuleSet::default().check_bytes(xml.as_bytes());
        assert_eq!(
            diagnostics,
            [unrecognized_relator_codes_message(&[
                pair("<controlaccess><corpname>Columbia University</corpname></controlaccess>", "orz"),
                pair("<origination><persname>Daisy, Bert</persname></origination>", "clb"),
                pair(
                    "<repository><corpname>Fales Library and Special Collections</corpname></repository>",
                    "grt"
                ),
            ])]
        );
    }

    #[test]
    fn test_invalid_eadid_chars() {
        assert_eq!(invalid_eadid_chars("mc.100"), ['.']);
        assert_eq!(invalid_eadid_chars("A-b.c-d"), ['A', '-', '.']);
        assert!(invalid_eadid_chars("mc_100").is_empty());
    }

    #[test]
    fn test_valid_document() {
        let xml = SAMPLE_EAD.replace(r#" audience="internal""#, "");
        assert!(RuleSet::default().check_bytes(xml.as_bytes()).is_empty());
    }

    #[test]
    fn test_eadid_whitespace_trimmed() {
        let xml = SAMPLE_EAD
            .replace(r#" audience="internal""#, "")
            .replace(">mc_100<", ">\n   mc_100  \n<");
        assert!(RuleSet::default().check_bytes(xml.as_bytes()).is_empty());
    }

    #[test]
    fn test_invalid_document() {
        let expected = vec![
            invalid_eadid_message("mc.100", &['.']),
            invalid_repository_message("NYU Archives"),
            audience_internal_message(&[
                "<bioghist>".to_string(),
                "<processinfo>".to_string(),
                "<scopecontent>".to_string(),
            ]),
            unrecognized_relator_codes_message(&[
                pair("<controlaccess><corpname>Columbia University</corpname></controlaccess>", "orz"),
                pair("<controlaccess><famname>Buell Family</famname></controlaccess>", "cpo"),
                pair("<controlaccess><persname>Jane Doe, 1800-1900</persname></controlaccess>", "grt"),
                pair("<origination><corpname>Queens College</corpname></origination>", "cpr"),
                pair("<origination><corpname>Hunter College</corpname></origination>", "orz"),
                pair("<origination><famname>Draper family</famname></origination>", "fro"),
                pair("<origination><persname>Daisy, Bert</persname></origination>", "clb"),
                pair("<repository><corpname>NYU Archives</corpname></repository>", "grt"),
            ]),
            invalid_dao_href_message(&["files/local.pdf".to_string()]),
        ];
        assert_eq!(RuleSet::default().check_bytes(INVALID_EAD.as_bytes()), expected);
    }

    #[test]
    fn test_configured_repositories() {
        let rules = RuleSet::new().with_repositories(["NYU Archives"]);
        let diagnostics = rules.check_bytes(INVALID_EAD.as_bytes());
        assert!(!diagnostics.contains(&invalid_repository_message("NYU Archives")));
    }

    #[test]
    fn test_archdesc_level() {
        let xml = SAMPLE_EAD
            .replace(r#" audience="internal""#, "")
            .replace(r#"<archdesc level="collection">"#, r#"<archdesc level="fonds">"#);
        let diagnostics = RuleSet::default().check_bytes(xml.as_bytes());
        assert_eq!(
            diagnostics,
            [invalid_archdesc_level_message(Level::Collection, Some("fonds"))]
        );

        let rules = RuleSet::default().with_required_level(Level::Fonds);
        assert!(rules.check_bytes(xml.as_bytes()).is_empty());
    }

    #[test]
    fn test_missing_required_elements() {
        let diagnostics = RuleSet::default().check_bytes(b"<ead><eadheader/></ead>");
        assert_eq!(
            diagnostics,
            [
                missing_required_element_message("<eadid>"),
                missing_required_element_message("<archdesc>"),
            ]
        );

        let diagnostics = RuleSet::default().check_bytes(
            br#"<ead><eadheader><eadid>mc_100</eadid></eadheader><archdesc level="collection"><did/></archdesc></ead>"#,
        );
        assert_eq!(
            diagnostics,
            [missing_required_element_message("<repository><corpname>")]
        );
    }

    #[test]
    fn test_unparseable_document() {
        let diagnostics = RuleSet::default().check_bytes(b"not xml at all");
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[0], invalid_xml_message());
        assert_eq!(
            diagnostics[0],
            "The XML in this file is not valid.  Please check it using an XML validator."
        );
        assert_eq!(diagnostics[1], "Unable to parse XML file");
    }
}
