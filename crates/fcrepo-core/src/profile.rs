//! Fedora profile XML parsing.
//!
//! The REST API describes repositories, objects and datastreams with small
//! XML documents whose root element holds one child element per field:
//!
//! ```xml
//! <datastreamProfile xmlns="http://www.fedora.info/definitions/1/0/management/">
//!   <dsLabel>Dublin Core Record</dsLabel>
//!   <dsMIME>text/xml</dsMIME>
//! </datastreamProfile>
//! ```
//!
//! Each field becomes an entry of a [`ProfileRecord`]. A field that occurs
//! once is a [`ProfileValue::Scalar`], a repeated field a
//! [`ProfileValue::List`]. `objModels` is always a list; its `<model>`
//! children are its values. Other nested fields are flattened to dotted keys
//! (`repositoryPID.PID-delimiter`).
//!
//! Older servers omit the namespace declaration. When a document has no
//! `xmlns=` at all, the canonical namespace is injected before parsing.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Namespace of API-A (access) documents.
pub const ACCESS_NS: &str = "http://www.fedora.info/definitions/1/0/access/";
/// Namespace of API-M (management) documents.
pub const MANAGEMENT_NS: &str = "http://www.fedora.info/definitions/1/0/management/";
/// The field that is always multi-valued.
pub const OBJ_MODELS: &str = "objModels";

const REPOSITORY_ROOT: &str = "fedoraRepository";
const OBJECT_ROOT: &str = "objectProfile";
const DATASTREAM_ROOT: &str = "datastreamProfile";
const OBJECT_HISTORY_ROOT: &str = "fedoraObjectHistory";
const OBJECT_CHANGE_DATE: &str = "objectChangeDate";
const DS_CREATE_DATE: &str = "dsCreateDate";

/// Value of a single profile field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileValue {
    /// The field occurred exactly once
    Scalar(String),
    /// The field occurred zero or several times, or is `objModels`
    List(Vec<String>),
}

impl ProfileValue {
    /// The scalar value, if this is not a list.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// All values, a scalar being a one-element slice.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }
}

/// Field name to value mapping parsed from a profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfileRecord {
    fields: BTreeMap<String, ProfileValue>,
}

impl ProfileRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ProfileValue> {
        self.fields.get(field)
    }

    /// Scalar value of a field.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(ProfileValue::as_str)
    }

    /// All values of a field, whether scalar or list.
    #[must_use]
    pub fn get_values(&self, field: &str) -> &[String] {
        self.get(field).map_or(&[][..], ProfileValue::values)
    }

    /// Scalar field read as `true`/`false`.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get_str(field).and_then(|v| v.trim().parse().ok())
    }

    /// Scalar field read as an unsigned integer (e.g. `dsSize`).
    #[must_use]
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.get_str(field).and_then(|v| v.trim().parse().ok())
    }

    /// Scalar field read as an RFC 3339 timestamp (e.g. `dsCreateDate`).
    #[must_use]
    pub fn get_datetime(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get_str(field)
            .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: ProfileValue) {
        self.fields.insert(field.into(), value);
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProfileValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn from_values(values: BTreeMap<String, Vec<String>>) -> Self {
        let fields = values
            .into_iter()
            .map(|(field, mut values)| {
                let value = if field != OBJ_MODELS && values.len() == 1 {
                    ProfileValue::Scalar(values.remove(0))
                } else {
                    ProfileValue::List(values)
                };
                (field, value)
            })
            .collect();
        Self { fields }
    }
}

/// Which version history document is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    /// `fedoraObjectHistory` (access namespace)
    Object,
    /// `datastreamHistory` of `datastreamProfile`s (management namespace)
    Datastream,
}

/// Parsed version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionHistory {
    /// Object change dates in document order
    Object(Vec<String>),
    /// Datastream profiles keyed by `dsCreateDate`
    Datastream(BTreeMap<String, ProfileRecord>),
}

/// Parse the repository description (`describe?xml=true`).
///
/// Profile metadata is best effort: malformed XML yields `None` and a
/// warning instead of an error.
#[must_use]
pub fn parse_repository_profile(xml: &str) -> Option<ProfileRecord> {
    match parse_single(xml, ACCESS_NS, REPOSITORY_ROOT) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unparseable repository profile");
            None
        }
    }
}

/// Parse an object profile (`objects/{pid}?format=xml`).
///
/// Blank input yields an empty record.
///
/// # Errors
///
/// Returns error if the XML is malformed.
pub fn parse_object_profile(xml: &str) -> Result<ProfileRecord, ProfileError> {
    parse_single(xml, ACCESS_NS, OBJECT_ROOT)
}

/// Parse a datastream profile (`objects/{pid}/datastreams/{dsid}?format=xml`).
///
/// Blank input, as left behind by a datastream that does not exist yet,
/// yields an empty record.
///
/// # Examples
///
/// ```
/// use fcrepo_core::{parse_datastream_profile, ProfileValue};
///
/// let record = parse_datastream_profile(
///     "<datastreamProfile><dsMIME>text/xml</dsMIME></datastreamProfile>",
/// )
/// .unwrap();
/// assert_eq!(record.get_str("dsMIME"), Some("text/xml"));
/// ```
///
/// # Errors
///
/// Returns error if the XML is malformed.
pub fn parse_datastream_profile(xml: &str) -> Result<ProfileRecord, ProfileError> {
    parse_single(xml, MANAGEMENT_NS, DATASTREAM_ROOT)
}

/// Parse a version history document.
///
/// # Errors
///
/// Returns error if the XML is malformed.
pub fn parse_version_history(kind: HistoryKind, xml: &str) -> Result<VersionHistory, ProfileError> {
    match kind {
        HistoryKind::Object => {
            let record = parse_single(xml, ACCESS_NS, OBJECT_HISTORY_ROOT)?;
            Ok(VersionHistory::Object(
                record.get_values(OBJECT_CHANGE_DATE).to_vec(),
            ))
        }
        HistoryKind::Datastream => {
            let xml = with_default_namespace(xml, DATASTREAM_ROOT, MANAGEMENT_NS);
            let versions = collect_profiles(&xml, MANAGEMENT_NS, DATASTREAM_ROOT)?
                .into_iter()
                .map(|record| {
                    let created = record.get_str(DS_CREATE_DATE).unwrap_or_default().to_string();
                    (created, record)
                })
                .collect();
            Ok(VersionHistory::Datastream(versions))
        }
    }
}

/// Object change dates from `objects/{pid}/versions`.
///
/// # Errors
///
/// Returns error if the XML is malformed.
pub fn parse_object_history(xml: &str) -> Result<Vec<String>, ProfileError> {
    match parse_version_history(HistoryKind::Object, xml)? {
        VersionHistory::Object(dates) => Ok(dates),
        VersionHistory::Datastream(_) => Ok(Vec::new()),
    }
}

/// Datastream versions from `objects/{pid}/datastreams/{dsid}/versions`,
/// keyed by creation date.
///
/// # Errors
///
/// Returns error if the XML is malformed.
pub fn parse_datastream_history(
    xml: &str,
) -> Result<BTreeMap<String, ProfileRecord>, ProfileError> {
    match parse_version_history(HistoryKind::Datastream, xml)? {
        VersionHistory::Datastream(versions) => Ok(versions),
        VersionHistory::Object(_) => Ok(BTreeMap::new()),
    }
}

/// Parse a document whose root is the profile element.
fn parse_single(xml: &str, ns: &str, element: &str) -> Result<ProfileRecord, ProfileError> {
    if xml.trim().is_empty() {
        return Ok(ProfileRecord::default());
    }
    let xml = with_default_namespace(xml, element, ns);
    Ok(collect_profiles(&xml, ns, element)?
        .into_iter()
        .next()
        .unwrap_or_default())
}

/// Declare `ns` as default namespace on every `element` start tag, unless the
/// document already declares a default namespace somewhere.
fn with_default_namespace<'a>(xml: &'a str, element: &str, ns: &str) -> Cow<'a, str> {
    if xml.contains("xmlns=") {
        return Cow::Borrowed(xml);
    }

    let tag = format!("<{element}");
    let mut out = String::with_capacity(xml.len() + ns.len() + 16);
    let mut rest = xml;

    while let Some(idx) = rest.find(&tag) {
        let (head, tail) = rest.split_at(idx + tag.len());
        out.push_str(head);
        if tail.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
            out.push_str(" xmlns=\"");
            out.push_str(ns);
            out.push('"');
        }
        rest = tail;
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Collect every `element` in `ns`, at any depth, into a record.
fn collect_profiles(xml: &str, ns: &str, element: &str) -> Result<Vec<ProfileRecord>, ProfileError> {
    let mut reader = NsReader::from_str(xml);

    let mut profiles = Vec::new();
    let mut current: Option<ProfileBuilder> = None;
    let mut depth = 0usize;
    let mut seen_element = false;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(start) => {
                depth += 1;
                seen_element = true;
                let name = local_name(&start)?;
                if let Some(builder) = current.as_mut() {
                    builder.open(depth, name);
                } else if is_bound_to(&resolved, ns) && name == element {
                    current = Some(ProfileBuilder::new(depth));
                }
            }
            Event::Empty(start) => {
                seen_element = true;
                let name = local_name(&start)?;
                if let Some(builder) = current.as_mut() {
                    builder.open(depth + 1, name);
                    builder.close(depth + 1);
                } else if is_bound_to(&resolved, ns) && name == element {
                    profiles.push(ProfileRecord::default());
                }
            }
            Event::Text(text) => {
                if let Some(builder) = current.as_mut() {
                    let text = text.unescape()?;
                    // Indentation between elements, not field content.
                    if !text.trim().is_empty() {
                        builder.text(&text);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(builder) = current.as_mut() {
                    builder.text(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(ProfileError::Malformed("unexpected end tag".to_string()));
                }
                let finished = match current.as_mut() {
                    Some(builder) if builder.depth == depth => true,
                    Some(builder) => {
                        builder.close(depth);
                        false
                    }
                    None => false,
                };
                if finished {
                    if let Some(builder) = current.take() {
                        profiles.push(builder.finish());
                    }
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ProfileError::Malformed(format!(
            "{depth} unclosed element(s) at end of document"
        )));
    }
    if !seen_element {
        return Err(ProfileError::Malformed("no root element".to_string()));
    }

    Ok(profiles)
}

fn local_name(start: &BytesStart<'_>) -> Result<String, ProfileError> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| ProfileError::Malformed(e.to_string()))
}

fn is_bound_to(resolved: &ResolveResult<'_>, ns: &str) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(uri)) if *uri == ns.as_bytes())
}

/// Accumulates the fields of one profile element.
struct ProfileBuilder {
    /// Depth of the profile element itself
    depth: usize,
    values: BTreeMap<String, Vec<String>>,
    field: Option<Field>,
}

struct Field {
    name: String,
    text: String,
    nested: bool,
    child: Option<(String, String)>,
}

impl ProfileBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            values: BTreeMap::new(),
            field: None,
        }
    }

    fn open(&mut self, depth: usize, name: String) {
        if depth == self.depth + 1 {
            self.field = Some(Field {
                name,
                text: String::new(),
                nested: false,
                child: None,
            });
        } else if depth == self.depth + 2 {
            if let Some(field) = self.field.as_mut() {
                field.nested = true;
                field.child = Some((name, String::new()));
            }
        }
        // Anything deeper folds its text into the enclosing child.
    }

    fn text(&mut self, text: &str) {
        if let Some(field) = self.field.as_mut() {
            match field.child.as_mut() {
                Some((_, value)) => value.push_str(text),
                None => field.text.push_str(text),
            }
        }
    }

    fn close(&mut self, depth: usize) {
        if depth == self.depth + 2 {
            if let Some(field) = self.field.as_mut() {
                if let Some((child, value)) = field.child.take() {
                    let key = if field.name == OBJ_MODELS {
                        field.name.clone()
                    } else {
                        format!("{}.{child}", field.name)
                    };
                    self.values.entry(key).or_default().push(value);
                }
            }
        } else if depth == self.depth + 1 {
            if let Some(field) = self.field.take() {
                let values = self.values.entry(field.name.clone()).or_default();
                if !field.nested && !(field.name == OBJ_MODELS && field.text.is_empty()) {
                    values.push(field.text);
                }
                if field.nested && values.is_empty() && field.name != OBJ_MODELS {
                    self.values.remove(&field.name);
                }
            }
        }
    }

    fn finish(self) -> ProfileRecord {
        ProfileRecord::from_values(self.values)
    }
}

/// Errors that can occur while parsing profile XML.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    /// The document is not well-formed
    #[error("malformed profile XML: {0}")]
    Malformed(String),
    /// The XML reader rejected the document
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for ProfileError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASTREAM_PROFILE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<datastreamProfile xmlns="http://www.fedora.info/definitions/1/0/management/"
    pid="demo:1" dsID="DC">
  <dsLabel>Dublin Core Record &amp; more</dsLabel>
  <dsVersionID>DC1.0</dsVersionID>
  <dsCreateDate>2011-07-11T16:48:13.536Z</dsCreateDate>
  <dsState>A</dsState>
  <dsMIME>text/xml</dsMIME>
  <dsFormatURI>http://www.openarchives.org/OAI/2.0/oai_dc/</dsFormatURI>
  <dsControlGroup>X</dsControlGroup>
  <dsSize>491</dsSize>
  <dsVersionable>true</dsVersionable>
  <dsInfoType/>
  <dsAltID>alt1</dsAltID>
  <dsAltID>alt2</dsAltID>
  <dsChecksumType>DISABLED</dsChecksumType>
  <dsChecksum>none</dsChecksum>
</datastreamProfile>"#;

    const REPOSITORY_PROFILE: &str = r#"<fedoraRepository xmlns="http://www.fedora.info/definitions/1/0/access/">
  <repositoryName>Fedora Repository</repositoryName>
  <repositoryBaseURL>http://localhost:8080/fedora</repositoryBaseURL>
  <repositoryVersion>3.8</repositoryVersion>
  <repositoryPID>
    <PID-namespaceIdentifier>changeme</PID-namespaceIdentifier>
    <PID-delimiter>:</PID-delimiter>
  </repositoryPID>
  <objModels>model1</objModels>
  <objModels>model2</objModels>
  <objModels>model3</objModels>
  <adminEmail>bob@example.org</adminEmail>
  <adminEmail>sally@example.org</adminEmail>
</fedoraRepository>"#;

    const OBJECT_PROFILE: &str = r#"<objectProfile xmlns="http://www.fedora.info/definitions/1/0/access/" pid="demo:1">
  <objLabel>Demo object</objLabel>
  <objOwnerId>fedoraAdmin</objOwnerId>
  <objModels>
    <model>info:fedora/fedora-system:FedoraObject-3.0</model>
  </objModels>
  <objCreateDate>2011-07-11T16:48:13.536Z</objCreateDate>
  <objLastModDate>2011-07-12T09:00:00.000Z</objLastModDate>
  <objState>A</objState>
</objectProfile>"#;

    const DATASTREAM_HISTORY: &str = r#"<datastreamHistory pid="demo:1" dsID="DC">
  <datastreamProfile pid="demo:1" dsID="DC">
    <dsVersionID>DC.1</dsVersionID>
    <dsCreateDate>2011-07-11T16:48:13.536Z</dsCreateDate>
    <dsLabel>first</dsLabel>
  </datastreamProfile>
  <datastreamProfile pid="demo:1" dsID="DC">
    <dsVersionID>DC.0</dsVersionID>
    <dsCreateDate>2010-01-01T00:00:00.000Z</dsCreateDate>
    <dsLabel>second</dsLabel>
  </datastreamProfile>
</datastreamHistory>"#;

    #[test]
    fn field_values_keep_inner_whitespace() {
        let xml = format!(
            r#"<datastreamProfile xmlns="{MANAGEMENT_NS}">
  <dsLabel>  padded label  </dsLabel>
  <dsLocation>part one <![CDATA[<two>]]> three</dsLocation>
</datastreamProfile>"#
        );
        let record = parse_datastream_profile(&xml).unwrap();
        assert_eq!(record.get_str("dsLabel"), Some("  padded label  "));
        assert_eq!(record.get_str("dsLocation"), Some("part one <two> three"));
    }

    #[test]
    fn datastream_profile_fields() {
        let record = parse_datastream_profile(DATASTREAM_PROFILE).unwrap();

        assert_eq!(record.get_str("dsLabel"), Some("Dublin Core Record & more"));
        assert_eq!(record.get_str("dsControlGroup"), Some("X"));
        assert_eq!(record.get_str("dsInfoType"), Some(""));
        assert_eq!(record.get_u64("dsSize"), Some(491));
        assert_eq!(record.get_bool("dsVersionable"), Some(true));
        assert_eq!(
            record.get_datetime("dsCreateDate").unwrap().to_rfc3339(),
            "2011-07-11T16:48:13.536+00:00"
        );
        assert_eq!(
            record.get("dsAltID"),
            Some(&ProfileValue::List(vec!["alt1".into(), "alt2".into()]))
        );
    }

    #[test]
    fn single_obj_model_stays_a_list() {
        let record = parse_object_profile(OBJECT_PROFILE).unwrap();
        assert_eq!(
            record.get(OBJ_MODELS),
            Some(&ProfileValue::List(vec![
                "info:fedora/fedora-system:FedoraObject-3.0".into()
            ]))
        );
        assert_eq!(record.get_str("objState"), Some("A"));
        assert_eq!(record.get_str("objOwnerId"), Some("fedoraAdmin"));

        let xml = "<datastreamProfile><objModels>only</objModels><dsState>A</dsState></datastreamProfile>";
        let record = parse_datastream_profile(xml).unwrap();
        assert_eq!(
            record.get(OBJ_MODELS),
            Some(&ProfileValue::List(vec!["only".into()]))
        );
        assert_eq!(record.get("dsState"), Some(&ProfileValue::Scalar("A".into())));
    }

    #[test]
    fn repository_profile_scenario() {
        let record = parse_repository_profile(REPOSITORY_PROFILE).unwrap();

        assert_eq!(record.get_str("repositoryVersion"), Some("3.8"));
        assert_eq!(
            record.get(OBJ_MODELS),
            Some(&ProfileValue::List(vec![
                "model1".into(),
                "model2".into(),
                "model3".into()
            ]))
        );
        assert_eq!(record.get_values("adminEmail").len(), 2);
        assert_eq!(record.get_str("repositoryPID.PID-delimiter"), Some(":"));
        assert!(record.get("repositoryPID").is_none());
    }

    #[test]
    fn repository_profile_without_namespace() {
        let xml = "<fedoraRepository><repositoryVersion>3.4</repositoryVersion></fedoraRepository>";
        let record = parse_repository_profile(xml).unwrap();
        assert_eq!(record.get_str("repositoryVersion"), Some("3.4"));
    }

    #[test]
    fn malformed_repository_profile_is_absent() {
        assert!(parse_repository_profile("<fedoraRepository><a></b></fedoraRepository>").is_none());
        assert!(parse_repository_profile("<fedoraRepository><a>").is_none());
        assert!(parse_repository_profile("this is not xml").is_none());
    }

    #[test]
    fn malformed_profiles_are_errors() {
        assert!(parse_object_profile("<objectProfile><objState>A</objectProfile>").is_err());
        assert!(parse_datastream_profile("<datastreamProfile>").is_err());
    }

    #[test]
    fn blank_profile_is_empty() {
        assert!(parse_datastream_profile("").unwrap().is_empty());
        assert!(parse_object_profile("  \n").unwrap().is_empty());
    }

    #[test]
    fn foreign_namespace_root_is_empty() {
        let xml = r#"<datastreamProfile xmlns="urn:other"><dsState>A</dsState></datastreamProfile>"#;
        assert!(parse_datastream_profile(xml).unwrap().is_empty());
    }

    #[test]
    fn datastream_history_with_and_without_namespace() {
        let declared = DATASTREAM_HISTORY.replacen(
            "<datastreamHistory",
            r#"<datastreamHistory xmlns="http://www.fedora.info/definitions/1/0/management/""#,
            1,
        );

        let bare = parse_datastream_history(DATASTREAM_HISTORY).unwrap();
        let namespaced = parse_datastream_history(&declared).unwrap();

        assert_eq!(bare, namespaced);
        assert_eq!(bare.len(), 2);
        assert_eq!(
            bare["2011-07-11T16:48:13.536Z"].get_str("dsLabel"),
            Some("first")
        );
        assert_eq!(
            bare["2010-01-01T00:00:00.000Z"].get_str("dsVersionID"),
            Some("DC.0")
        );
    }

    #[test]
    fn datastream_history_duplicate_timestamp_last_wins() {
        let xml = r#"<datastreamHistory>
  <datastreamProfile><dsCreateDate>t</dsCreateDate><dsLabel>a</dsLabel></datastreamProfile>
  <datastreamProfile><dsCreateDate>t</dsCreateDate><dsLabel>b</dsLabel></datastreamProfile>
</datastreamHistory>"#;
        let versions = parse_datastream_history(xml).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions["t"].get_str("dsLabel"), Some("b"));
    }

    #[test]
    fn object_history_dates_in_order() {
        let xml = r#"<fedoraObjectHistory pid="demo:1">
  <objectChangeDate>2011-07-11T16:48:13.536Z</objectChangeDate>
  <objectChangeDate>2011-07-12T09:00:00.000Z</objectChangeDate>
</fedoraObjectHistory>"#;
        let dates = parse_object_history(xml).unwrap();
        assert_eq!(
            dates,
            vec!["2011-07-11T16:48:13.536Z", "2011-07-12T09:00:00.000Z"]
        );

        let single = "<fedoraObjectHistory><objectChangeDate>d</objectChangeDate></fedoraObjectHistory>";
        assert_eq!(parse_object_history(single).unwrap(), vec!["d"]);
    }

    #[test]
    fn namespace_injection_only_touches_whole_tag() {
        let xml = "<datastreamProfiles><datastreamProfile/></datastreamProfiles>";
        let injected = with_default_namespace(xml, DATASTREAM_ROOT, MANAGEMENT_NS);
        assert_eq!(
            injected,
            format!(
                "<datastreamProfiles><datastreamProfile xmlns=\"{MANAGEMENT_NS}\"/></datastreamProfiles>"
            )
        );

        let declared = r#"<a xmlns="urn:x"/>"#;
        assert!(matches!(
            with_default_namespace(declared, "a", ACCESS_NS),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn record_serializes_scalars_and_lists() {
        let record = parse_repository_profile(REPOSITORY_PROFILE).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["repositoryVersion"], "3.8");
        assert_eq!(json["objModels"][2], "model3");
    }
}
