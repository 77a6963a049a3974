use odata_json::{
    AnnotationFilter, AnnotationOwner, JsonError, ReaderSettings, ReferenceLinksDeserializer,
    ReferenceLinksSerializer, WriterSettings,
};
use odata_types::{EntityReferenceLink, EntityReferenceLinks, InstanceAnnotation, ODataValue};
use pretty_assertions::assert_eq;
use url::Url;

const CONTEXT: &str = "http://odata.org/test/$metadata#Collection($ref)";

/// Installs a test subscriber; `RUST_LOG=odata_json=trace` shows codec passes.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .compact()
        .try_init();
}

fn link(url: &str) -> EntityReferenceLink {
    EntityReferenceLink::parse(url).unwrap()
}

fn two_links() -> EntityReferenceLinks {
    EntityReferenceLinks::with_links(vec![
        link("http://host/Customers(1)").with_annotation(InstanceAnnotation::new("Is.New", true)),
        link("http://host/Customers(2)")
            .with_annotation(InstanceAnnotation::new("TestNamespace.unknown", 123))
            .with_annotation(InstanceAnnotation::new("custom.annotation", 456)),
    ])
}

fn serializer() -> ReferenceLinksSerializer {
    ReferenceLinksSerializer::new(WriterSettings::new(CONTEXT))
}

fn deserializer() -> ReferenceLinksDeserializer {
    ReferenceLinksDeserializer::new(ReaderSettings::default())
}

fn write(links: &EntityReferenceLinks) -> String {
    String::from_utf8(serializer().write_entity_reference_links(links).unwrap()).unwrap()
}

fn read(payload: &str) -> Result<EntityReferenceLinks, JsonError> {
    deserializer().read_entity_reference_links(payload.as_bytes())
}

// ── Writing ───────────────────────────────────────────────────────

#[test]
fn writes_link_annotations_in_order() {
    assert_eq!(
        write(&two_links()),
        "{\"@odata.context\":\"http://odata.org/test/$metadata#Collection($ref)\",\
         \"value\":[{\"@odata.id\":\"http://host/Customers(1)\",\"@Is.New\":true},\
         {\"@odata.id\":\"http://host/Customers(2)\",\"@TestNamespace.unknown\":123,\"@custom.annotation\":456}]}"
    );
}

#[test]
fn writes_collection_annotations_before_value() {
    let links = EntityReferenceLinks::with_links(vec![link("http://host/Customers(1)")])
        .with_annotation(InstanceAnnotation::new("TestNamespace.name", 321))
        .with_annotation(InstanceAnnotation::new("custom.name", 654));
    assert_eq!(
        write(&links),
        "{\"@odata.context\":\"http://odata.org/test/$metadata#Collection($ref)\",\
         \"@TestNamespace.name\":321,\"@custom.name\":654,\
         \"value\":[{\"@odata.id\":\"http://host/Customers(1)\"}]}"
    );
}

#[test]
fn writes_count_first_and_next_link_last() {
    let mut links = EntityReferenceLinks::with_links(vec![link("http://host/Customers(1)")])
        .with_annotation(InstanceAnnotation::new("ns.a", "x"));
    links.count = Some(10);
    links.next_page_link = Some(Url::parse("http://host/Customers?$skiptoken=1").unwrap());
    assert_eq!(
        write(&links),
        "{\"@odata.context\":\"http://odata.org/test/$metadata#Collection($ref)\",\
         \"@odata.count\":10,\"@ns.a\":\"x\",\
         \"value\":[{\"@odata.id\":\"http://host/Customers(1)\"}],\
         \"@odata.nextLink\":\"http://host/Customers?$skiptoken=1\"}"
    );
}

#[test]
fn ieee754_writes_count_and_int64_as_strings() {
    let mut links = EntityReferenceLinks::with_links(vec![])
        .with_annotation(InstanceAnnotation::new("ns.big", 9_007_199_254_740_993_i64))
        .with_annotation(InstanceAnnotation::new("ns.small", 7));
    links.count = Some(3);
    let settings = WriterSettings {
        ieee754_compatible: true,
        ..WriterSettings::new(CONTEXT)
    };
    let bytes = ReferenceLinksSerializer::new(settings)
        .write_entity_reference_links(&links)
        .unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "{\"@odata.context\":\"http://odata.org/test/$metadata#Collection($ref)\",\
         \"@odata.count\":\"3\",\"@ns.big\":\"9007199254740993\",\"@ns.small\":7,\"value\":[]}"
    );
}

#[test]
fn empty_and_unpopulated_collections_write_empty_value() {
    let expected = format!("{{\"@odata.context\":\"{CONTEXT}\",\"value\":[]}}");
    assert_eq!(write(&EntityReferenceLinks::with_links(vec![])), expected);
    assert_eq!(write(&EntityReferenceLinks::new()), expected);
}

#[test]
fn duplicate_link_annotation_fails_write() {
    init_tracing();
    let links = EntityReferenceLinks::with_links(vec![
        link("http://host/Customers(1)"),
        link("http://host/Customers(2)")
            .with_annotation(InstanceAnnotation::new("TestNamespace.unknown", 123))
            .with_annotation(InstanceAnnotation::new("TestNamespace.unknown", 456)),
    ]);
    let err = serializer().write_entity_reference_links(&links).unwrap_err();
    assert!(matches!(
        &err,
        JsonError::DuplicateAnnotation { name, owner: AnnotationOwner::Link(1) }
            if name == "TestNamespace.unknown"
    ));
    assert_eq!(
        err.to_string(),
        "duplicate instance annotation 'TestNamespace.unknown' on link 1"
    );
}

#[test]
fn duplicate_collection_annotation_fails_write() {
    let links = EntityReferenceLinks::with_links(vec![])
        .with_annotation(InstanceAnnotation::new("TestNamespace.name", 321))
        .with_annotation(InstanceAnnotation::new("TestNamespace.name", 654));
    let err = serializer().write_entity_reference_links(&links).unwrap_err();
    assert!(matches!(
        err,
        JsonError::DuplicateAnnotation { owner: AnnotationOwner::Collection, .. }
    ));
}

#[test]
fn same_name_on_different_owners_is_allowed() {
    let links = EntityReferenceLinks::with_links(vec![
        link("http://host/A(1)").with_annotation(InstanceAnnotation::new("ns.flag", true)),
        link("http://host/A(2)").with_annotation(InstanceAnnotation::new("ns.flag", false)),
    ])
    .with_annotation(InstanceAnnotation::new("ns.flag", true));
    let written = write(&links);
    assert_eq!(read(&written).unwrap(), links);
}

#[test]
fn reserved_annotation_names_are_rejected() {
    for name in ["odata.count", ""] {
        let links = EntityReferenceLinks::with_links(vec![])
            .with_annotation(InstanceAnnotation::new(name, 1));
        let err = serializer().write_entity_reference_links(&links).unwrap_err();
        assert!(matches!(err, JsonError::InvalidAnnotationName(ref n) if n == name));
    }
}

#[test]
fn writer_filter_drops_annotations_but_still_checks_duplicates() {
    let settings = WriterSettings::new(CONTEXT)
        .with_annotation_filter(AnnotationFilter::parse("TestNamespace.*").unwrap());
    let writer = ReferenceLinksSerializer::new(settings);

    let bytes = writer.write_entity_reference_links(&two_links()).unwrap();
    let written = String::from_utf8(bytes).unwrap();
    assert!(written.contains("\"@TestNamespace.unknown\":123"));
    assert!(!written.contains("Is.New"));
    assert!(!written.contains("custom.annotation"));

    let duplicated = EntityReferenceLinks::with_links(vec![])
        .with_annotation(InstanceAnnotation::new("custom.x", 1))
        .with_annotation(InstanceAnnotation::new("custom.x", 2));
    assert!(matches!(
        writer.write_entity_reference_links(&duplicated),
        Err(JsonError::DuplicateAnnotation { .. })
    ));
}

// ── Reading ───────────────────────────────────────────────────────

#[test]
fn reads_link_annotations() {
    let payload = r#"{"@odata.context":"http://odata.org/test/$metadata#Collection($ref)","value":[{"@odata.id":"http://host/Customers(1)","@Is.New":true},{"@odata.id":"http://host/Customers(2)","@TestNamespace.unknown":123,"@custom.annotation":456}]}"#;
    assert_eq!(read(payload).unwrap(), two_links());
}

#[test]
fn reads_collection_annotations_before_and_after_value() {
    let payload = r#"{"@odata.context":"http://odata.org/test/$metadata#Collection($ref)","@TestNamespace.name":321,"value":[],"@custom.name":654}"#;
    let links = read(payload).unwrap();
    assert_eq!(
        links.instance_annotations,
        vec![
            InstanceAnnotation::new("TestNamespace.name", 321),
            InstanceAnnotation::new("custom.name", 654),
        ]
    );
    assert!(links.is_populated());
    assert!(links.links().is_empty());
}

#[test]
fn reads_count_as_number_or_string() {
    let number = read(r#"{"@odata.count":5,"value":[]}"#).unwrap();
    let string = read(r#"{"@odata.count":"5","value":[]}"#).unwrap();
    assert_eq!(number.count, Some(5));
    assert_eq!(string.count, Some(5));
    assert!(matches!(
        read(r#"{"@odata.count":"five","value":[]}"#),
        Err(JsonError::Malformed(_))
    ));
}

#[test]
fn reads_next_link() {
    let links = read(r#"{"value":[],"@odata.nextLink":"http://host/Customers?$skiptoken=9"}"#).unwrap();
    assert_eq!(
        links.next_page_link,
        Some(Url::parse("http://host/Customers?$skiptoken=9").unwrap())
    );
}

#[test]
fn duplicate_link_annotation_fails_read() {
    init_tracing();
    let payload = r#"{"value":[{"@odata.id":"http://host/Customers(1)","@TestNamespace.unknown":123,"@TestNamespace.unknown":456}]}"#;
    let err = read(payload).unwrap_err();
    assert!(matches!(
        &err,
        JsonError::DuplicateAnnotation { name, owner: AnnotationOwner::Link(0) }
            if name == "TestNamespace.unknown"
    ));
}

#[test]
fn duplicate_collection_annotation_fails_read_across_value() {
    let payload = r#"{"@custom.name":1,"value":[],"@custom.name":2}"#;
    let err = read(payload).unwrap_err();
    assert!(matches!(
        err,
        JsonError::DuplicateAnnotation { owner: AnnotationOwner::Collection, .. }
    ));
}

#[test]
fn filtered_out_duplicates_still_fail_read() {
    let reader = ReferenceLinksDeserializer::new(
        ReaderSettings::default().with_annotation_filter(AnnotationFilter::none()),
    );
    let ok = reader
        .read_entity_reference_links(br#"{"@ns.a":1,"value":[{"@odata.id":"http://h/A(1)","@ns.b":2}]}"#)
        .unwrap();
    assert!(ok.instance_annotations.is_empty());
    assert!(ok.links()[0].instance_annotations.is_empty());

    let err = reader
        .read_entity_reference_links(br#"{"@ns.a":1,"@ns.a":2,"value":[]}"#)
        .unwrap_err();
    assert!(matches!(err, JsonError::DuplicateAnnotation { .. }));
}

#[test]
fn reader_filter_keeps_matching_annotations() {
    let reader = ReferenceLinksDeserializer::new(
        ReaderSettings::default()
            .with_annotation_filter(AnnotationFilter::parse("*,-custom.*").unwrap()),
    );
    let payload = r#"{"value":[{"@odata.id":"http://host/Customers(2)","@TestNamespace.unknown":123,"@custom.annotation":456}]}"#;
    let links = reader.read_entity_reference_links(payload.as_bytes()).unwrap();
    assert_eq!(
        links.links()[0].instance_annotations,
        vec![InstanceAnnotation::new("TestNamespace.unknown", 123)]
    );
}

#[test]
fn structured_annotation_values() {
    let links = read(r#"{"@ns.obj":{"b":[1,2.5,null],"a":"x"},"value":[]}"#).unwrap();
    assert_eq!(
        links.instance_annotations[0].value,
        ODataValue::Resource(vec![
            (
                "b".into(),
                ODataValue::Collection(vec![
                    ODataValue::Int32(1),
                    ODataValue::Double(2.5),
                    ODataValue::Null,
                ]),
            ),
            ("a".into(), ODataValue::String("x".into())),
        ])
    );
}

#[test]
fn malformed_payloads() {
    let cases = [
        r#"{"@odata.context":"x"}"#,
        r#"{"value":{}}"#,
        r#"{"value":[],"value":[]}"#,
        r#"{"value":[],"other":1}"#,
        r#"{"value":[{"@ns.a":1}]}"#,
        r#"{"value":[{"@odata.id":"not a url"}]}"#,
        r#"{"value":[{"@odata.id":"http://h/A(1)","name":1}]}"#,
        r#"{"value":[{"@odata.id":"http://h/A(1)","@odata.id":"http://h/A(2)"}]}"#,
        r##"{"value":[],"@odata.type":"#Collection"}"##,
        r#"{"value":[1]}"#,
        r#"[]"#,
    ];
    for payload in cases {
        assert!(
            matches!(read(payload), Err(JsonError::Malformed(_))),
            "{payload}"
        );
    }
}

#[test]
fn syntax_errors_are_json_errors() {
    assert!(matches!(read(r#"{"value":["#), Err(JsonError::Json(_))));
    assert!(matches!(read(r#"{"value":[]} trailing"#), Err(JsonError::Json(_))));
}

// ── Round trip ────────────────────────────────────────────────────

#[test]
fn write_then_read_preserves_model() {
    init_tracing();
    let mut links = two_links()
        .with_annotation(InstanceAnnotation::new("TestNamespace.name", 321))
        .with_annotation(InstanceAnnotation::new("custom.name", "654"));
    links.count = Some(2);
    links.next_page_link = Some(Url::parse("http://host/Customers?$skip=2").unwrap());
    assert_eq!(read(&write(&links)).unwrap(), links);
}

#[test]
fn ieee754_round_trip_reads_count_back() {
    let mut links = EntityReferenceLinks::with_links(vec![link("http://host/A(1)")]);
    links.count = Some(i64::MAX);
    let settings = WriterSettings {
        ieee754_compatible: true,
        ..WriterSettings::new(CONTEXT)
    };
    let bytes = ReferenceLinksSerializer::new(settings)
        .write_entity_reference_links(&links)
        .unwrap();
    assert_eq!(deserializer().read_entity_reference_links(&bytes).unwrap().count, Some(i64::MAX));
}

// ── Single link ───────────────────────────────────────────────────

#[test]
fn single_link_payload() {
    let writer = ReferenceLinksSerializer::new(WriterSettings::new("http://odata.org/test/$metadata#$ref"));
    let single = link("http://host/Orders(7)").with_annotation(InstanceAnnotation::new("ns.note", "hi"));
    let bytes = writer.write_entity_reference_link(&single).unwrap();
    assert_eq!(
        String::from_utf8(bytes.clone()).unwrap(),
        r#"{"@odata.context":"http://odata.org/test/$metadata#$ref","@odata.id":"http://host/Orders(7)","@ns.note":"hi"}"#
    );
    assert_eq!(deserializer().read_entity_reference_link(&bytes).unwrap(), single);
}

#[test]
fn single_link_rejects_duplicates_and_missing_id() {
    let reader = deserializer();
    assert!(matches!(
        reader.read_entity_reference_link(br#"{"@odata.id":"http://h/A(1)","@ns.a":1,"@ns.a":1}"#),
        Err(JsonError::DuplicateAnnotation { .. })
    ));
    assert!(matches!(
        reader.read_entity_reference_link(br#"{"@odata.context":"x"}"#),
        Err(JsonError::Malformed(_))
    ));
}

// ── Value fidelity ────────────────────────────────────────────────

#[test]
fn int64_annotation_round_trips_regardless_of_width() {
    let links = EntityReferenceLinks::with_links(vec![
        link("http://host/A(1)").with_annotation(InstanceAnnotation::new("ns.n", 5_i64)),
    ])
    .with_annotation(InstanceAnnotation::new("ns.big", i64::MIN));
    let back = read(&write(&links)).unwrap();
    assert_eq!(back, links);
    assert_eq!(back.links()[0].instance_annotations[0].value.as_i64(), Some(5));
}

#[test]
fn ieee754_annotation_values_round_trip() {
    let links = EntityReferenceLinks::with_links(vec![
        link("http://host/A(1)")
            .with_annotation(InstanceAnnotation::new("ns.big", 9_007_199_254_740_993_i64))
            .with_annotation(InstanceAnnotation::new(
                "ns.nested",
                ODataValue::Collection(vec![ODataValue::Int64(-42), "text".into()]),
            )),
    ]);
    let writer = ReferenceLinksSerializer::new(WriterSettings {
        ieee754_compatible: true,
        ..WriterSettings::new(CONTEXT)
    });
    let bytes = writer.write_entity_reference_links(&links).unwrap();

    let reader = ReferenceLinksDeserializer::new(ReaderSettings {
        ieee754_compatible: true,
        ..ReaderSettings::default()
    });
    assert_eq!(reader.read_entity_reference_links(&bytes).unwrap(), links);

    // Without the matching reader mode the strings stay strings.
    let plain = deserializer().read_entity_reference_links(&bytes).unwrap();
    assert_eq!(
        plain.links()[0].instance_annotations[0].value,
        ODataValue::String("9007199254740993".into())
    );
}

#[test]
fn ieee754_reader_leaves_non_canonical_numbers_as_strings() {
    let reader = ReferenceLinksDeserializer::new(ReaderSettings {
        ieee754_compatible: true,
        ..ReaderSettings::default()
    });
    let links = reader
        .read_entity_reference_links(br#"{"@ns.a":"+5","@ns.b":"007","@ns.c":"12","value":[]}"#)
        .unwrap();
    let values: Vec<_> = links.instance_annotations.iter().map(|a| a.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            ODataValue::String("+5".into()),
            ODataValue::String("007".into()),
            ODataValue::Int64(12),
        ]
    );
}

#[test]
fn non_finite_doubles_use_protocol_literals() {
    let links = EntityReferenceLinks::with_links(vec![])
        .with_annotation(InstanceAnnotation::new("ns.nan", f64::NAN))
        .with_annotation(InstanceAnnotation::new("ns.inf", f64::INFINITY));
    let written = write(&links);
    assert!(written.contains(r#""@ns.nan":"NaN","@ns.inf":"INF""#));
    assert_eq!(
        serde_json::to_string(&links.instance_annotations[0].value).unwrap(),
        r#""NaN""#
    );
}

#[test]
fn odata_id_is_normalized_on_read() {
    let links = read(r#"{"value":[{"@odata.id":"HTTP://Host"}]}"#).unwrap();
    assert_eq!(links.links()[0].url.as_str(), "http://host/");
    assert!(write(&links).contains(r#""@odata.id":"http://host/""#));
}
