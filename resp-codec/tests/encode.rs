//! Argument encoding: element counts and wire framing.

use bytes::Bytes;
use resp_codec::types::{
    GeoPos, JsonValue, MemoryInfo, Score, ScoreMember, SearchDocument, Status, StreamEntry,
    StreamId,
};
use resp_codec::{Command, ToArgs, Value, cmd};

/// The declared count must equal what is written, and the framed command
/// must parse back as an array of that many bulk strings.
fn assert_frames<T: ToArgs>(value: T, expected: usize) {
    assert_eq!(value.arg_count(), expected);
    let mut out = Vec::new();
    value.write_args(&mut out);
    assert_eq!(out.len(), expected);

    let wire = Command::new("CMD").arg(&value).to_bytes().unwrap();
    let (reply, consumed) = Value::parse(&wire).unwrap();
    assert_eq!(consumed, wire.len());
    assert_eq!(reply.as_array().map(<[Value]>::len), Some(1 + expected));
}

#[test]
fn test_record_counts() {
    assert_frames(GeoPos::new(-122.27652, 37.805186), 2);
    assert_frames(ScoreMember::new(1.0, "m"), 2);
    assert_frames(Score { value: 0.5 }, 1);
    assert_frames(StreamId::new(1, 2), 1);
    assert_frames(Status::new("OK"), 1);
    assert_frames(JsonValue::Null, 1);
    assert_frames(MemoryInfo::default(), 0);
}

#[test]
fn test_record_counts_empty_and_populated() {
    assert_frames(StreamEntry::default(), 1);
    assert_frames(
        StreamEntry {
            id: StreamId::new(3, 0),
            fields: vec![("a".into(), "1".into()), ("b".into(), "2".into())],
        },
        5,
    );

    assert_frames(SearchDocument::default(), 1);
    assert_frames(
        SearchDocument {
            id: "doc".into(),
            fields: vec!["f".into()],
            values: vec!["v".into()],
        },
        3,
    );

    assert_frames(Vec::<GeoPos>::new(), 0);
    assert_frames(vec![GeoPos::new(1.0, 2.0), GeoPos::new(3.0, 4.0)], 4);
}

#[test]
fn test_geoadd_frame() {
    let cmd = cmd!("GEOADD", "places", (GeoPos::new(13.5, 38.25), "palermo"));
    assert_eq!(
        &cmd.to_bytes().unwrap()[..],
        &b"*5\r\n$6\r\nGEOADD\r\n$6\r\nplaces\r\n$4\r\n13.5\r\n$5\r\n38.25\r\n$7\r\npalermo\r\n"[..]
    );
}

#[test]
fn test_binary_safe_arguments() {
    let payload = Bytes::from_static(b"\r\n\x00$*");
    let wire = cmd!("SET", "k", payload.clone()).to_bytes().unwrap();
    let (reply, _) = Value::parse(&wire).unwrap();
    assert_eq!(reply.as_array().unwrap()[2].as_bytes(), Some(&payload[..]));
}

#[test]
fn test_encode_into_existing_buffer() {
    let mut buf = bytes::BytesMut::new();
    cmd!("PING").encode(&mut buf).unwrap();
    cmd!("ECHO", "hi").encode(&mut buf).unwrap();
    assert_eq!(&buf[..], b"*1\r\n$4\r\nPING\r\n*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n");
}
