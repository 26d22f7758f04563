#![cfg(feature = "sentences")]

use nmea0183_stream::{
    Cardinal, ChecksumMode, DispatchError, Dispatcher, Framer, ParsedRecord, Registry,
    SentenceData, SentenceType, StreamDecoder, parse_time,
};

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
const GLL: &[u8] = b"$GPGLL,4916.45,N,12311.12,W,225444,A*31\r\n";

fn decode_chunks(
    registry: &Registry,
    chunks: &[&[u8]],
) -> Vec<Result<ParsedRecord, DispatchError>> {
    let mut decoder = StreamDecoder::new(Dispatcher::new(registry));
    chunks.iter().flat_map(|chunk| decoder.decode(chunk)).collect()
}

/// Sentence type and error count of each outcome.
fn summary(
    outcomes: &[Result<ParsedRecord, DispatchError>],
) -> Vec<Result<(SentenceType, u32), DispatchError>> {
    outcomes
        .iter()
        .map(|outcome| match outcome {
            Ok(record) => Ok((record.sentence_type(), record.errors())),
            Err(error) => Err(error.clone()),
        })
        .collect()
}

#[test]
fn test_gga_then_gll() {
    let registry = Registry::builtin().unwrap();
    let stream = [GGA, GLL].concat();

    let mut framer = Framer::new();
    let mut sentences = Vec::new();
    framer.feed(&stream, |sentence| sentences.push(sentence.as_bytes().to_vec()));
    assert_eq!(sentences, [GGA.to_vec(), GLL.to_vec()]);
    assert!(framer.buffered().is_empty());

    let outcomes = decode_chunks(&registry, &[stream.as_slice()]);
    assert_eq!(
        summary(&outcomes),
        [Ok((SentenceType::Gga, 0)), Ok((SentenceType::Gll, 0))]
    );
}

#[test]
fn test_chunking_independence() {
    let registry = Registry::builtin().unwrap();
    let stream = [
        b"\x17\x00line noise".as_slice(),
        GGA,
        b"$GPGSV,3,1,11,03,03,111,00\r\n",
        b"$GPGLL,4916.45,N,def,W,225444,A\r\n",
        GLL,
        b"$GPGGA,12",
    ]
    .concat();

    let expected = summary(&decode_chunks(&registry, &[stream.as_slice()]));
    assert_eq!(expected.len(), 4);

    for split in 0..=stream.len() {
        let (head, tail) = stream.split_at(split);
        let outcomes = decode_chunks(&registry, &[head, tail]);
        assert_eq!(summary(&outcomes), expected, "split at {split}");
    }

    for size in [1, 2, 3, 64] {
        let chunks: Vec<&[u8]> = stream.chunks(size).collect();
        assert_eq!(summary(&decode_chunks(&registry, &chunks)), expected, "chunks of {size}");
    }
}

#[test]
fn test_noise_yields_nothing() {
    let registry = Registry::builtin().unwrap();
    let outcomes = decode_chunks(&registry, &[b"GPGGA,1,2,3\r\n", b"\r\n\r\n", b"*47\r\n"]);
    assert!(outcomes.is_empty());
}

#[test]
fn test_lone_carriage_return() {
    let registry = Registry::builtin().unwrap();
    let outcomes = decode_chunks(
        &registry,
        &[b"$GPGLL,4916.45,N,12311.12,W,22", b"5444,A\r", b",A\r\n"],
    );

    assert_eq!(outcomes.len(), 1);
    let record = outcomes[0].as_ref().unwrap();
    assert_eq!(record.sentence_type(), SentenceType::Gll);
    assert_eq!(record.errors(), 1);
}

#[test]
fn test_corrupted_field() {
    let registry = Registry::builtin().unwrap();
    let outcomes = decode_chunks(&registry, &[b"$GPGLL,4916.45,N,def,W,225444,A\r\n"]);

    let record = outcomes[0].as_ref().unwrap();
    assert!(record.errors() > 0);

    let data = outcomes
        .into_iter()
        .next()
        .and_then(Result::ok)
        .map(ParsedRecord::into_data);
    let Some(SentenceData::Gll(gll)) = data else {
        panic!("expected a GLL record");
    };
    assert_eq!(gll.longitude, None);
    assert_eq!(gll.latitude.map(|l| l.cardinal), Some(Cardinal::North));
    assert_eq!(gll.time, Some(parse_time("225444").unwrap()));
}

#[test]
fn test_checksum_verification() {
    let registry = Registry::builtin().unwrap();
    let dispatcher = Dispatcher::new(&registry).checksum_mode(ChecksumMode::Required);
    let mut decoder = StreamDecoder::new(dispatcher);

    let outcomes = decoder.decode(&[GLL, b"$GPGLL,4916.45,N,12311.12,W,225444,A*30\r\n"].concat());
    assert!(outcomes[0].is_ok());
    assert_eq!(
        outcomes[1].as_ref().err(),
        Some(&DispatchError::ChecksumMismatch {
            expected: 0x31,
            found: 0x30
        })
    );
    assert_eq!(decoder.stats().checksum_failures, 1);
}

#[test]
fn test_time_of_day() {
    assert_eq!(parse_time("235959").unwrap().as_hms(), (23, 59, 59));
    assert!(parse_time("12345").is_err());
}
