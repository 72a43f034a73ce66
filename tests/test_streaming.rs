mod common;

use common::{assert_split_invariant, record, Event, Recorder};
use httpspan::http::trace::Trace;
use httpspan::{ErrorKind, MessageKind, Outcome, Parser, Settings, Strictness};

const REQUESTS: &[&[u8]] = &[
    b"OPTIONS /url HTTP/1.1\r\nHeader1: Value1\r\nHeader2:\t Value2\r\n\r\n",
    b"PUT /url HTTP/1.1\r\nContent-Length: 003\r\n\r\nabc",
    b"PUT /url HTTP/1.1\r\nConnection: upgrade\r\nUpgrade: ws\r\n\r\n",
    b"POST /x HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5;ext=1\r\nhello\r\n0\r\nX-Sum: 1\r\n\r\n",
    b"GET / HTTP/1.1\r\nX-Empty:\r\n\r\n",
    b"PUT /url HTTP/1.1\r\nContent-Length: 1\r\nContent-Length: 2\r\n\r\n",
    b"PUT /url HTTP/1.1\r\nContent-Length: 1\r\nTransfer-Encoding: chunked\r\n\r\n",
];

const RESPONSES: &[&[u8]] = &[
    b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi",
    b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n0\r\n\r\n",
    b"HTTP/1.1 101 Switching Protocols\r\nConnection: Upgrade\r\nUpgrade: websocket\r\n\r\n",
    b"HTTP/1.1 304 Not Modified\r\n\r\n",
];

#[test]
fn test_every_split_yields_same_events() {
    for settings in [Settings::strict(), Settings::lenient()] {
        for req in REQUESTS {
            assert_split_invariant(MessageKind::Request, &settings, req);
        }
        for resp in RESPONSES {
            assert_split_invariant(MessageKind::Response, &settings, resp);
        }
    }
}

#[test]
fn test_three_way_splits() {
    let req = REQUESTS[3];
    let settings = Settings::strict();
    let (whole, _) = record(MessageKind::Request, &settings, &[req]);
    for i in 0..=req.len() {
        for j in i..=req.len() {
            let (split, _) = record(MessageKind::Request, &settings, &[&req[..i], &req[i..j], &req[j..]]);
            assert_eq!(split, whole, "split at {i}/{j}");
        }
    }
}

#[test]
fn test_byte_at_a_time() {
    let req = REQUESTS[0];
    let parts: Vec<&[u8]> = req.chunks(1).collect();

    let (bytewise, outcome) = record(MessageKind::Request, &Settings::strict(), &parts);
    let (whole, _) = record(MessageKind::Request, &Settings::strict(), &[req]);

    assert_eq!(outcome, Ok(Outcome::Consumed(1)));
    assert_eq!(bytewise, whole);
}

#[test]
fn test_continued_span_starts_at_zero() {
    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    let mut trace = Trace::new();

    parser.consume(b"GET /lo", &mut trace).unwrap();
    parser.consume(b"ng/path HTTP/1.1\r\n\r\n", &mut trace).unwrap();

    assert_eq!(
        &trace.lines()[..2],
        ["off=4 len=3 span[url]=\"/lo\"", "off=0 len=7 span[url]=\"ng/path\""]
    );
}

#[test]
fn test_empty_buffers_are_harmless() {
    let req = REQUESTS[1];
    let (events, outcome) = record(
        MessageKind::Request,
        &Settings::strict(),
        &[b"", &req[..30], b"", b"", &req[30..], b""],
    );
    let (whole, _) = record(MessageKind::Request, &Settings::strict(), &[req]);

    assert_eq!(outcome, Ok(Outcome::Consumed(0)));
    assert_eq!(events, whole);
}

#[test]
fn test_reset_replays_identically() {
    for req in REQUESTS {
        let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
        let mut first = Trace::new();
        let _ = parser.consume(req, &mut first);

        parser.reset();
        let mut second = Trace::new();
        let _ = parser.consume(req, &mut second);

        assert_eq!(first, second);
    }
}

#[test]
fn test_errors_are_sticky() {
    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    let mut recorder = Recorder::default();

    let err = parser.consume(b"GET / HTTP/1.1\r\n:\r\n", &mut recorder).unwrap_err();
    let seen = recorder.events.len();

    assert_eq!(parser.consume(b"GET / HTTP/1.1\r\n\r\n", &mut recorder), Err(err.clone()));
    assert_eq!(parser.finish(&mut recorder), Err(err.clone()));
    assert_eq!(recorder.events.len(), seen);
    assert_eq!(parser.error(), Some(&err));
    let errors = recorder
        .events
        .iter()
        .filter(|e| matches!(e, Event::Error(_)))
        .count();
    assert_eq!(errors, 1);
}

#[test]
fn test_pause_is_sticky_until_resume() {
    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    let mut recorder = Recorder::default();

    assert_eq!(
        parser.consume(REQUESTS[2], &mut recorder),
        Ok(Outcome::Paused(REQUESTS[2].len()))
    );
    let seen = recorder.events.len();
    assert_eq!(recorder.events.last(), Some(&Event::Pause));

    assert_eq!(parser.consume(b"binary", &mut recorder), Ok(Outcome::Paused(0)));
    assert_eq!(recorder.events.len(), seen);

    parser.resume();
    let err = parser.consume(b"binary", &mut recorder).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedData);
    assert_eq!(err.offset, 0);
}

#[test]
fn test_resume_with_restart_parses_next_message() {
    let settings = Settings {
        restart_after_complete: true,
        ..Settings::default()
    };
    let mut parser = Parser::with_settings(MessageKind::Request, settings);

    let _ = parser.consume(REQUESTS[2], &mut ());
    parser.resume();
    let next = b"GET /after HTTP/1.1\r\n\r\n";
    assert_eq!(parser.consume(next, &mut ()), Ok(Outcome::Consumed(next.len())));
    assert!(!parser.is_upgrade());
}

#[test]
fn test_done_state_rejects_data() {
    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    let err = parser
        .consume(b"GET / HTTP/1.1\r\n\r\nGET / HTTP/1.1\r\n\r\n", &mut ())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnexpectedData);
    assert_eq!(err.offset, 18);
}

#[test]
fn test_lenient_done_state_skips_line_endings() {
    let req = b"PUT / HTTP/1.1\r\nContent-Length: 1\r\n\r\nx\r\n";
    let mut parser = Parser::new(MessageKind::Request, Strictness::Lenient);

    assert_eq!(parser.consume(req, &mut ()), Ok(Outcome::Consumed(req.len())));

    let mut strict = Parser::new(MessageKind::Request, Strictness::Strict);
    assert_eq!(
        strict.consume(req, &mut ()).unwrap_err().kind,
        ErrorKind::UnexpectedData
    );
}

#[test]
fn test_pipelined_requests_with_restart() {
    let settings = Settings {
        restart_after_complete: true,
        ..Settings::default()
    };
    let data = b"GET /a HTTP/1.1\r\n\r\nPOST /b HTTP/1.1\r\nContent-Length: 2\r\n\r\nokGET /c HTTP/1.1\r\n\r\n";
    let (events, outcome) = record(MessageKind::Request, &settings, &[data]);

    assert_eq!(outcome, Ok(Outcome::Consumed(data.len())));
    let begins = events.iter().filter(|e| **e == Event::Begin).count();
    let completes = events.iter().filter(|e| **e == Event::Complete).count();
    assert_eq!(begins, 3);
    assert_eq!(completes, 3);
}

#[test]
fn test_data_after_close_with_restart() {
    let data = b"GET / HTTP/1.1\r\nConnection: close\r\n\r\nGET / HTTP/1.1\r\n\r\n";

    let strict = Settings {
        restart_after_complete: true,
        ..Settings::strict()
    };
    let (_, outcome) = record(MessageKind::Request, &strict, &[data]);
    let err = outcome.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ClosedConnection);
    assert_eq!(err.offset, 37);

    let lenient = Settings {
        restart_after_complete: true,
        ..Settings::lenient()
    };
    let (events, outcome) = record(MessageKind::Request, &lenient, &[data]);
    assert_eq!(outcome, Ok(Outcome::Consumed(data.len())));
    assert_eq!(events.iter().filter(|e| **e == Event::Complete).count(), 2);
}

#[test]
fn test_too_many_headers() {
    let settings = Settings {
        max_header_count: 2,
        ..Settings::default()
    };
    let mut parser = Parser::with_settings(MessageKind::Request, settings);
    let err = parser
        .consume(b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n", &mut ())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::TooManyHeaders);
    assert_eq!(err.offset, 28);
}

#[test]
fn test_header_section_size_limit() {
    let settings = Settings {
        max_header_size: 20,
        ..Settings::default()
    };
    let mut parser = Parser::with_settings(MessageKind::Request, settings);
    let err = parser
        .consume(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n", &mut ())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::HeaderOverflow);
    assert_eq!(err.offset, 20);

    // body bytes do not count
    let settings = Settings {
        max_header_size: 40,
        ..Settings::default()
    };
    let mut parser = Parser::with_settings(MessageKind::Request, settings);
    let req = b"PUT / HTTP/1.1\r\nContent-Length: 10\r\n\r\n0123456789";
    assert_eq!(parser.consume(req, &mut ()), Ok(Outcome::Consumed(req.len())));
}

#[test]
fn test_finish_outcomes() {
    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    assert_eq!(parser.finish(&mut ()), Ok(()));

    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    parser.consume(b"GET / HTTP/1.1\r\nHo", &mut ()).unwrap();
    assert_eq!(parser.finish(&mut ()).unwrap_err().kind, ErrorKind::UnexpectedEof);

    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    parser
        .consume(b"PUT / HTTP/1.1\r\nContent-Length: 4\r\n\r\nab", &mut ())
        .unwrap();
    assert_eq!(parser.finish(&mut ()).unwrap_err().kind, ErrorKind::UnexpectedEofInBody);

    let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
    parser.consume(b"GET / HTTP/1.1\r\n\r\n", &mut ()).unwrap();
    assert_eq!(parser.finish(&mut ()), Ok(()));
}

#[test]
fn test_parser_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Parser>();
}
