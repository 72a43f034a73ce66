use httpspan::http::collector::{Message, MessageCollector};
use httpspan::http::request::Method;
use httpspan::http::response::StatusCode;
use httpspan::{Flags, MessageKind, Parser, Settings, Strictness, Version};

fn collect(kind: MessageKind, settings: Settings, parts: &[&[u8]]) -> Vec<Message> {
    let mut parser = Parser::with_settings(kind, settings);
    let mut collector = MessageCollector::new();
    for part in parts {
        parser.consume(part, &mut collector).unwrap();
    }
    parser.finish(&mut collector).unwrap();
    collector.take_messages()
}

#[test]
fn test_collect_post_request() {
    let messages = collect(
        MessageKind::Request,
        Settings::strict(),
        &[b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello"],
    );

    let [Message::Request(req)] = messages.as_slice() else {
        panic!("expected one request, got {messages:?}");
    };
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.url, "/api");
    assert_eq!(req.version, Version::HTTP_11);
    assert_eq!(req.header("Host"), Some("localhost"));
    assert_eq!(req.content_length, Some(5));
    assert_eq!(&req.body[..], b"hello");
}

#[test]
fn test_collect_chunked_request_with_trailers() {
    let messages = collect(
        MessageKind::Request,
        Settings::strict(),
        &[
            b"POST /up HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nab",
            b"c\r\n4;name=x\r\ndefg\r\n0\r\nChecksum: 12",
            b"34\r\n\r\n",
        ],
    );

    let [Message::Request(req)] = messages.as_slice() else {
        panic!("expected one request, got {messages:?}");
    };
    assert_eq!(&req.body[..], b"abcdefg");
    assert_eq!(req.trailers, [("Checksum".to_string(), "1234".to_string())]);
    assert!(req.flags.contains(Flags::CHUNKED | Flags::TRAILING));
    assert_eq!(req.content_length, None);
}

#[test]
fn test_collect_response_until_eof() {
    let messages = collect(
        MessageKind::Response,
        Settings::strict(),
        &[b"HTTP/1.0 200 Fine\r\nServer: test\r\n\r\nall ", b"of it"],
    );

    let [Message::Response(resp)] = messages.as_slice() else {
        panic!("expected one response, got {messages:?}");
    };
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.reason, "Fine");
    assert_eq!(resp.version, Version::HTTP_10);
    assert_eq!(resp.header("server"), Some("test"));
    assert_eq!(&resp.body[..], b"all of it");
}

#[test]
fn test_collect_pipelined_requests() {
    let settings = Settings {
        restart_after_complete: true,
        ..Settings::default()
    };
    let messages = collect(
        MessageKind::Request,
        settings,
        &[b"GET /one HTTP/1.1\r\nA: 1\r\n\r\nGET /two HTTP/1.1\r\nB: 2\r\n\r\n"],
    );

    let urls: Vec<&str> = messages
        .iter()
        .map(|m| match m {
            Message::Request(req) => req.url.as_str(),
            Message::Response(_) => panic!("unexpected response"),
        })
        .collect();
    assert_eq!(urls, ["/one", "/two"]);
    let Message::Request(second) = &messages[1] else {
        unreachable!();
    };
    assert_eq!(second.headers, [("B".to_string(), "2".to_string())]);
}

#[test]
fn test_collect_lenient_request() {
    let mut parser = Parser::new(MessageKind::Request, Strictness::Lenient);
    let mut collector = MessageCollector::new();
    parser
        .consume(b"GET  /x HTTP/1.1\nX-Name : value \n\n", &mut collector)
        .unwrap();

    let Some(Message::Request(req)) = collector.messages().first() else {
        panic!("no request collected");
    };
    assert_eq!(req.url, "/x");
    assert_eq!(req.headers, [("X-Name".to_string(), "value ".to_string())]);
}
