use web_harvester::protocol::{decode_output, split_lines};
use web_harvester::{harvest_bytes, harvest_lines, Error, Options};

#[test]
fn header_urls_survive_verbatim() {
    let requested = "http://example.com/a?b=c#d";
    let real = "https://www.example.com/a/?b=c";
    let lines = ["200", requested, real, "<html></html>"];

    match decode_output(&lines) {
        Ok(output) => {
            assert_eq!(output.requested_url.full, requested);
            assert_eq!(output.real_url.full, real);
            assert_eq!(output.real_url.scheme.as_deref(), Some("https"));
            assert_eq!(output.real_url.path.as_deref(), Some("/a/"));
            assert_eq!(output.real_url.query.as_deref(), Some("b=c"));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn status_code_is_reported_not_judged() {
    let lines = ["404", "http://example.com/missing", "http://example.com/missing", "<h1>Not found</h1>"];
    let result = harvest_lines(&lines, &Options::default());

    assert!(result.is_ok_and(|r| r.status_code() == 404));
}

#[test]
fn header_only_output_has_empty_content() {
    let result = harvest_bytes(b"204\nhttp://a.test\nhttp://a.test/\n", &Options::default());

    match result {
        Ok(result) => {
            assert_eq!(result.content(), "");
            assert!(result.title().is_none());
            assert_eq!(result.base_path(), Some("http://a.test/"));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn truncated_output_is_malformed() {
    let result = harvest_bytes(b"200\nhttp://a.test\n", &Options::default());
    assert!(matches!(result, Err(Error::MalformedOutput(_))));
}

#[test]
fn status_line_must_be_numeric() {
    let result = harvest_bytes(b"OK\nhttp://a.test\nhttp://a.test\n<p></p>\n", &Options::default());
    assert!(matches!(result, Err(Error::MalformedOutput(_))));
}

#[test]
fn windows_line_endings() {
    let raw = b"200\r\nhttp://a.test\r\nhttp://a.test/\r\n<title>CRLF</title>\r\n";
    assert_eq!(split_lines(raw).len(), 4);

    let result = harvest_bytes(raw, &Options::default());
    assert!(result.is_ok_and(|r| r.title() == Some("CRLF") && r.real_url().full == "http://a.test/"));
}

#[test]
fn screenshot_lines_expect_data_uri() {
    let lines = ["200", "http://a.test", "http://a.test/", "data:image/png;base64,iVBORw0KGgo="];
    let shot = web_harvester::screenshot_lines(&lines);
    assert!(shot.is_ok_and(|s| s.media_type() == "image/png" && s.decode_image().is_ok()));

    let lines = ["200", "http://a.test", "http://a.test/", "<html></html>"];
    assert!(matches!(web_harvester::screenshot_lines(&lines), Err(Error::MalformedOutput(_))));
}
