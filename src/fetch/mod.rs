// src/fetch/mod.rs

//! Remote CSV sources over plain HTTP GET.

use reqwest::{
    blocking::{Client, Response},
    StatusCode,
};
use std::io::BufReader;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{CsvError, Result};

/// Issue a GET for `url` and return the response body as a line reader.
///
/// Only a `200 OK` yields a stream; every other status, redirects that the
/// client did not follow included, is a [`CsvError::BadStatus`].
#[instrument(level = "debug", skip(client, url), fields(url = %url))]
pub fn open_remote(client: &Client, url: &Url) -> Result<BufReader<Response>> {
    let resp = client.get(url.as_str()).send()?;
    let status = resp.status();
    if status != StatusCode::OK {
        return Err(CsvError::BadStatus(status.as_u16()));
    }
    debug!(content_length = ?resp.content_length(), "remote CSV opened");
    Ok(BufReader::new(resp))
}


#[cfg(test)]
mod tests {
    use super::test_server::{local_client, serve_once};
    use super::*;
    use std::io::Read;

    #[test]
    fn test_ok_response_is_readable() {
        let (url, server) = serve_once(200, "a,b\n1,2\n");
        let url = Url::parse(&url).unwrap();
        let mut body = String::new();
        open_remote(&local_client(), &url)
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "a,b\n1,2\n");
        server.join().unwrap();
    }

    #[test]
    fn test_non_200_is_bad_status() {
        let (url, server) = serve_once(404, "nope");
        let url = Url::parse(&url).unwrap();
        match open_remote(&local_client(), &url) {
            Err(CsvError::BadStatus(code)) => assert_eq!(code, 404),
            Err(other) => panic!("expected BadStatus, got {}", other),
            Ok(_) => panic!("expected BadStatus, got a stream"),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_bad_status_message() {
        assert_eq!(
            CsvError::BadStatus(503).to_string(),
            "bad response from server, code 503"
        );
    }
}
