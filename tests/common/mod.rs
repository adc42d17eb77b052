//! Shared helpers for the integration tests

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tiny_http::{Response, Server};

/// Version 3 document with one view "default"
pub const STATUS_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="/bind9.xsl"?>
<statistics version="3.11">
  <server>
    <boot-time>2019-03-05T10:12:33Z</boot-time>
    <config-time>2019-03-05T10:12:34Z</config-time>
    <counters type="nsstat">
      <counter name="Requestv4">1234</counter>
    </counters>
  </server>
  <views>
    <view name="default">
      <counters type="resstats">
        <counter name="Queryv4">42</counter>
      </counters>
      <cache name="default">
        <rrset><name>A!x</name><counter>3</counter></rrset>
      </cache>
    </view>
  </views>
  <memory>
    <summary>
      <TotalUse>1048576</TotalUse>
    </summary>
  </memory>
</statistics>"#;

/// A stub statistics channel answering every request the same way
pub struct StubServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub fn start(status: u16, body: &str) -> StubServer {
        let server = Server::http("127.0.0.1:0").expect("Failed to bind stub server");
        let addr = server.server_addr();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let body = body.to_string();
        thread::spawn(move || {
            for request in server.incoming_requests() {
                counter.fetch_add(1, Ordering::SeqCst);
                let response = Response::from_string(body.clone()).with_status_code(status);
                let _ = request.respond(response);
            }
        });

        StubServer { addr, hits }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}
