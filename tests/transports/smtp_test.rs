//! SMTP transport tests against a scripted in-process server.

use contact_relay::providers::{SmtpTransport, TlsMode};
use contact_relay::{
    validate, Composer, DeliveryOutcome, Dispatcher, FailureCategory, NotificationPayload,
    RawSubmission, Transport,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// How the scripted server answers.
#[derive(Clone, Copy)]
struct Script {
    greeting: &'static str,
    auth: &'static str,
}

const ACCEPTING: Script = Script {
    greeting: "220 localhost ESMTP test\r\n",
    auth: "235 2.7.0 Authentication successful\r\n",
};

/// Start a server on an ephemeral port and return the port.
async fn start_server(script: Script) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(session(stream, script));
        }
    });

    port
}

async fn session(stream: TcpStream, script: Script) {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    if write.write_all(script.greeting.as_bytes()).await.is_err() {
        return;
    }
    if !script.greeting.starts_with("220") {
        return;
    }

    let mut in_data = false;
    while let Ok(Some(line)) = lines.next_line().await {
        if in_data {
            if line == "." {
                in_data = false;
                let _ = write.write_all(b"250 2.0.0 Ok: queued as ABC123\r\n").await;
            }
            continue;
        }

        let command = line.to_ascii_uppercase();
        let reply = if command.starts_with("EHLO") {
            "250-localhost\r\n250 AUTH PLAIN LOGIN\r\n"
        } else if command.starts_with("AUTH") {
            script.auth
        } else if command.starts_with("MAIL")
            || command.starts_with("RCPT")
            || command.starts_with("NOOP")
            || command.starts_with("RSET")
        {
            "250 2.1.0 Ok\r\n"
        } else if command.starts_with("DATA") {
            in_data = true;
            "354 End data with <CR><LF>.<CR><LF>\r\n"
        } else if command.starts_with("QUIT") {
            let _ = write.write_all(b"221 2.0.0 Bye\r\n").await;
            return;
        } else {
            "500 5.5.2 Error: command not recognized\r\n"
        };

        if write.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
    }
}

fn transport(port: u16) -> SmtpTransport {
    SmtpTransport::new("127.0.0.1", port)
        .tls(TlsMode::None)
        .credentials("site@example.com", "secret")
        .build()
        .unwrap()
}

fn payload() -> NotificationPayload {
    let submission = validate(&RawSubmission {
        name: Some("Jo".into()),
        email: Some("jo@x.com".into()),
        service: Some("inspections".into()),
        message: Some("Please call me back".into()),
        ..Default::default()
    })
    .unwrap();
    Composer::new(
        "office@example.com",
        ("All Perspectives Website", "site@example.com"),
    )
    .compose(&submission)
}

#[tokio::test]
async fn delivers_and_returns_server_reference() {
    let port = start_server(ACCEPTING).await;

    let receipt = transport(port).deliver(&payload()).await.unwrap();

    assert!(receipt.message_id.contains("ABC123"), "{}", receipt.message_id);
}

#[tokio::test]
async fn verify_succeeds_against_live_server() {
    let port = start_server(ACCEPTING).await;
    assert!(transport(port).verify().await.is_ok());
}

#[tokio::test]
async fn rejected_credentials_are_authentication_failures() {
    let port = start_server(Script {
        auth: "535 5.7.8 Authentication credentials invalid\r\n",
        ..ACCEPTING
    })
    .await;

    let outcome = Dispatcher::new(transport(port)).send(&payload()).await;

    match outcome {
        DeliveryOutcome::Failure {
            category,
            raw_detail,
        } => {
            assert_eq!(category, FailureCategory::Authentication);
            assert!(raw_detail.contains("535") || raw_detail.contains("credentials"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unavailable_service_is_a_connection_failure() {
    let port = start_server(Script {
        greeting: "421 4.3.2 Service not available, closing channel\r\n",
        ..ACCEPTING
    })
    .await;

    let err = transport(port).deliver(&payload()).await.unwrap_err();

    assert_eq!(err.category, FailureCategory::Connection, "{err}");
}

#[tokio::test]
async fn nothing_listening_is_a_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = transport(port).verify().await.unwrap_err();

    assert_eq!(err.category, FailureCategory::Connection, "{err}");
}

#[tokio::test]
async fn failed_tls_handshake_is_a_connection_failure() {
    // The scripted server never speaks TLS, so the handshake fails.
    let port = start_server(ACCEPTING).await;
    let transport = SmtpTransport::new("localhost", port)
        .tls(TlsMode::Tls)
        .credentials("site@example.com", "secret")
        .build()
        .unwrap();

    let outcome = Dispatcher::new(transport).send(&payload()).await;

    assert_eq!(outcome.category(), Some(FailureCategory::Connection), "{outcome:?}");
}
